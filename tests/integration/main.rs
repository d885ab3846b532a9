//! Integration tests for Volman

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from any user config
    fn volman(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("volman");
        cmd.env("VOLMAN_CONFIG", temp.path().join("config.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("volume planning"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("volman"));
    }

    #[test]
    fn hash_absolute_path() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["hash", "/volume"])
            .assert()
            .success()
            .stdout("14331bf18c8e434c4b3f48a8c5cc79aa\n");
    }

    #[test]
    fn hash_relative_path_with_namespace() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["hash", "-u", "uniq", "-b", "/builds/project", "volume"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "uniq-cache-f69aef9fb01e88e6213362a04877452d",
            ));
    }

    #[test]
    fn hash_root_fails() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["hash", "/"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("root path"));
    }

    #[test]
    fn plan_host_bind() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["plan", "/host:/volume:ro"])
            .assert()
            .success()
            .stdout("/host:/volume:ro\n");
    }

    #[test]
    fn plan_host_cache_dir() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["plan", "--cache-dir", "/cache", "-u", "uniq", "/volume"])
            .assert()
            .success()
            .stdout("/cache/uniq/14331bf18c8e434c4b3f48a8c5cc79aa:/volume\n");
    }

    #[test]
    fn plan_engine_volume_dry_run() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args([
                "plan",
                "--dry-run",
                "-u",
                "unique",
                "-b",
                "/builds/project",
                "volume",
            ])
            .assert()
            .success()
            .stdout(
                "unique-cache-f69aef9fb01e88e6213362a04877452d:/builds/project/volume\n",
            );
    }

    #[test]
    fn plan_json_output() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["plan", "-f", "json", "/host:/volume", "/data:/data:rw"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""binds""#))
            .stdout(predicate::str::contains("/data:/data:rw"));
    }

    #[test]
    fn plan_root_fails() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["plan", "/"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("root path"));
    }

    #[test]
    fn plan_disabled_cache_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["plan", "--disable-cache", "/cache"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("disabled"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn plan_duplicate_destination_fails() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["plan", "/host:/volume", "/other:/volume"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already defined"));
    }

    #[test]
    fn plan_reads_config_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "[volumes]\ncache_dir = \"/cache\"\nunique_name = \"uniq\"\n",
        )
        .unwrap();

        volman(&temp)
            .args(["plan", "/volume"])
            .assert()
            .success()
            .stdout("/cache/uniq/14331bf18c8e434c4b3f48a8c5cc79aa:/volume\n");
    }

    #[test]
    fn invalid_config_suggests_init() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "[volumes\n").unwrap();

        volman(&temp)
            .args(["plan", "/host:/volume"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("config init --force"));

        volman(&temp)
            .args(["config", "init", "--force"])
            .assert()
            .success();
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        volman(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[volumes]"));
    }
}
