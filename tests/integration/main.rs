//! Integration tests for npm-install

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn npm_install() -> Command {
        let mut cmd = cargo_bin_cmd!("npm-install");
        for var in [
            "GITHUB_ENV",
            "GITHUB_OUTPUT",
            "GITHUB_ACTIONS",
            "NPM_INSTALL_CONFIG",
            "NPM_INSTALL_CACHE_DIR",
            "INPUT_WORKING-DIRECTORY",
            "INPUT_INSTALL-COMMAND",
            "INPUT_USEROLLINGCACHE",
            "RUNNER_TOOL_CACHE",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    fn project(lockfile: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name":"demo"}"#).unwrap();
        fs::write(dir.path().join(lockfile), "lock contents").unwrap();
        dir
    }

    #[test]
    fn help_displays() {
        npm_install()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Install Node.js dependencies in CI with lockfile-keyed caching",
            ));
    }

    #[test]
    fn version_displays() {
        npm_install()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("npm-install"));
    }

    #[test]
    fn key_for_npm_project() {
        let dir = project("package-lock.json");
        npm_install()
            .args(["key", "--working-directory"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Package manager: npm"))
            .stdout(predicate::str::contains("Lockfile: yes"));
    }

    #[test]
    fn key_json_for_yarn_project() {
        let dir = project("yarn.lock");
        let output = npm_install()
            .args(["key", "--format", "json", "--working-directory"])
            .arg(dir.path())
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["package_manager"], "yarn");
        assert!(json["primary_key"].as_str().unwrap().starts_with("yarn-"));
    }

    #[test]
    fn config_path_honours_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        npm_install()
            .arg("--config")
            .arg(&path)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show() {
        let dir = TempDir::new().unwrap();
        npm_install()
            .arg("--config")
            .arg(dir.path().join("missing.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn install_without_manifest_fails() {
        let dir = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        npm_install()
            .args(["install", "--working-directory"])
            .arg(dir.path())
            .arg("--cache-root")
            .arg(cache.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("No package.json or lockfile found"));
    }

    #[test]
    fn install_fails_when_npm_is_missing() {
        let dir = project("package-lock.json");
        let empty_path = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        npm_install()
            .env("PATH", empty_path.path())
            .args(["install", "--working-directory"])
            .arg(dir.path())
            .arg("--cache-root")
            .arg(cache.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Executable not found: npm"));
    }

    #[test]
    fn failure_is_annotated_on_github_actions() {
        let dir = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        npm_install()
            .env("GITHUB_ACTIONS", "true")
            .args(["install", "--working-directory"])
            .arg(dir.path())
            .arg("--cache-root")
            .arg(cache.path())
            .assert()
            .failure()
            .stdout(predicate::str::starts_with("::error::"));
    }

    #[cfg(unix)]
    mod fake_package_managers {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        const FAKE_NPM: &str = r#"#!/bin/sh
echo "$@" >> "$FAKE_LOG"
mkdir -p "$npm_config_cache"
echo cached > "$npm_config_cache/blob"
"#;

        const FAKE_YARN: &str = r#"#!/bin/sh
echo "yarn $@" >> "$FAKE_LOG"
mkdir -p "$HOME/.cache/yarn"
echo cached > "$HOME/.cache/yarn/blob"
"#;

        fn install_script(bin: &Path, name: &str, body: &str) {
            let path = bin.join(name);
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        fn search_path(bin: &Path) -> String {
            format!("{}:/usr/bin:/bin", bin.display())
        }

        #[test]
        fn npm_miss_then_hit() {
            let dir = project("package-lock.json");
            let tools = TempDir::new().unwrap();
            let bin = tools.path().join("bin");
            fs::create_dir_all(&bin).unwrap();
            install_script(&bin, "npm", FAKE_NPM);

            let log = tools.path().join("calls.log");
            let outputs = tools.path().join("outputs");
            let npm_cache = tools.path().join("npm-cache");
            let cache_root = tools.path().join("store");

            let run = || {
                let mut cmd = npm_install();
                cmd.env("PATH", search_path(&bin))
                    .env("HOME", tools.path())
                    .env("FAKE_LOG", &log)
                    .env("GITHUB_OUTPUT", &outputs)
                    .args(["install", "--working-directory"])
                    .arg(dir.path())
                    .arg("--cache-folder")
                    .arg(&npm_cache)
                    .arg("--cache-root")
                    .arg(&cache_root);
                cmd
            };

            run()
                .assert()
                .success()
                .stdout(predicate::str::contains("cache miss"));
            run()
                .assert()
                .success()
                .stdout(predicate::str::contains("cache hit"));

            assert_eq!(fs::read_to_string(&log).unwrap(), "ci\nci\n");
            assert_eq!(
                fs::read_to_string(&outputs).unwrap(),
                "cache-hit=false\ncache-hit=true\n"
            );
            assert!(npm_cache.join("blob").exists());
        }

        #[test]
        fn relative_paths_resolve_against_invocation_directory() {
            let workspace = TempDir::new().unwrap();
            let project = workspace.path().join("project");
            fs::create_dir_all(&project).unwrap();
            fs::write(project.join("package.json"), r#"{"name":"demo"}"#).unwrap();
            fs::write(project.join("package-lock.json"), "lock contents").unwrap();

            let bin = workspace.path().join("bin");
            fs::create_dir_all(&bin).unwrap();
            install_script(&bin, "npm", FAKE_NPM);
            let cache_root = workspace.path().join("store");

            let run = || {
                let mut cmd = npm_install();
                cmd.current_dir(workspace.path())
                    .env("PATH", search_path(&bin))
                    .env("HOME", workspace.path())
                    .env("FAKE_LOG", workspace.path().join("calls.log"))
                    .args([
                        "install",
                        "--working-directory",
                        "project",
                        "--cache-folder",
                        ".npm-cache",
                    ])
                    .arg("--cache-root")
                    .arg(&cache_root);
                cmd
            };

            run()
                .assert()
                .success()
                .stdout(predicate::str::contains("cache miss"));
            run()
                .assert()
                .success()
                .stdout(predicate::str::contains("cache hit"));

            assert!(workspace.path().join(".npm-cache/blob").exists());
            assert!(!project.join(".npm-cache").exists());
            assert_eq!(fs::read_dir(&cache_root).unwrap().count(), 1);
        }

        #[test]
        fn yarn_uses_frozen_lockfile() {
            let dir = project("yarn.lock");
            let tools = TempDir::new().unwrap();
            let bin = tools.path().join("bin");
            fs::create_dir_all(&bin).unwrap();
            install_script(&bin, "yarn", FAKE_YARN);
            let log = tools.path().join("calls.log");

            npm_install()
                .env("PATH", search_path(&bin))
                .env("HOME", tools.path())
                .env("FAKE_LOG", &log)
                .args(["install", "--working-directory"])
                .arg(dir.path())
                .arg("--cache-root")
                .arg(tools.path().join("store"))
                .assert()
                .success();

            assert_eq!(fs::read_to_string(&log).unwrap(), "yarn --frozen-lockfile\n");
        }

        #[test]
        fn failing_install_does_not_save_cache() {
            let dir = project("package-lock.json");
            let tools = TempDir::new().unwrap();
            let bin = tools.path().join("bin");
            fs::create_dir_all(&bin).unwrap();
            install_script(&bin, "npm", "#!/bin/sh\nexit 7\n");
            let cache_root = tools.path().join("store");

            npm_install()
                .env("PATH", search_path(&bin))
                .env("HOME", tools.path())
                .args(["install", "--working-directory"])
                .arg(dir.path())
                .arg("--cache-root")
                .arg(&cache_root)
                .assert()
                .failure()
                .stderr(predicate::str::contains("exit code: 7"));

            let saved = fs::read_dir(&cache_root).map(|d| d.count()).unwrap_or(0);
            assert_eq!(saved, 0);
        }

        #[test]
        fn custom_install_command() {
            let dir = project("package-lock.json");
            let tools = TempDir::new().unwrap();
            let log = tools.path().join("calls.log");

            npm_install()
                .env("HOME", tools.path())
                .args(["install", "--no-cache", "--working-directory"])
                .arg(dir.path())
                .arg("--install-command")
                .arg(format!("sh -c 'echo custom > {}'", log.display()))
                .assert()
                .success();

            assert_eq!(fs::read_to_string(&log).unwrap(), "custom\n");
        }
    }
}
