/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn project(name: &str) -> PathBuf {
    fixtures_path().join(name)
}

fn database() -> PathBuf {
    fixtures_path().join("threats.json")
}

fn json_stdout(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: Success - no issues at or above the threshold
    #[test]
    fn test_exit_code_success() {
        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("clean-project"))
            .arg("-d")
            .arg(database())
            .assert()
            .code(0);
    }

    /// Exit code 1: Issues found
    #[test]
    fn test_exit_code_issues_found() {
        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("infected-project"))
            .arg("-d")
            .arg(database())
            .assert()
            .code(1);
    }

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("lockwarden").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("lockwarden")
            .arg("--version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("lockwarden")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid format value
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("lockwarden")
            .args(["-f", "invalid_format"])
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid severity threshold
    #[test]
    fn test_exit_code_invalid_severity_threshold() {
        cargo_bin_cmd!("lockwarden")
            .args(["--severity-threshold", "urgent"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Application error - non-existent project path
    #[test]
    fn test_exit_code_application_error_nonexistent_path() {
        cargo_bin_cmd!("lockwarden")
            .args(["-p", "/nonexistent/path/that/does/not/exist"])
            .arg("-d")
            .arg(database())
            .assert()
            .code(3);
    }

    /// Exit code 3: Application error - path is a file, not a directory
    #[test]
    fn test_exit_code_application_error_file_not_directory() {
        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(database())
            .arg("-d")
            .arg(database())
            .assert()
            .code(3);
    }

    /// Exit code 3: no database given anywhere
    #[test]
    fn test_exit_code_missing_database_option() {
        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("clean-project"))
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No threat database specified"));
    }

    /// Exit code 3: database path does not exist
    #[test]
    fn test_exit_code_database_not_found() {
        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("clean-project"))
            .args(["-d", "/nonexistent/threats.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Threat database not found"));
    }

    /// Exit code 3: project without package.json
    #[test]
    fn test_exit_code_missing_manifest() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(dir.path())
            .arg("-d")
            .arg(database())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("package.json not found"));
    }
}

mod report_tests {
    use super::*;

    #[test]
    fn test_json_report_for_npm_project() {
        let output = cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("infected-project"))
            .arg("-d")
            .arg(database())
            .args(["-f", "json"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let json = json_stdout(&output.stdout);

        assert_eq!(json["scanMode"], "deep");
        assert_eq!(json["lockFile"], "package-lock.json");
        assert_eq!(json["packagesScanned"]["total"], 3);
        assert_eq!(json["packagesScanned"]["direct"], 2);
        assert_eq!(json["packagesScanned"]["transitive"], 1);
        assert_eq!(json["totalIssues"], 2);
        assert_eq!(json["transitiveIssues"], 1);

        let critical = &json["results"]["critical"][0];
        assert_eq!(critical["package"], "dep-b");
        assert_eq!(critical["category"], "Confirmed Malicious");
        assert_eq!(critical["chain"], serde_json::json!(["dep-a"]));

        let safe = &json["results"]["low"][0];
        assert_eq!(safe["package"], "@ctrl/tinycolor");
        assert_eq!(safe["safeVersion"], true);
        assert_eq!(safe["campaign"], "shai-hulud");
        assert_eq!(json["metadata"]["toolName"], "lockwarden");
        assert_eq!(json["metadata"]["databaseVersion"], "2025.09.16");
    }

    #[test]
    fn test_json_report_for_yarn_project() {
        let output = cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("yarn-project"))
            .arg("-d")
            .arg(database())
            .args(["-f", "json"])
            .output()
            .unwrap();

        let json = json_stdout(&output.stdout);
        assert_eq!(json["lockFile"], "yarn.lock");

        let issue = &json["results"]["critical"][0];
        assert_eq!(issue["package"], "ngx-bootstrap");
        assert_eq!(issue["version"], "19.0.3");
        assert_eq!(issue["isTransitive"], true);
        assert_eq!(issue["chain"], serde_json::json!(["angular-widgets"]));
        assert_eq!(issue["action"], "check version and update");
    }

    #[test]
    fn test_text_report_is_default() {
        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("clean-project"))
            .arg("-d")
            .arg(database())
            .assert()
            .code(0)
            .stdout(predicate::str::contains("No threats detected"))
            .stdout(predicate::str::contains("Trusted (1): @types/node"))
            .stdout(predicate::str::contains("\u{1b}").not());
    }

    #[test]
    fn test_explicit_lockfile_option() {
        let output = cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("clean-project"))
            .arg("-d")
            .arg(database())
            .arg("-l")
            .arg(project("yarn-project").join("yarn.lock"))
            .args(["-f", "json"])
            .output()
            .unwrap();

        let json = json_stdout(&output.stdout);
        assert_eq!(json["lockFile"], "yarn.lock");
        assert_eq!(json["results"]["critical"][0]["package"], "ngx-bootstrap");
    }

    #[test]
    fn test_missing_explicit_lockfile_warns_and_scans_direct() {
        let output = cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("clean-project"))
            .arg("-d")
            .arg(database())
            .arg("-l")
            .arg(project("clean-project").join("missing.lock"))
            .args(["-f", "json"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(0));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Lock file not found"));
        let json = json_stdout(&output.stdout);
        assert_eq!(json["scanMode"], "direct");
        assert!(json["lockFile"].is_null());
    }

    #[test]
    fn test_ignore_option_skips_package() {
        let output = cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("infected-project"))
            .arg("-d")
            .arg(database())
            .args(["-f", "json", "-i", "dep-b", "-i", "@ctrl/*"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(0));
        let json = json_stdout(&output.stdout);
        assert_eq!(json["totalIssues"], 0);
        assert_eq!(json["ignored"], serde_json::json!(["@ctrl/tinycolor", "dep-b"]));
    }

    #[test]
    fn test_severity_threshold_option() {
        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("protestware-project"))
            .arg("-d")
            .arg(database())
            .assert()
            .code(1);

        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("protestware-project"))
            .arg("-d")
            .arg(database())
            .args(["--severity-threshold", "medium"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("LOW (1)"));
    }

    #[test]
    fn test_output_file_option() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("report.json");

        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("clean-project"))
            .arg("-d")
            .arg(database())
            .args(["-f", "json"])
            .arg("-o")
            .arg(&report)
            .assert()
            .code(0)
            .stdout(predicate::str::is_empty());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["scanMode"], "deep");
        assert_eq!(json["totalIssues"], 0);
    }

    #[test]
    fn test_stale_database_warning_on_stderr() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("old.json");
        std::fs::write(&db, r#"{"version":"0.1.0","lastUpdated":"2020-01-01"}"#).unwrap();

        cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(project("clean-project"))
            .arg("-d")
            .arg(&db)
            .assert()
            .code(0)
            .stderr(predicate::str::contains("last updated 2020-01-01"));
    }

    #[test]
    fn test_malformed_lockfile_falls_back_to_direct_mode() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies":{"crossenv":"1.0.0"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("package-lock.json"), "{ not json").unwrap();

        let output = cargo_bin_cmd!("lockwarden")
            .arg("-p")
            .arg(dir.path())
            .arg("-d")
            .arg(database())
            .args(["-f", "json"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let json = json_stdout(&output.stdout);
        assert_eq!(json["scanMode"], "direct");
        assert!(json["lockFile"].is_null());
        assert_eq!(json["results"]["critical"][0]["category"], "Typosquatting");
    }
}
