//! Integration tests for pharmalog
//!
//! These tests drive the binary end to end against a temporary project.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a pharmalog Command rooted in `dir`
fn pharmalog(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pharmalog");
    cmd.current_dir(dir.path())
        .env_remove("PHARMALOG_DATA_DIR")
        .env_remove("PHARMALOG_HOST")
        .env_remove("PHARMALOG_PORT")
        .env_remove("PHARMALOG_LOG");
    cmd
}

/// Helper to create a temporary project directory
fn create_temp_project() -> TempDir {
    TempDir::new().unwrap()
}

fn init_project(dir: &TempDir) {
    pharmalog(dir).arg("init").assert().success();
}

fn read_json(dir: &TempDir, file: &str) -> serde_json::Value {
    let content = fs::read_to_string(dir.path().join("data").join(file)).unwrap();
    serde_json::from_str(&content).unwrap()
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        let dir = create_temp_project();
        pharmalog(&dir).arg("--help").assert().success();
    }

    #[test]
    fn test_version() {
        let dir = create_temp_project();
        pharmalog(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pharmalog"));
    }

    #[test]
    fn test_init_creates_files() {
        let dir = create_temp_project();
        pharmalog(&dir)
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("funcionarios.json"));

        assert!(dir.path().join("pharmalog.toml").exists());
        assert_eq!(read_json(&dir, "funcionarios.json"), serde_json::json!({}));
        assert_eq!(read_json(&dir, "formulas.json"), serde_json::json!([]));
        assert_eq!(read_json(&dir, "erros.json"), serde_json::json!([]));
        assert_eq!(read_json(&dir, "tipos_erro.json"), serde_json::json!([]));
    }

    #[test]
    fn test_init_idempotent() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("already present"));
    }

    #[test]
    fn test_data_dir_flag() {
        let dir = create_temp_project();
        pharmalog(&dir)
            .args(["--data-dir", "registros", "employee", "add", "Alice"])
            .assert()
            .success();
        assert!(dir.path().join("registros/funcionarios.json").exists());
    }
}

// =============================================================================
// Employee Tests
// =============================================================================

mod employees {
    use super::*;

    #[test]
    fn test_add_and_list() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["employee", "add", "Alice", "--pharmacist"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Employee 'Alice' added."));

        let employees = read_json(&dir, "funcionarios.json");
        assert_eq!(employees["Alice"]["name"], "Alice");
        assert_eq!(employees["Alice"]["role"], "Farmaceutico");

        pharmalog(&dir)
            .args(["employee", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Alice"));
    }

    #[test]
    fn test_duplicate_fails_without_touching_file() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["employee", "add", "Bob"])
            .assert()
            .success();
        let before = fs::read(dir.path().join("data/funcionarios.json")).unwrap();

        pharmalog(&dir)
            .args(["employee", "add", "Bob"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        let after = fs::read(dir.path().join("data/funcionarios.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_unknown_fails_cleanly() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["--yes", "employee", "remove", "Nobody"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn test_remove() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["employee", "add", "Tati"])
            .assert()
            .success();
        pharmalog(&dir)
            .args(["--yes", "employee", "remove", "Tati"])
            .assert()
            .success();
        assert_eq!(read_json(&dir, "funcionarios.json"), serde_json::json!({}));
    }
}

// =============================================================================
// Record Tests
// =============================================================================

mod records {
    use super::*;

    #[test]
    fn test_formula_add_with_flags() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args([
                "formula", "add", "--nr", "4521", "--date", "2025-09-01", "--shift", "tarde",
                "--weighing", "Alice", "--handling", "Bob", "--redo-exc",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 on file"));

        let formulas = read_json(&dir, "formulas.json");
        assert_eq!(formulas[0]["nr"], 4521);
        assert_eq!(formulas[0]["turno"], "tarde");
        assert_eq!(formulas[0]["tipo_formula"], "Cápsulas");
        assert_eq!(formulas[0]["refeito_exc"], true);
        assert_eq!(formulas[0]["refeito_pm"], false);
    }

    #[test]
    fn test_formula_rejects_text_nr() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["formula", "add", "--nr", "abc", "--weighing", "A", "--handling", "B"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("whole number"));
        assert_eq!(read_json(&dir, "formulas.json"), serde_json::json!([]));
    }

    #[test]
    fn test_incident_add_accepts_comma_decimal() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args([
                "incident", "add", "--nr", "88123", "--error-type", "Rótulo", "--employee",
                "Alice", "--value", "12,50", "--billed",
            ])
            .assert()
            .success();

        let incidents = read_json(&dir, "erros.json");
        assert_eq!(incidents[0]["valor"], 12.5);
        assert_eq!(incidents[0]["tipo_erro"], "Rótulo");
        assert_eq!(incidents[0]["cobrado"], true);
    }

    #[test]
    fn test_error_type_vocabulary() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["error-type", "add", "Pesagem"])
            .assert()
            .success();
        pharmalog(&dir)
            .args(["error-type", "add", "Pesagem"])
            .assert()
            .failure();
        pharmalog(&dir)
            .args(["error-type", "list", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Pesagem"));
    }

    #[test]
    fn test_corrupt_file_lists_as_empty() {
        let dir = create_temp_project();
        init_project(&dir);
        fs::write(dir.path().join("data/formulas.json"), "{not json").unwrap();
        pharmalog(&dir)
            .args(["formula", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No formulas recorded."));
    }
}

// =============================================================================
// Report and Seed Tests
// =============================================================================

mod reports {
    use super::*;

    #[test]
    fn test_production_report_json() {
        let dir = create_temp_project();
        init_project(&dir);
        for (nr, date) in [("1", "2025-09-01"), ("2", "2025-09-03"), ("3", "2025-10-01")] {
            pharmalog(&dir)
                .args([
                    "formula", "add", "--nr", nr, "--date", date, "--weighing", "Alice",
                    "--handling", "Bob", "--stock-made",
                ])
                .assert()
                .success();
        }

        let output = pharmalog(&dir)
            .args([
                "report", "production", "--json", "--start", "2025-09-01", "--end", "2025-09-30",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["total"], 2);
        assert_eq!(report["kpis"]["stock_made"], 2);
        assert_eq!(report["by_weighing"][0]["label"], "Alice");
    }

    #[test]
    fn test_cost_report_empty_period() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["report", "costs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No incidents in this period."));
    }

    #[test]
    fn test_report_rejects_bad_group() {
        let dir = create_temp_project();
        pharmalog(&dir)
            .args(["report", "costs", "--group", "year"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--group"));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let dir = create_temp_project();
        for name in ["a.json", "b.json"] {
            pharmalog(&dir)
                .args(["seed", "formulas", "-n", "25", "--seed", "42", "--output", name])
                .assert()
                .success();
        }
        let a = fs::read_to_string(dir.path().join("a.json")).unwrap();
        let b = fs::read_to_string(dir.path().join("b.json")).unwrap();
        assert_eq!(a, b);
        let records: Vec<serde_json::Value> = serde_json::from_str(&a).unwrap();
        assert_eq!(records.len(), 25);
    }

    #[test]
    fn test_seed_rejects_window_before_calendar_start() {
        let dir = create_temp_project();
        pharmalog(&dir)
            .args(["seed", "formulas", "-n", "5", "--days", "100000000", "--output", "x.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--days"));
        assert!(!dir.path().join("x.json").exists());
    }

    #[test]
    fn test_report_rejects_inverted_range() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["report", "production", "--start", "2025-10-05", "--end", "2025-10-01"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("is after end date"));
    }

    #[test]
    fn test_bad_row_does_not_hide_the_rest() {
        let dir = create_temp_project();
        init_project(&dir);
        for nr in ["1", "2"] {
            pharmalog(&dir)
                .args([
                    "formula", "add", "--nr", nr, "--date", "2025-09-01", "--weighing", "Alice",
                    "--handling", "Bob",
                ])
                .assert()
                .success();
        }
        let mut rows = read_json(&dir, "formulas.json");
        let mut legacy = rows[0].clone();
        legacy["nr"] = serde_json::json!("3");
        rows.as_array_mut().unwrap().push(legacy);
        fs::write(dir.path().join("data/formulas.json"), rows.to_string()).unwrap();

        let output = pharmalog(&dir)
            .args(["report", "production", "--json"])
            .output()
            .unwrap();
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["total"], 2);
        assert_eq!(report["skipped"], 1);

        pharmalog(&dir)
            .args([
                "formula", "add", "--nr", "4", "--date", "2025-09-02", "--weighing", "Alice",
                "--handling", "Bob",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("4 on file"));
        assert_eq!(read_json(&dir, "formulas.json").as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_seed_appends_to_store() {
        let dir = create_temp_project();
        init_project(&dir);
        pharmalog(&dir)
            .args(["seed", "incidents", "-n", "10", "--seed", "1"])
            .assert()
            .success();
        let incidents = read_json(&dir, "erros.json");
        assert_eq!(incidents.as_array().unwrap().len(), 10);
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let dir = create_temp_project();
        pharmalog(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("port = 5000"));
    }

    #[test]
    fn test_config_init_creates_toml() {
        let dir = create_temp_project();
        pharmalog(&dir)
            .args(["config", "init"])
            .assert()
            .success();
        let content = fs::read_to_string(dir.path().join("pharmalog.toml")).unwrap();
        assert!(content.contains("[storage]"));
        assert!(content.contains("[server]"));
    }

    #[test]
    fn test_config_validate_reports_warnings() {
        let dir = create_temp_project();
        fs::write(
            dir.path().join("pharmalog.toml"),
            "[storage]\nformulas_file = \"erros.json\"\n",
        )
        .unwrap();
        pharmalog(&dir)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("both point to 'erros.json'"));
    }

    #[test]
    fn test_config_file_moves_data_dir() {
        let dir = create_temp_project();
        fs::write(
            dir.path().join("pharmalog.toml"),
            "[storage]\ndata_dir = \"registros\"\n",
        )
        .unwrap();
        pharmalog(&dir)
            .args(["employee", "add", "Dani"])
            .assert()
            .success();
        assert!(dir.path().join("registros/funcionarios.json").exists());
    }
}
