// Integration tests for the `flens recon` and `flens score` commands.
// Run with: cargo test -p fleetlens-cli --test recon_tests -- --nocapture

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn flens() -> Command {
    Command::new(env!("CARGO_BIN_EXE_flens"))
}

const TXN_CSV: &str = "\
vehicle_id,timestamp,billed_volume,amount,station_id
KA03AB1234,2026-01-15T09:30:00,15.0,1450.75,FS-01
";

const DET_CSV: &str = "\
vehicle_id,vehicle_class,helmet,detected_volume,timestamp
KA03AB1234,two-wheeler,false,14.9,2026-01-15T09:29:50
";

const REG_CSV: &str = "\
vehicle_id,owner,vehicle_class,registration_valid_until,insurance,puc_valid_until,pending_fine_amount,pending_fine_reason,road_tax
KA03AB1234,Ravi Kumar,two-wheeler,2027-03-30,active,2026-12-31,500,No Helmet,paid
";

const CONFIG: &str = r#"
name = "CLI Test"
as_of = "2026-02-01"

[inputs.transactions]
file = "transactions.csv"

[inputs.detections]
file = "detections.csv"

[inputs.registry]
file = "registry.csv"
"#;

fn write_run_dir(dir: &Path) {
    fs::write(dir.join("config.toml"), CONFIG).unwrap();
    fs::write(dir.join("transactions.csv"), TXN_CSV).unwrap();
    fs::write(dir.join("detections.csv"), DET_CSV).unwrap();
    fs::write(dir.join("registry.csv"), REG_CSV).unwrap();
}

#[test]
fn recon_run_clean_fleet_exits_zero() {
    let dir = TempDir::new().unwrap();
    write_run_dir(dir.path());

    let output = flens()
        .args(["recon", "run", "--json"])
        .arg(dir.path().join("config.toml"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["meta"]["config_name"], "CLI Test");
    assert_eq!(json["summary"]["total_records"], 1);
    assert_eq!(json["records"][0]["compliance"]["score"], 80);
    assert_eq!(json["records"][0]["fueling"]["flag"], "ok");
}

#[test]
fn recon_run_flagged_fleet_exits_three() {
    let dir = TempDir::new().unwrap();
    write_run_dir(dir.path());
    // Detected volume far below billed: the fill turns suspicious
    fs::write(
        dir.path().join("detections.csv"),
        DET_CSV.replace("14.9", "7.0"),
    )
    .unwrap();

    let output = flens()
        .args(["recon", "run"])
        .arg(dir.path().join("config.toml"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("flagged transactions found"), "stderr: {stderr}");
}

#[test]
fn recon_run_writes_json_and_csv_files() {
    let dir = TempDir::new().unwrap();
    write_run_dir(dir.path());
    let json_path = dir.path().join("out.json");
    let csv_path = dir.path().join("report.csv");

    let output = flens()
        .args(["recon", "run"])
        .arg(dir.path().join("config.toml"))
        .arg("--output")
        .arg(&json_path)
        .arg("--csv")
        .arg(&csv_path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["summary"]["fueling_ok"], 1);

    let report = fs::read_to_string(&csv_path).unwrap();
    assert!(report.starts_with("vehicle_id,"));
    assert!(report.contains("KA03AB1234"));
}

#[test]
fn recon_validate_accepts_good_config() {
    let dir = TempDir::new().unwrap();
    write_run_dir(dir.path());

    let output = flens()
        .args(["recon", "validate"])
        .arg(dir.path().join("config.toml"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("valid: 'CLI Test'"));
}

#[test]
fn recon_validate_rejects_bad_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        CONFIG.replace("2026-02-01", "not-a-date"),
    )
    .unwrap();

    let output = flens()
        .args(["recon", "validate"])
        .arg(dir.path().join("config.toml"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn recon_run_missing_input_exits_five() {
    let dir = TempDir::new().unwrap();
    write_run_dir(dir.path());
    fs::remove_file(dir.path().join("registry.csv")).unwrap();

    let output = flens()
        .args(["recon", "run"])
        .arg(dir.path().join("config.toml"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("registry.csv"), "stderr: {stderr}");
}

#[test]
fn score_known_vehicle() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("registry.csv"), REG_CSV).unwrap();

    let output = flens()
        .arg("score")
        .arg("--registry")
        .arg(dir.path().join("registry.csv"))
        .args(["--vehicle", "KA03AB1234", "--as-of", "2026-02-01"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["score"], 80);
    assert_eq!(json["violations"][0], "Fine Pending: 500 (No Helmet)");
    assert_eq!(json["statuses"]["fine"], "Pending");
}

#[test]
fn score_unknown_vehicle_uses_sentinel() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("registry.csv"), REG_CSV).unwrap();

    let output = flens()
        .arg("score")
        .arg("--registry")
        .arg(dir.path().join("registry.csv"))
        .args(["--vehicle", "ZZ99XX9999", "--as-of", "2026-02-01"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["score"], 20);
    assert!(String::from_utf8_lossy(&output.stderr).contains("not in registry"));
}
