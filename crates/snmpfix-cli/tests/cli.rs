use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{AesMode, ZipWriter};

const VALID: &str = "snmp-server host 10.0.0.5 version 2c rightcommunity";

/// A command isolated from the user's config and environment
fn snmpfix(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("snmpfix").unwrap();
    cmd.env("SNMPFIX_CONFIG", dir.join("config.toml"))
        .env_remove("DNAC_URL")
        .env_remove("DNAC_USER")
        .env_remove("DNAC_PASS")
        .env_remove("SNMPFIX_ARCHIVE_SECRET")
        .env("RUST_LOG", "off")
        .arg("--no-color");
    cmd
}

fn policy_args() -> [&'static str; 6] {
    [
        "--valid-host",
        "10.0.0.5",
        "--valid-community",
        "rightcommunity",
        "--intended-line",
        VALID,
    ]
}

fn write_export(root: &Path) {
    for (ip, text) in [
        ("10.1.0.1", format!("hostname sw1\n{VALID}\n")),
        (
            "10.1.0.2",
            "hostname sw2\nsnmp-server host 10.0.0.1 version 2c wrongcommunity\n".to_string(),
        ),
    ] {
        let folder = root.join(ip);
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join(format!("{ip}_RUNNINGCONFIG.cfg")), text).unwrap();
        std::fs::write(folder.join(format!("{ip}_STARTUPCONFIG.cfg")), "ignored").unwrap();
    }
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    snmpfix(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("audit"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("devices"));
}

#[test]
fn test_audit_single_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("sw9.cfg");
    std::fs::write(
        &file,
        "hostname sw9\nsnmp-server host 192.0.2.1 public\nsnmp-server host 10.0.0.5 wrong\n",
    )
    .unwrap();

    snmpfix(dir.path())
        .arg("audit")
        .arg(&file)
        .args(policy_args())
        .assert()
        .success()
        .stdout(predicate::str::contains("no snmp-server host 192.0.2.1 public"))
        .stdout(predicate::str::contains("no snmp-server host 10.0.0.5 wrong"))
        .stdout(predicate::str::contains(VALID));
}

#[test]
fn test_audit_export_directory_json() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("export");
    write_export(&export);

    let output = snmpfix(dir.path())
        .args(["--output", "json", "audit"])
        .arg(&export)
        .args(policy_args())
        .arg("--show-template")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["compliant"], 1);
    assert_eq!(report["non_compliant"], 1);
    assert_eq!(report["no_config_found"], 0);
    assert_eq!(report["devices"][1]["management_ip_address"], "10.1.0.2");
    assert_eq!(report["devices"][1]["status"], "non_compliant");

    let body = report["template_body"].as_str().unwrap();
    assert!(body.starts_with("#if($device_ip == '10.1.0.2')"));
    assert!(!body.contains("10.1.0.1"));
}

#[test]
fn test_audit_encrypted_export() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("export.zip");

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().with_aes_encryption(AesMode::Aes256, "Secret123!");
    writer
        .start_file("10.1.0.3/sw3_RUNNINGCONFIG.cfg", options)
        .unwrap();
    writer.write_all(b"hostname sw3\n").unwrap();
    std::fs::write(&archive, writer.finish().unwrap().into_inner()).unwrap();

    snmpfix(dir.path())
        .args(["--output", "csv", "audit"])
        .arg(&archive)
        .args(policy_args())
        .args(["--secret", "Secret123!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.1.0.3"))
        .stdout(predicate::str::contains("non_compliant"));

    snmpfix(dir.path())
        .arg("audit")
        .arg(&archive)
        .args(policy_args())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--secret"));

    snmpfix(dir.path())
        .arg("audit")
        .arg(&archive)
        .args(policy_args())
        .args(["--secret", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("decryption failed"));
}

#[test]
fn test_audit_requires_policy() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("sw.cfg");
    std::fs::write(&file, "hostname sw\n").unwrap();

    snmpfix(dir.path())
        .arg("audit")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--valid-host"));
}

#[test]
fn test_audit_uses_configured_policy() {
    let dir = TempDir::new().unwrap();
    for (key, value) in [
        ("valid_host", "10.0.0.5"),
        ("valid_community", "rightcommunity"),
        ("intended_line", VALID),
    ] {
        snmpfix(dir.path())
            .args(["config", "set", key, value])
            .assert()
            .success();
    }

    let file = dir.path().join("sw.cfg");
    std::fs::write(&file, format!("{VALID}\n")).unwrap();
    snmpfix(dir.path())
        .args(["--output", "json", "audit"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"compliant\": 1"));
}

#[test]
fn test_config_set_show_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    snmpfix(dir.path())
        .args(["config", "set", "password", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());
    snmpfix(dir.path())
        .args(["config", "set", "url", "https://dnac.example.net"])
        .assert()
        .success();

    snmpfix(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://dnac.example.net"))
        .stdout(predicate::str::contains("hunter2").not());

    snmpfix(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_string_lossy().as_ref()));

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("hunter2"));

    snmpfix(dir.path())
        .args(["config", "set", "api_key", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_run_requires_controller_url() {
    let dir = TempDir::new().unwrap();
    snmpfix(dir.path())
        .arg("run")
        .args(policy_args())
        .args(["--project", "Remediation", "--template", "snmp-fix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Controller URL required"));
}

#[test]
fn test_run_rejects_inconsistent_policy() {
    let dir = TempDir::new().unwrap();
    snmpfix(dir.path())
        .args(["run", "--valid-host", "10.0.0.5", "--valid-community", "rightcommunity"])
        .args(["--intended-line", "snmp-server host 10.0.0.9 version 2c rightcommunity"])
        .args(["--project", "Remediation", "--template", "snmp-fix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("intended line"));
}

#[test]
fn test_run_requires_template_name() {
    let dir = TempDir::new().unwrap();
    snmpfix(dir.path())
        .arg("run")
        .args(policy_args())
        .args(["--project", "Remediation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template name required"));
}
