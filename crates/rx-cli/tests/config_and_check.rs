//! Integration test: a registry configuration file plus a schema that
//! references its learned types, driven through the CLI handlers.

use std::path::PathBuf;

use rx_cli::check::{run_check, CheckArgs};
use rx_cli::document::load_registry;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_learned_types_from_config_drive_check() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        &dir,
        "rx.yaml",
        r#"
prefixes:
  svc: "tag:example.com,2024:svc/"
types:
  /svc/a-port: { type: //int, range: { min: 1, max: 65535 } }
  /svc/b-endpoint:
    type: //rec
    required:
      host: { type: //str, length: { min: 1 } }
      port: /svc/a-port
    optional:
      tls: //bool
"#,
    );
    let good = write(&dir, "good.json", r#"{"host": "db", "port": 5432, "tls": true}"#);
    let bad = write(&dir, "bad.yaml", "host: db\nport: 0\n");

    let registry = load_registry(Some(&config)).unwrap();

    let pass = CheckArgs {
        schema: "/svc/b-endpoint".to_string(),
        values: vec![good.clone()],
    };
    assert_eq!(run_check(&pass, &registry).unwrap(), 0);

    let fail = CheckArgs {
        schema: "/svc/b-endpoint".to_string(),
        values: vec![good, bad],
    };
    assert_eq!(run_check(&fail, &registry).unwrap(), 1);
}

#[test]
fn test_duplicate_prefix_in_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "rx.json", r#"{"prefixes": {".meta": "tag:example.com:m/"}}"#);
    let err = load_registry(Some(&config)).unwrap_err();
    assert!(format!("{err:#}").contains("already registered"));
}
