use wh_config::{load_layered_yaml_from_strings, report_unused_keys, UnusedKeyPolicy};

/// Unused-key guard.
///
/// Validates:
/// 1) Unused keys are detected in WARN mode but do not error.
/// 2) Unused keys cause failure in FAIL mode.
/// 3) Keys the service reads are not flagged.
/// 4) Deterministic ordering of unused pointers.

const CONSUMED_ONLY: &str = r#"
database:
  url_env: "WH_DATABASE_URL"
  max_connections: 4
  acquire_timeout_secs: 5
daemon:
  addr: "127.0.0.1:8080"
"#;

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = r#"
database:
  url_env: "WH_DATABASE_URL"
  pool_name: "primary"
swagger:
  enabled: true
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let report =
        report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn).expect("warn must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec![
            "/database/pool_name".to_string(),
            "/swagger/enabled".to_string()
        ],
        "unused pointers must be sorted and exclude consumed keys"
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = r#"
database:
  url_env: "WH_DATABASE_URL"
legacy:
  connection_name: "Default"
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let err = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect_err("fail mode must error")
        .to_string();

    assert!(err.contains("CONFIG_UNUSED_KEYS"), "got: {err}");
    assert!(err.contains("/legacy/connection_name"), "got: {err}");
}

#[test]
fn consumed_keys_are_clean_in_fail_mode() {
    let loaded = load_layered_yaml_from_strings(&[CONSUMED_ONLY]).unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("fully consumed config must pass");
    assert!(report.is_clean());
}

#[test]
fn shipped_base_layer_is_fully_consumed() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/base.yaml");
    let loaded = wh_config::load_layered_yaml(&[path]).expect("base layer must load");
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("base layer must not carry unread keys");
    assert!(report.is_clean());

    let pool = wh_config::pool_settings(&loaded.config_json).unwrap();
    assert_eq!(pool.max_connections, 10);
    assert_eq!(
        wh_config::daemon_addr(&loaded.config_json).unwrap().to_string(),
        "127.0.0.1:8080"
    );
}
