use std::fs;

use solar_economics_toolbox::{
    config::{self, Config},
    economics::InputPolicy,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("solar_economics_{}_{name}", std::process::id()))
}

#[test]
fn missing_file_is_created_with_defaults() {
    let path = temp_path("created.toml");
    let _ = fs::remove_file(&path);
    let cfg = config::load_or_create(&path).expect("create config");
    assert_eq!(cfg, Config::default());
    assert!(path.exists());
    let _ = fs::remove_file(&path);
}

#[test]
fn saved_settings_survive_reload() {
    let path = temp_path("roundtrip.toml");
    let mut cfg = Config::default();
    cfg.language = "de-de".into();
    cfg.input_policy = InputPolicy::Clamp;
    cfg.report_delay_ms = 500;
    cfg.constants.electricity_unit_price = 0.31;
    cfg.constants.currency_symbol = "CHF".into();
    cfg.save_to(&path).expect("save");
    let loaded = config::load_from(&path).expect("load");
    assert_eq!(loaded, cfg);
    let _ = fs::remove_file(&path);
}

#[test]
fn malformed_file_reports_parse_error() {
    let path = temp_path("broken.toml");
    fs::write(&path, "report_delay_ms = \"soon\"").expect("write");
    assert!(matches!(
        config::load_from(&path),
        Err(config::ConfigError::Serde(_))
    ));
    let _ = fs::remove_file(&path);
}
