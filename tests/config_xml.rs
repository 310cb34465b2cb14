use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use storage_console::config::{
    CONFIG_ENV_VAR, LoadResult, load_config_from_xml_path, load_or_init,
};
use storage_console::{Config, LogLevel, default_config_path};

#[test]
fn malformed_xml_errors() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    // Missing closing tag for ext_root
    let xml = r#"<config>
  <int_root>/tmp/int</int_root>
  <ext_root>/tmp/ext
</config>"#;
    fs::write(&cfg_path, xml).unwrap();
    let err = load_config_from_xml_path(&cfg_path).unwrap_err();
    assert!(format!("{err}").contains("parse config xml"));
}

#[test]
fn missing_tags_fall_back_to_defaults() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><ext_root>/srv/card</ext_root></config>").unwrap();
    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    let defaults = Config::default();
    assert_eq!(cfg.int_root, defaults.int_root);
    assert_eq!(cfg.ext_root, PathBuf::from("/srv/card"));
    assert_eq!(cfg.log_level, LogLevel::Normal);
    assert!(cfg.device_name.is_none());
}

#[test]
#[serial]
fn env_var_selects_the_config_file() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    fs::write(
        &cfg_path,
        "<config><int_root>/a</int_root><ext_root>/b</ext_root><log_level>debug</log_level></config>",
    )
    .unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, &cfg_path);
    }
    assert_eq!(default_config_path().unwrap(), cfg_path);
    match load_or_init().unwrap() {
        LoadResult::Loaded(cfg, path) => {
            assert_eq!(path, cfg_path);
            assert_eq!(cfg.int_root, PathBuf::from("/a"));
            assert_eq!(cfg.log_level, LogLevel::Debug);
        }
        other => panic!("expected Loaded, got {other:?}"),
    }
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }
}

#[test]
#[serial]
fn explicit_missing_file_uses_defaults_without_template() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("absent.xml");
    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, &cfg_path);
    }
    let loaded = load_or_init().unwrap();
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }
    assert!(matches!(loaded, LoadResult::Defaults(_)));
    assert!(!cfg_path.exists());
}
