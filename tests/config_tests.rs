//! Configuration layering tests: TOML file, then command-line flags.

use clap::Parser;
use tempfile::TempDir;

use geominder::cli::Cli;
use geominder::config::{StaticConfig, get_config, init_config};

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("geominder.toml");
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_file_values_then_cli_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[server]
port = 9100

[database]
path = "/srv/geo/GeoLite2-City.mmdb"

[cache]
max_size_mb = 128
"#,
    );

    let cli = Cli::try_parse_from(["geominder", "-c", path.as_str(), "--port", "9200"]).unwrap();
    let mut config = StaticConfig::load(cli.config.as_deref()).unwrap();
    cli.apply_overrides(&mut config);

    assert_eq!(config.server.port, 9200);
    assert_eq!(config.database.path, "/srv/geo/GeoLite2-City.mmdb");
    assert_eq!(config.cache.max_size_mb, 128);
    // 未出现在文件中的字段取默认值
    assert!(config.cache.enabled);
    assert_eq!(config.cache.ttl_secs, 86400);
    assert_eq!(config.cors.origin_policy, "*");
    assert!(config.validate().is_ok());
}

#[test]
fn test_no_cache_flag_skips_cache_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[cache]\nttl_secs = 0\n");

    let mut config = StaticConfig::load(Some(&path)).unwrap();
    assert!(config.validate().is_err());

    let cli = Cli::try_parse_from(["geominder", "--no-cache"]).unwrap();
    cli.apply_overrides(&mut config);
    assert!(config.validate().is_ok());
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server]\nport = \"not a number\"\n");

    let err = StaticConfig::load(Some(&path)).unwrap_err();
    assert_eq!(err.code(), "E006");
}

#[test]
fn test_global_config_is_replaceable() {
    let mut config = StaticConfig::default();
    config.database.path = "/tmp/replaced.mmdb".to_string();
    init_config(config);

    assert_eq!(get_config().database.path, "/tmp/replaced.mmdb");
}
