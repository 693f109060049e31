use super::*;
use romcheck_core::Platform;
use romcheck_dat::SizeBand;

#[test]
fn test_empty_file_is_all_defaults() {
    let settings = Settings::from_toml_str("").unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.sources.remote_base, DEFAULT_REMOTE_BASE);
    assert_eq!(settings.ttl(), Duration::from_secs(24 * 3600));
}

#[test]
fn test_huge_ttl_saturates() {
    let settings = Settings::from_toml_str("[cache]\nttl_hours = 9223372036854775807\n").unwrap();
    assert_eq!(settings.ttl(), Duration::from_secs(u64::MAX));
}

#[test]
fn test_partial_sections() {
    let text = r#"
[cache]
dir = "/tmp/romcheck-cache"
ttl_hours = 2

[classifier]
bin_disc_threshold = 1048576
iso_bands = [
    { min_bytes = 1000, platform = "gc" },
    { min_bytes = 0, platform = "psp" },
]
"#;
    let settings = Settings::from_toml_str(text).unwrap();
    assert_eq!(settings.cache.dir.as_deref(), Some(Path::new("/tmp/romcheck-cache")));
    assert_eq!(settings.ttl(), Duration::from_secs(2 * 3600));
    assert_eq!(settings.cache_dir().unwrap(), PathBuf::from("/tmp/romcheck-cache"));
    assert_eq!(settings.sources, SourceSettings::default());
    assert_eq!(settings.classifier.bin_disc_threshold, 1_048_576);
    assert_eq!(
        settings.classifier.iso_bands[0],
        SizeBand {
            min_bytes: 1000,
            platform: Platform::GameCube
        }
    );
}

#[test]
fn test_invalid_toml_is_an_error() {
    assert!(matches!(
        Settings::from_toml_str("[cache\nttl_hours = 1"),
        Err(ValidateError::Settings(_))
    ));
}

#[test]
fn test_load_or_default() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("missing.toml");
    assert_eq!(Settings::load_or_default(Some(&missing)), Settings::default());

    let broken = tmp.path().join("broken.toml");
    std::fs::write(&broken, "ttl_hours = [").unwrap();
    assert_eq!(Settings::load_or_default(Some(&broken)), Settings::default());

    let good = tmp.path().join("settings.toml");
    std::fs::write(&good, "[sources]\nremote_base = \"https://mirror.test/dats/\"\n").unwrap();
    let settings = Settings::load_or_default(Some(&good));
    assert_eq!(settings.sources.remote_base, "https://mirror.test/dats/");
}

#[test]
fn test_toml_string_reloads() {
    let mut settings = Settings::default();
    settings.sources.bundled_dir = Some(PathBuf::from("/opt/romcheck/dats"));
    let text = settings.to_toml_string().unwrap();
    assert!(text.contains("[sources]"));
    assert!(text.contains("ttl_hours = 24"));
    assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
}

#[test]
fn test_settings_path_file_name() {
    let path = settings_path();
    assert!(path.ends_with("romcheck/settings.toml"));
}
