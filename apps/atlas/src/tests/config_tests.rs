use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_without_file_or_env() {
    assert_eq!(settings_from_sources(None, no_env), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
        events_url = "https://events.test/api"
        database_url = "sqlite://./tmp/atlas.db"
        default_radius_meters = "25000"
    "#;
    let settings = settings_from_sources(Some(file), no_env);
    assert_eq!(settings.events_url.as_deref(), Some("https://events.test/api"));
    assert_eq!(settings.database_url, "sqlite://./tmp/atlas.db");
    assert_eq!(settings.default_radius_meters, 25_000.0);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn app_alias_beats_atlas_prefix_and_file() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("ATLAS_LOG_FILTER", "debug"),
        ("APP__LOG_FILTER", "trace"),
        ("ATLAS_EVENTS_FILE", "./events.json"),
    ]);
    let settings = settings_from_sources(Some("log_filter = \"warn\""), |name| {
        env.get(name).map(|v| v.to_string())
    });
    assert_eq!(settings.log_filter, "trace");
    assert_eq!(settings.events_file.as_deref(), Some("./events.json"));
}

#[test]
fn invalid_numbers_and_malformed_file_are_ignored() {
    let settings = settings_from_sources(Some("viewport_width = \"-4\""), |name| {
        (name == "ATLAS_VIEWPORT_HEIGHT").then(|| "tall".to_string())
    });
    assert_eq!(settings.viewport_width, 1024.0);
    assert_eq!(settings.viewport_height, 768.0);

    let broken = settings_from_sources(Some("not = [valid"), no_env);
    assert_eq!(broken, Settings::default());
}

#[test]
fn settings_file_is_read_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    std::fs::write(
        &path,
        "events_file = \"dump.json\"\nviewport_width = \"800\"\n",
    )
    .expect("write settings");

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.events_file.as_deref(), Some("dump.json"));
    assert_eq!(settings.viewport_width, 800.0);

    let missing = load_settings_from(&dir.path().join("absent.toml"), no_env);
    assert_eq!(missing, Settings::default());
}
