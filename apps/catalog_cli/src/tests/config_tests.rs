use super::{apply_env, apply_file, load_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
server_url = "https://catalog.example.org/api"
request_timeout_secs = 5
page_window = 4
"#,
    );

    assert_eq!(
        settings,
        Settings {
            server_url: "https://catalog.example.org/api".into(),
            request_timeout_secs: 5,
            page_window: 4,
        }
    );
}

#[test]
fn unparseable_file_and_bad_values_are_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "server_url = [");
    apply_file(&mut settings, "request_timeout_secs = -3\npage_window = \"wide\"");
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("CATALOG_SERVER_URL", "http://plain.test"),
            ("APP__SERVER_URL", "http://prefixed.test"),
            ("APP__REQUEST_TIMEOUT_SECS", "12"),
            ("APP__PAGE_WINDOW", "not-a-number"),
        ]),
    );

    assert_eq!(settings.server_url, "http://prefixed.test");
    assert_eq!(settings.request_timeout(), Duration::from_secs(12));
    assert_eq!(settings.page_window, Settings::default().page_window);
}

#[test]
fn zero_timeout_is_raised_to_one_second() {
    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
}

#[test]
fn validate_rejects_non_http_urls() {
    assert!(Settings::default().validate().is_ok());

    let settings = Settings {
        server_url: "file:///etc/catalog".into(),
        ..Settings::default()
    };
    let err = settings.validate().expect_err("file url");
    assert!(err.to_string().contains("file:///etc/catalog"));
}

#[test]
fn load_settings_reads_config_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("catalog_cli_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("catalog.toml");
    fs::write(&path, "page_window = 7\n").expect("write config");

    let settings = load_settings(&path);
    assert_eq!(settings.page_window, 7);

    fs::remove_dir_all(temp_root).expect("cleanup");
}
