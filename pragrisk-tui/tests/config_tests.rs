use pragrisk_test_utils::fixtures;
use pragrisk_tui::config::{AuthConfig, ConfigError, ThemeConfig, TuiConfig};
use pragrisk_tui::nav::View;
use pragrisk_tui::persistence::{self, PersistedState};
use proptest::prelude::*;

const VALID_TOML: &str = r#"
api_base_url = "https://risk.example.org"
request_timeout_ms = 5000
refresh_interval_ms = 1000
items_per_page = 20
persistence_path = "state/pragrisk-tui.json"
error_log_path = "logs/pragrisk-tui.log"
log_filter = "pragrisk_tui=debug"

[auth]
jwt = "token"

[theme]
name = "synthbrute"
"#;

fn base_config() -> TuiConfig {
    fixtures::test_config(std::path::Path::new("tmp"))
}

#[test]
fn config_parses_and_validates() {
    let config = TuiConfig::from_toml(VALID_TOML).unwrap();
    assert_eq!(config.api_base_url, "https://risk.example.org");
    assert_eq!(config.auth.jwt.as_deref(), Some("token"));
    assert_eq!(config.log_filter.as_deref(), Some("pragrisk_tui=debug"));
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_unknown_fields() {
    let contents = VALID_TOML.replace("[auth]", "retries = 3\n\n[auth]");
    assert!(matches!(TuiConfig::from_toml(&contents), Err(ConfigError::Parse(_))));
}

#[test]
fn config_requires_every_field() {
    let contents = VALID_TOML.replace("items_per_page = 20\n", "");
    assert!(matches!(TuiConfig::from_toml(&contents), Err(ConfigError::Parse(_))));
}

#[test]
fn config_from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pragrisk-tui.toml");
    std::fs::write(&path, VALID_TOML).unwrap();

    let config = TuiConfig::from_path(&path).unwrap();
    assert_eq!(config.items_per_page, 20);

    let missing = TuiConfig::from_path(&dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}

#[test]
fn config_requires_auth() {
    let mut config = base_config();
    config.auth = AuthConfig {
        api_key: None,
        jwt: None,
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "auth", .. })
    ));
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_http_base_url() {
    let mut config = base_config();
    config.api_base_url = "ftp://risk.example.org".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "api_base_url", .. })
    ));
}

#[test]
fn config_rejects_zero_page_size() {
    let mut config = base_config();
    config.items_per_page = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "items_per_page", .. })
    ));
}

proptest! {
    #[test]
    fn positive_timeouts_validate(timeout in 1u64..600_000, refresh in 1u64..60_000) {
        let mut config = base_config();
        config.request_timeout_ms = timeout;
        config.refresh_interval_ms = refresh;
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn persisted_state_round_trips(index in 0usize..6, search in proptest::option::of("[a-z ]{1,20}")) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let state = PersistedState {
            active_view: View::from_index(index).unwrap(),
            search,
        };

        persistence::save(&path, &state).unwrap();
        prop_assert_eq!(persistence::load(&path).unwrap(), Some(state));
    }
}

#[test]
fn missing_state_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(persistence::load(&dir.path().join("state.json")).unwrap().is_none());
}

#[test]
fn corrupt_state_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(persistence::load(&path).is_err());
}
