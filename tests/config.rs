// ABOUTME: Integration tests for configuration parsing and discovery.
// ABOUTME: Tests YAML parsing, env-referenced API keys and conversion into wrapper options.

use liftoff::api::{DEFAULT_API_URL, MemoryApi};
use liftoff::config::*;
use liftoff::error::Error;
use liftoff::HerokuWrapper;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = Config::from_yaml("app: my-app\n").unwrap();
        assert_eq!(config.app.unwrap().as_str(), "my-app");
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.rendezvous.activity_timeout, Duration::from_secs(3600));
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
app: my-app
api_key:
  env: LIFTOFF_TEST_CONFIG_KEY
  default: fallback
api_url: http://localhost:5000
ca_bundle: /etc/ssl/custom.pem
rendezvous:
  activity_timeout: 30m
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config.api_key,
            Some(EnvValue::FromEnv {
                var: "LIFTOFF_TEST_CONFIG_KEY".to_string(),
                default: Some("fallback".to_string()),
            })
        );
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(
            config.ca_bundle.as_deref(),
            Some(std::path::Path::new("/etc/ssl/custom.pem"))
        );
        assert_eq!(config.rendezvous.activity_timeout, Duration::from_secs(1800));

        let api = config.api_config();
        assert_eq!(api.base_url, "http://localhost:5000");
        assert!(api.ca_bundle.is_some());
        assert_eq!(
            config.rendezvous_config().activity_timeout,
            Duration::from_secs(1800)
        );
    }

    #[test]
    fn literal_api_key() {
        let config = Config::from_yaml("api_key: LITERAL_KEY\n").unwrap();
        assert_eq!(
            config.api_key,
            Some(EnvValue::Literal("LITERAL_KEY".to_string()))
        );
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert!(config.app.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn unknown_field_returns_error() {
        let result = Config::from_yaml("app: my-app\nservers: []\n");
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn invalid_app_name_returns_error() {
        let result = Config::from_yaml("app: \"my app\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_duration_returns_error() {
        let result = Config::from_yaml("rendezvous:\n  activity_timeout: soon\n");
        assert!(result.is_err());
    }
}

mod env_values {
    use super::*;

    #[test]
    fn env_reference_resolves() {
        let value = EnvValue::FromEnv {
            var: "LIFTOFF_TEST_ENV_SET".to_string(),
            default: None,
        };
        temp_env::with_var("LIFTOFF_TEST_ENV_SET", Some("FROM_ENV"), || {
            assert_eq!(value.resolve().unwrap(), "FROM_ENV");
        });
    }

    #[test]
    fn env_reference_uses_default() {
        let value = EnvValue::FromEnv {
            var: "LIFTOFF_TEST_ENV_DEFAULT".to_string(),
            default: Some("DEFAULT".to_string()),
        };
        temp_env::with_var_unset("LIFTOFF_TEST_ENV_DEFAULT", || {
            assert_eq!(value.resolve().unwrap(), "DEFAULT");
        });
    }

    #[test]
    fn empty_env_reference_uses_default() {
        let value = EnvValue::FromEnv {
            var: "LIFTOFF_TEST_ENV_EMPTY".to_string(),
            default: Some("DEFAULT".to_string()),
        };
        temp_env::with_var("LIFTOFF_TEST_ENV_EMPTY", Some(""), || {
            assert_eq!(value.resolve().unwrap(), "DEFAULT");
        });
    }

    #[test]
    fn missing_env_reference_errors() {
        let value = EnvValue::FromEnv {
            var: "LIFTOFF_TEST_ENV_MISSING".to_string(),
            default: None,
        };
        temp_env::with_var_unset("LIFTOFF_TEST_ENV_MISSING", || {
            assert!(matches!(
                value.resolve(),
                Err(Error::MissingEnvVar(var)) if var == "LIFTOFF_TEST_ENV_MISSING"
            ));
        });
    }

    #[test]
    fn wrapper_options_carry_resolved_key() {
        let config =
            Config::from_yaml("app: my-app\napi_key:\n  env: LIFTOFF_TEST_OPTIONS_KEY\n").unwrap();

        temp_env::with_var("LIFTOFF_TEST_OPTIONS_KEY", Some("CONFIG_KEY"), || {
            let options = config.wrapper_options().unwrap().api(MemoryApi::new());
            let wrapper = HerokuWrapper::new(config.app.clone().unwrap(), options).unwrap();
            assert_eq!(wrapper.api_key().unwrap(), "CONFIG_KEY");
        });
    }

    #[test]
    fn wrapper_options_fail_on_missing_env() {
        let config = Config::from_yaml("api_key:\n  env: LIFTOFF_TEST_OPTIONS_MISSING\n").unwrap();

        temp_env::with_var_unset("LIFTOFF_TEST_OPTIONS_MISSING", || {
            assert!(matches!(
                config.wrapper_options(),
                Err(Error::MissingEnvVar(_))
            ));
        });
    }
}

mod discovery {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "app: primary\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.app.unwrap().as_str(), "primary");
    }

    #[test]
    fn discovers_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".liftoff")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), "app: nested\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.app.unwrap().as_str(), "nested");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover_or_default(dir.path()).unwrap();
        assert!(config.app.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn broken_file_is_still_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), "app: [").unwrap();
        assert!(Config::discover_or_default(dir.path()).is_err());
    }
}
