// ABOUTME: Tests for API key resolution from the environment and netrc files.
// ABOUTME: Env vars are isolated with temp-env, netrc files live in temp directories.

use liftoff::credentials::{
    CredentialsError, KeyExtractor, LocalKeyExtractor, StaticKeyExtractor,
};
use std::fs;

const NETRC: &str = "machine api.heroku.com\n  login me@example.com\n  password NETRC_API_KEY\n\
                     machine git.heroku.com\n  login me@example.com\n  password GIT_KEY\n";

fn netrc_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".netrc");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn env_var_wins_over_netrc() {
    let (_dir, path) = netrc_file(NETRC);
    let extractor = LocalKeyExtractor::new()
        .env_var("LIFTOFF_TEST_KEY_ENV_WINS")
        .netrc_path(&path);

    temp_env::with_var("LIFTOFF_TEST_KEY_ENV_WINS", Some("ENV_API_KEY"), || {
        assert_eq!(extractor.get_credentials().unwrap(), "ENV_API_KEY");
    });
}

#[test]
fn blank_env_var_falls_through_to_netrc() {
    let (_dir, path) = netrc_file(NETRC);
    let extractor = LocalKeyExtractor::new()
        .env_var("LIFTOFF_TEST_KEY_BLANK")
        .netrc_path(&path);

    temp_env::with_var("LIFTOFF_TEST_KEY_BLANK", Some("  "), || {
        assert_eq!(extractor.get_credentials().unwrap(), "NETRC_API_KEY");
    });
}

#[test]
fn reads_api_host_password_from_netrc() {
    let (_dir, path) = netrc_file(NETRC);
    let extractor = LocalKeyExtractor::new()
        .env_var("LIFTOFF_TEST_KEY_UNSET")
        .netrc_path(&path);

    temp_env::with_var_unset("LIFTOFF_TEST_KEY_UNSET", || {
        assert_eq!(extractor.get_credentials().unwrap(), "NETRC_API_KEY");
    });
}

#[test]
fn default_path_is_home_netrc() {
    let (dir, _path) = netrc_file(NETRC);
    let home = dir.path().to_str().unwrap().to_string();

    temp_env::with_vars(
        [("HOME", Some(home.as_str())), ("HEROKU_API_KEY", None)],
        || {
            let key = LocalKeyExtractor::default().get_credentials().unwrap();
            assert_eq!(key, "NETRC_API_KEY");
        },
    );
}

#[test]
fn missing_netrc_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".netrc");
    let extractor = LocalKeyExtractor::new()
        .env_var("LIFTOFF_TEST_KEY_MISSING")
        .netrc_path(&path);

    temp_env::with_var_unset("LIFTOFF_TEST_KEY_MISSING", || {
        let err = extractor.get_credentials().unwrap_err();
        assert!(matches!(err, CredentialsError::NotFound(p) if p == path));
    });
}

#[test]
fn netrc_without_api_host_is_not_found() {
    let (_dir, path) = netrc_file("machine git.heroku.com password GIT_KEY\n");
    let extractor = LocalKeyExtractor::new()
        .env_var("LIFTOFF_TEST_KEY_NO_HOST")
        .netrc_path(&path);

    temp_env::with_var_unset("LIFTOFF_TEST_KEY_NO_HOST", || {
        assert!(matches!(
            extractor.get_credentials(),
            Err(CredentialsError::NotFound(_))
        ));
    });
}

#[test]
fn malformed_netrc_is_reported() {
    let (_dir, path) = netrc_file("machine api.heroku.com password");
    let extractor = LocalKeyExtractor::new()
        .env_var("LIFTOFF_TEST_KEY_MALFORMED")
        .netrc_path(&path);

    temp_env::with_var_unset("LIFTOFF_TEST_KEY_MALFORMED", || {
        let err = extractor.get_credentials().unwrap_err();
        assert!(matches!(err, CredentialsError::Netrc { .. }));
        assert!(err.to_string().contains("password"));
    });
}

#[test]
fn static_extractor_returns_its_key() {
    assert_eq!(
        StaticKeyExtractor::new("API_KEY").get_credentials().unwrap(),
        "API_KEY"
    );
}
