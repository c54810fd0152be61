//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write as _;

use mockable::MockEnv;
use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;

fn secret_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp secret file");
    file.write_all(&vec![b'a'; len]).expect("write secret");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_defaults(secret_path: String) -> HashMap<&'static str, String> {
    HashMap::from([
        (SECRET_FILE_ENV, secret_path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_missing_toggle_is_rejected(#[case] missing: &'static str) {
    let secret = secret_file(SESSION_SECRET_MIN_LEN);
    let mut vars = release_defaults(path_of(&secret));
    vars.remove(missing);
    let env = mock_env(vars);

    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected a missing toggle to fail",
    );
    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_invalid_cookie_secure_is_rejected(#[case] value: &str) {
    let secret = secret_file(SESSION_SECRET_MIN_LEN);
    let mut vars = release_defaults(path_of(&secret));
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());
    let env = mock_env(vars);

    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected invalid cookie secure to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_ephemeral_enabled_is_rejected() {
    let secret = secret_file(SESSION_SECRET_MIN_LEN);
    let mut vars = release_defaults(path_of(&secret));
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());
    let env = mock_env(vars);

    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected ephemeral to be rejected in release",
    );
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_missing_secret_file_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let absent = dir.path().join("absent").to_string_lossy().into_owned();
    let env = mock_env(release_defaults(absent));

    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected missing secret file to fail",
    );
    assert!(matches!(err, SessionConfigError::SecretRead { .. }));
}

#[rstest]
fn release_short_secret_is_rejected() {
    let secret = secret_file(SESSION_SECRET_MIN_LEN - 1);
    let env = mock_env(release_defaults(path_of(&secret)));

    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected short secret to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::SecretTooShort {
            min_len: SESSION_SECRET_MIN_LEN,
            ..
        }
    ));
}

#[rstest]
fn release_insecure_none_same_site_is_rejected() {
    let secret = secret_file(SESSION_SECRET_MIN_LEN);
    let mut vars = release_defaults(path_of(&secret));
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    let env = mock_env(vars);

    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected insecure SameSite=None to fail",
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_invalid_ttl_is_rejected() {
    let secret = secret_file(SESSION_SECRET_MIN_LEN);
    let mut vars = release_defaults(path_of(&secret));
    vars.insert(TTL_ENV, "-5".to_owned());
    let env = mock_env(vars);

    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected negative TTL to fail",
    );
    assert!(matches!(err, SessionConfigError::InvalidEnv { name: TTL_ENV, .. }));
}

#[rstest]
fn release_valid_settings_succeed() {
    let secret = secret_file(SESSION_SECRET_MIN_LEN);
    let mut vars = release_defaults(path_of(&secret));
    vars.insert(TTL_ENV, "3600".to_owned());
    let env = mock_env(vars);

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("expected valid settings");
    assert!(settings.cookie.secure);
    assert_eq!(settings.cookie.same_site, SameSite::Strict);
    assert_eq!(settings.cookie.max_age_secs, 3600);
    assert_eq!(settings.ttl, TimeDelta::hours(1));
    assert_eq!(settings.secret.as_slice(), vec![b'a'; SESSION_SECRET_MIN_LEN]);
}

#[rstest]
fn debug_defaults_allow_ephemeral_secret() {
    let dir = tempfile::tempdir().expect("temp dir");
    let absent = dir.path().join("absent").to_string_lossy().into_owned();
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, absent)]));

    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults should succeed");
    assert!(settings.cookie.secure);
    assert_eq!(settings.cookie.same_site, SameSite::Lax);
    assert_eq!(settings.ttl, TimeDelta::seconds(DEFAULT_SESSION_TTL_SECS));
    assert_eq!(settings.secret.len(), EPHEMERAL_SECRET_LEN);
}

#[rstest]
fn debug_invalid_values_fall_back_to_defaults() {
    let secret = secret_file(SESSION_SECRET_MIN_LEN);
    let mut vars = release_defaults(path_of(&secret));
    vars.insert(SAMESITE_ENV, "unexpected".to_owned());
    vars.insert(TTL_ENV, "soon".to_owned());
    let env = mock_env(vars);

    let settings = session_settings_from_env(&env, BuildMode::Debug)
        .expect("debug should fall back to defaults");
    assert_eq!(settings.cookie.same_site, SameSite::Lax);
    assert_eq!(settings.ttl, TimeDelta::seconds(DEFAULT_SESSION_TTL_SECS));
}

#[rstest]
fn ephemeral_secrets_differ() {
    assert_ne!(ephemeral_secret(), ephemeral_secret());
}
