//! Unit tests for session configuration parsing.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::rstest;
use tempfile::TempDir;

use super::*;

struct KeyFile {
    _dir: TempDir,
    path: String,
}

fn key_file(len: usize) -> KeyFile {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("session_key");
    Dir::open_ambient_dir(dir.path(), ambient_authority())
        .and_then(|root| root.write("session_key", vec![b'k'; len]))
        .expect("write key file");
    KeyFile {
        path: path.to_str().expect("utf-8 temp path").to_owned(),
        _dir: dir,
    }
}

fn env_with(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_env(key_path: &str, overrides: &[(&'static str, &'static str)]) -> MockEnv {
    let mut vars = vec![
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ];
    for (name, value) in overrides {
        vars.retain(|(existing, _)| existing != name);
        vars.push((name, value));
    }
    env_with(&vars)
}

#[rstest]
fn release_accepts_a_complete_configuration() {
    let key = key_file(KEY_MIN_LEN);
    let settings = session_settings_from_env(&release_env(&key.path, &[]), BuildMode::Release)
        .expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(#[case] missing: &'static str) {
    let key = key_file(KEY_MIN_LEN);
    let vars: Vec<(&str, &str)> = [
        (KEY_FILE_ENV, key.path.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Lax"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]
    .into_iter()
    .filter(|(name, _)| *name != missing)
    .collect();
    let result = session_settings_from_env(&env_with(&vars), BuildMode::Release);
    assert!(
        matches!(result, Err(SessionConfigError::MissingEnv { name }) if name == missing),
        "expected {missing} to be required"
    );
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "2")]
fn release_rejects_malformed_toggles(#[case] name: &'static str, #[case] value: &'static str) {
    let key = key_file(KEY_MIN_LEN);
    let result =
        session_settings_from_env(&release_env(&key.path, &[(name, value)]), BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::InvalidEnv { name: got, .. }) if got == name
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure() {
    let key = key_file(KEY_MIN_LEN);
    let env = release_env(&key.path, &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]);
    assert!(matches!(
        session_settings_from_env(&env, BuildMode::Release),
        Err(SessionConfigError::InsecureSameSiteNone)
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key = key_file(KEY_MIN_LEN);
    let env = release_env(&key.path, &[(ALLOW_EPHEMERAL_ENV, "yes")]);
    assert!(matches!(
        session_settings_from_env(&env, BuildMode::Release),
        Err(SessionConfigError::EphemeralNotAllowed)
    ));
}

#[rstest]
fn release_rejects_short_keys() {
    let key = key_file(KEY_MIN_LEN - 1);
    assert!(matches!(
        session_settings_from_env(&release_env(&key.path, &[]), BuildMode::Release),
        Err(SessionConfigError::KeyTooShort { length, .. }) if length == KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_missing_key_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent");
    let env = release_env(missing.to_str().expect("utf-8 path"), &[]);
    assert!(matches!(
        session_settings_from_env(&env, BuildMode::Release),
        Err(SessionConfigError::KeyRead { .. })
    ));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent");
    let env = env_with(&[
        (KEY_FILE_ENV, missing.to_str().expect("utf-8 path")),
        (SAMESITE_ENV, "bogus"),
    ]);
    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug tolerates defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case(0)]
#[case(8)]
#[case(KEY_DERIVE_MIN_LEN - 1)]
fn debug_replaces_underivable_keys(#[case] len: usize) {
    let key = key_file(len);
    let env = env_with(&[(KEY_FILE_ENV, key.path.as_str())]);
    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug tolerates short keys");
    let derived = Key::derive_from(&[b'k'; KEY_DERIVE_MIN_LEN]);
    assert_ne!(key_fingerprint(&settings.key), key_fingerprint(&derived));
}

#[rstest]
fn debug_derives_keys_below_the_release_minimum() {
    let key = key_file(KEY_DERIVE_MIN_LEN);
    let env = env_with(&[(KEY_FILE_ENV, key.path.as_str())]);
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("derivable key");
    let expected = Key::derive_from(&[b'k'; KEY_DERIVE_MIN_LEN]);
    assert_eq!(key_fingerprint(&settings.key), key_fingerprint(&expected));
}

#[rstest]
fn fingerprints_are_stable_short_lowercase_hex() {
    let key = Key::derive_from(&[b'a'; 64]);
    let fingerprint = key_fingerprint(&key);
    assert_eq!(fingerprint, key_fingerprint(&key));
    assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
    assert!(
        fingerprint
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    );
    assert_ne!(fingerprint, key_fingerprint(&Key::derive_from(&[b'b'; 64])));
}
