//! Integration tests for `${NAME}` injection, templatizing and existence checks.

use std::collections::BTreeMap;

use ownervault::crypto::CryptoConfig;
use ownervault::errors::VaultError;
use ownervault::vault::{
    inject, sanitize, templatize, templatize_from_vault, validate_exist, MemoryStore,
    SecretVault,
};

fn vault() -> SecretVault<MemoryStore> {
    SecretVault::new(MemoryStore::new(), CryptoConfig::with_iterations(1_000).unwrap()).unwrap()
}

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn sanitized_key_round_trips_through_template() {
    let v = vault();
    let key = sanitize("9 db-pass!");
    assert_eq!(key, "SECRET_9_DB_PASS");

    v.store(&key, "s3cret", "alice").unwrap();

    let report = validate_exist(&v, "host=${SECRET_9_DB_PASS}", "alice").unwrap();
    assert!(report.all_present);
    assert!(report.missing.is_empty());

    assert_eq!(
        inject(&v, "host=${SECRET_9_DB_PASS}", "alice").unwrap(),
        "host=s3cret"
    );
}

#[test]
fn inject_leaves_surrounding_text_untouched() {
    let v = vault();
    v.store("USER", "admin", "alice").unwrap();
    v.store("PASS", "hunter2", "alice").unwrap();

    let template = "# config\r\n  user: ${USER}\n\tpass: '${PASS}' $PASS ${lower} ${USER}\n";
    let rendered = inject(&v, template, "alice").unwrap();
    assert_eq!(
        rendered,
        "# config\r\n  user: admin\n\tpass: 'hunter2' $PASS ${lower} admin\n"
    );
}

#[test]
fn inject_without_tokens_is_identity() {
    let v = vault();
    let text = "plain text with $dollar and {braces}";
    assert_eq!(inject(&v, text, "alice").unwrap(), text);
}

#[test]
fn inject_is_all_or_nothing() {
    let v = vault();
    v.store("A", "1", "alice").unwrap();

    let err = inject(&v, "${A} ${B}", "alice").unwrap_err();
    match err {
        VaultError::MissingSecret(name) => assert_eq!(name, "B"),
        other => panic!("expected MissingSecret, got {other:?}"),
    }
}

#[test]
fn inject_uses_only_the_requesting_owners_secrets() {
    let v = vault();
    v.store("TOKEN", "bob-token", "bob").unwrap();

    assert!(matches!(
        inject(&v, "${TOKEN}", "alice"),
        Err(VaultError::MissingSecret(_))
    ));
}

#[test]
fn substituted_values_are_not_rescanned() {
    let v = vault();
    v.store("OUTER", "literal ${INNER}", "alice").unwrap();
    v.store("INNER", "should-not-appear", "alice").unwrap();

    assert_eq!(
        inject(&v, "x=${OUTER}", "alice").unwrap(),
        "x=literal ${INNER}"
    );
}

#[test]
fn inject_surfaces_tampering_instead_of_missing() {
    use ownervault::vault::SecretStore;

    let v = vault();
    v.store("K", "v", "alice").unwrap();
    let mut rec = v.backend().fetch("alice", "K").unwrap().unwrap();
    rec.auth_tag[0] ^= 0xff;
    v.backend().upsert(&rec).unwrap();

    assert!(matches!(
        inject(&v, "${K}", "alice"),
        Err(VaultError::Integrity(_))
    ));
}

#[test]
fn validate_exist_reports_every_missing_name() {
    let v = vault();
    v.store("PRESENT", "x", "alice").unwrap();

    let report = validate_exist(&v, "${MISSING_ONE} ${PRESENT} ${MISSING_TWO} ${MISSING_ONE}", "alice")
        .unwrap();
    assert!(!report.all_present);
    assert_eq!(report.missing, vec!["MISSING_ONE", "MISSING_TWO"]);
}

#[test]
fn validate_exist_does_not_decrypt() {
    use ownervault::vault::SecretStore;

    let v = vault();
    v.store("K", "v", "alice").unwrap();
    let mut rec = v.backend().fetch("alice", "K").unwrap().unwrap();
    rec.ciphertext[0] ^= 0x01;
    v.backend().upsert(&rec).unwrap();

    // Tampered but present.
    assert!(validate_exist(&v, "${K}", "alice").unwrap().all_present);
}

#[test]
fn templatize_replaces_every_occurrence() {
    let out = templatize(
        "url=postgres://app:pw123@db/app\nbackup=pw123",
        "alice",
        &map(&[("DB_PASS", "pw123")]),
    )
    .unwrap();
    assert_eq!(out, "url=postgres://app:${DB_PASS}@db/app\nbackup=${DB_PASS}");
}

#[test]
fn templatize_prefers_longer_values() {
    let out = templatize(
        "a=abc b=abcdef",
        "alice",
        &map(&[("SHORT", "abc"), ("LONG", "abcdef")]),
    )
    .unwrap();
    assert_eq!(out, "a=${SHORT} b=${LONG}");
}

#[test]
fn templatize_skips_empty_values_and_rejects_bad_names() {
    let out = templatize("unchanged", "alice", &map(&[("EMPTY", "")])).unwrap();
    assert_eq!(out, "unchanged");

    let err = templatize("x", "alice", &map(&[("not-valid", "x")])).unwrap_err();
    assert!(matches!(err, VaultError::Validation(_)));
}

#[test]
fn templatize_then_inject_restores_content() {
    let v = vault();
    v.store("API_KEY", "k-1234567890", "alice").unwrap();
    v.store("DB_PASS", "pw!", "alice").unwrap();

    let original = "api=k-1234567890\ndb=pw!\nother=unchanged\n";
    let template = templatize_from_vault(&v, original, "alice").unwrap();
    assert_eq!(template, "api=${API_KEY}\ndb=${DB_PASS}\nother=unchanged\n");

    assert_eq!(inject(&v, &template, "alice").unwrap(), original);
}

#[test]
fn templatize_does_not_touch_inserted_tokens() {
    let out = templatize(
        "pw=hunter2-long user=PASS",
        "alice",
        &map(&[("DB_PASS", "hunter2-long"), ("P", "PASS")]),
    )
    .unwrap();
    assert_eq!(out, "pw=${DB_PASS} user=${P}");
}

#[test]
fn templatize_leaves_existing_tokens_alone() {
    let out = templatize(
        "a=${DB_PASS} b=PASS c=${OTHER}",
        "alice",
        &map(&[("P", "PASS"), ("O", "OTHER")]),
    )
    .unwrap();
    assert_eq!(out, "a=${DB_PASS} b=${P} c=${OTHER}");
}

#[test]
fn templatize_round_trips_when_a_value_occurs_in_a_name() {
    let v = vault();
    v.store("DB_PASS", "hunter2-long", "alice").unwrap();
    v.store("P", "PASS", "alice").unwrap();

    let original = "pw=hunter2-long user=PASS\n";
    let template = templatize_from_vault(&v, original, "alice").unwrap();
    assert_eq!(template, "pw=${DB_PASS} user=${P}\n");
    assert_eq!(inject(&v, &template, "alice").unwrap(), original);
}

#[test]
fn templatize_matches_regex_metacharacters_literally() {
    let out = templatize(
        "a=p.a+s$ b=pXa+s$",
        "alice",
        &map(&[("WEIRD", "p.a+s$")]),
    )
    .unwrap();
    assert_eq!(out, "a=${WEIRD} b=pXa+s$");
}
