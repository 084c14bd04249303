use std::path::Path;

use regrade::{
    MalformedPolicy,
    config::{self, CONCURRENCY_ENV, DRY_RUN_ENV, MALFORMED_ENV, STORE_ENV},
    reconcile::DEFAULT_CONCURRENCY,
};

fn clear() {
    for key in [STORE_ENV, CONCURRENCY_ENV, MALFORMED_ENV, DRY_RUN_ENV] {
        // SAFETY: this is the only test in this binary that touches the
        // environment.
        unsafe { std::env::remove_var(key) };
    }
    config::reset();
}

fn set(key: &str, value: &str) {
    // SAFETY: see `clear`.
    unsafe { std::env::set_var(key, value) };
    config::reset();
}

#[test]
fn configuration_is_read_from_the_environment() {
    clear();
    let defaults = config::ensure_initialized().expect("defaults");
    assert_eq!(defaults.store_path(), None);
    assert_eq!(defaults.concurrency(), DEFAULT_CONCURRENCY);
    assert_eq!(defaults.malformed(), MalformedPolicy::Lenient);
    assert!(!defaults.dry_run());

    set(STORE_ENV, " /srv/quiz/store.json ");
    set(CONCURRENCY_ENV, "3");
    set(MALFORMED_ENV, "STRICT");
    set(DRY_RUN_ENV, "yes");
    let cfg = config::ensure_initialized().expect("configured");
    assert_eq!(cfg.store_path(), Some(Path::new("/srv/quiz/store.json")));
    assert_eq!(cfg.concurrency(), 3);
    assert_eq!(cfg.malformed(), MalformedPolicy::Strict);
    assert!(cfg.dry_run());

    // Cached until reset.
    unsafe { std::env::set_var(CONCURRENCY_ENV, "5") };
    assert_eq!(config::ensure_initialized().expect("cached").concurrency(), 3);

    set(MALFORMED_ENV, "pedantic");
    assert_eq!(
        config::ensure_initialized().expect("fallback").malformed(),
        MalformedPolicy::Lenient
    );

    set(CONCURRENCY_ENV, "0");
    assert!(config::ensure_initialized().is_err());
    set(CONCURRENCY_ENV, "many");
    assert!(config::ensure_initialized().is_err());

    clear();
}
