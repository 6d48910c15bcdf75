use super::*;

// =============================================================================
// detect_mode — full truth table over (override, url, key).
// =============================================================================

#[test]
fn live_requires_override_off_and_both_credentials() {
    assert_eq!(detect_mode(false, "https://id.example.com", "anon-key"), Mode::Live);
}

#[test]
fn every_other_combination_is_demo() {
    let cases = [
        (true, "https://id.example.com", "anon-key"),
        (true, "https://id.example.com", ""),
        (true, "", "anon-key"),
        (true, "", ""),
        (false, "", "anon-key"),
        (false, "https://id.example.com", ""),
        (false, "", ""),
    ];
    for (demo_override, url, key) in cases {
        assert_eq!(
            detect_mode(demo_override, url, key),
            Mode::Demo,
            "expected demo for ({demo_override}, {url:?}, {key:?})"
        );
    }
}

// =============================================================================
// env_bool — uses unique env var names to avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on"].iter().enumerate() {
        let key = format!("__VS_TEST_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__VS_TEST_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_case_insensitive_and_trimmed() {
    let key = "__VS_TEST_EB_CI_771__";
    unsafe { std::env::set_var(key, "  TRUE  ") };
    assert_eq!(env_bool(key), Some(true));
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_bool_invalid_or_unset_returns_none() {
    let key = "__VS_TEST_EB_INVALID_882__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_bool("__VS_TEST_EB_SURELY_UNSET_42__"), None);
}

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_falls_back_on_garbage() {
    let key = "__VS_TEST_EP_GARBAGE_19__";
    unsafe { std::env::set_var(key, "not-a-port") };
    assert_eq!(env_parse(key, 3000u16), 3000);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_reads_valid_value() {
    let key = "__VS_TEST_EP_VALID_20__";
    unsafe { std::env::set_var(key, "8080") };
    assert_eq!(env_parse(key, 3000u16), 8080);
    unsafe { std::env::remove_var(key) };
}

// =============================================================================
// AppConfig::from_env
//
// # Safety
// These mutate shared env vars; run with `--test-threads=1` to avoid races.
// =============================================================================

unsafe fn clear_app_env() {
    unsafe {
        std::env::remove_var("AUTH_URL");
        std::env::remove_var("AUTH_ANON_KEY");
        std::env::remove_var("DEMO_MODE");
        std::env::remove_var("API_URL");
        std::env::remove_var("PORT");
    }
}

#[test]
fn from_env_defaults_to_demo_with_no_credentials() {
    unsafe { clear_app_env() };

    let cfg = AppConfig::from_env();
    assert_eq!(cfg.mode, Mode::Demo);
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.port, DEFAULT_PORT);

    unsafe { clear_app_env() };
}

#[test]
fn from_env_goes_live_with_credentials() {
    unsafe {
        clear_app_env();
        std::env::set_var("AUTH_URL", "https://id.example.com/");
        std::env::set_var("AUTH_ANON_KEY", "anon-key");
        std::env::set_var("API_URL", "https://api.example.com/");
        std::env::set_var("PORT", "4000");
    }

    let cfg = AppConfig::from_env();
    assert_eq!(cfg.mode, Mode::Live);
    assert_eq!(cfg.provider_url, "https://id.example.com");
    assert_eq!(cfg.api_url, "https://api.example.com");
    assert_eq!(cfg.port, 4000);

    unsafe { clear_app_env() };
}

#[test]
fn from_env_override_forces_demo_despite_credentials() {
    unsafe {
        clear_app_env();
        std::env::set_var("AUTH_URL", "https://id.example.com");
        std::env::set_var("AUTH_ANON_KEY", "anon-key");
        std::env::set_var("DEMO_MODE", "true");
    }

    let cfg = AppConfig::from_env();
    assert_eq!(cfg.mode, Mode::Demo);

    unsafe { clear_app_env() };
}
