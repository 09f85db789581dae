//! Environment-contract tests.
//!
//! These mutate process-wide environment variables, so they are serialized.

use serial_test::serial;
use sonde_runner::env;

#[test]
#[serial]
fn required_error_names_the_variable() {
    std::env::remove_var("SONDE_TEST_REQUIRED");
    let err = env::required("SONDE_TEST_REQUIRED").unwrap_err();
    assert!(err.to_string().contains("SONDE_TEST_REQUIRED"));
}

#[test]
#[serial]
fn required_rejects_blank_values() {
    std::env::set_var("SONDE_TEST_REQUIRED", "   ");
    let result = env::required("SONDE_TEST_REQUIRED");
    std::env::remove_var("SONDE_TEST_REQUIRED");
    assert!(result.is_err());
}

#[test]
#[serial]
fn required_trims_and_returns_the_value() {
    std::env::set_var("SONDE_TEST_REQUIRED", " 123456789012 ");
    let value = env::required("SONDE_TEST_REQUIRED").unwrap();
    std::env::remove_var("SONDE_TEST_REQUIRED");
    assert_eq!(value, "123456789012");
}

#[test]
#[serial]
fn optional_treats_empty_as_unset() {
    std::env::set_var("SONDE_TEST_OPTIONAL", "");
    let value = env::optional("SONDE_TEST_OPTIONAL");
    std::env::remove_var("SONDE_TEST_OPTIONAL");
    assert_eq!(value, None);
}

#[test]
#[serial]
fn parse_u64_defaults_when_unset() {
    std::env::remove_var("SONDE_TEST_DURATION");
    assert_eq!(env::parse_u64("SONDE_TEST_DURATION", 420).unwrap(), 420);
}

#[test]
#[serial]
fn parse_u64_reads_set_values() {
    std::env::set_var("SONDE_TEST_DURATION", "600");
    let value = env::parse_u64("SONDE_TEST_DURATION", 0).unwrap();
    std::env::remove_var("SONDE_TEST_DURATION");
    assert_eq!(value, 600);
}

#[test]
#[serial]
fn parse_u64_rejects_garbage_instead_of_defaulting() {
    std::env::set_var("SONDE_TEST_DURATION", "five minutes");
    let result = env::parse_u64("SONDE_TEST_DURATION", 0);
    std::env::remove_var("SONDE_TEST_DURATION");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("SONDE_TEST_DURATION"));
}
