use super::*;
use config_manager::ConfigurationError;

#[test]
fn test_integration_error_display_is_passed_through() {
    let error = Error::from(IntegrationError::UnknownAccount {
        id: "p9".to_string(),
    });

    assert_eq!(error.to_string(), "Unknown account 'p9'");
    assert_eq!(error.exit_code(), 1);
}

#[test]
fn test_configuration_error_is_wrapped() {
    let error = Error::from(IntegrationError::from(ConfigurationError::ParseError {
        reason: "bad toml".to_string(),
    }));

    assert!(error.to_string().contains("bad toml"));
    assert_eq!(error.exit_code(), 1);
}

#[test]
fn test_invalid_arguments_error_display() {
    let error = Error::InvalidArguments("no account ids given".to_string());

    assert_eq!(error.to_string(), "Invalid arguments: no account ids given");
    assert_eq!(error.exit_code(), 2);
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
