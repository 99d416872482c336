use super::*;

use std::io::Write;

#[test]
fn default_settings_target_local_classifier() {
    let endpoint = Settings::default().endpoint().expect("endpoint");
    assert_eq!(endpoint.origin().as_str(), "http://localhost:5000/");
    assert_eq!(endpoint.upload_url().as_str(), "http://localhost:5000/upload");
    assert_eq!(endpoint.field_name(), "files");
}

#[test]
fn settings_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "server_url = \"https://classifier.internal:8443\"\nfield_name = \"documents\""
    )
    .expect("write settings");

    let settings = load_settings(Some(file.path())).expect("load");
    assert_eq!(settings.server_url, "https://classifier.internal:8443");
    assert_eq!(settings.upload_path, DEFAULT_UPLOAD_PATH);
    assert_eq!(settings.field_name, "documents");
}

#[test]
fn explicit_missing_settings_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");

    let err = load_settings(Some(missing.as_path())).expect_err("must fail");
    assert!(matches!(err, SettingsError::Read { .. }), "unexpected error: {err}");
}

#[test]
fn malformed_settings_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "server_url = ").expect("write settings");

    let err = load_settings(Some(file.path())).expect_err("must fail");
    assert!(matches!(err, SettingsError::Parse { .. }), "unexpected error: {err}");
}

#[test]
fn later_environment_variables_win() {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |name| match name {
        "SMARTDOC_SERVER_URL" => Some("http://first:5000".to_string()),
        "APP__SERVER_URL" => Some("http://second:5000".to_string()),
        "APP__UPLOAD_PATH" => Some("/classify".to_string()),
        _ => None,
    });

    assert_eq!(settings.server_url, "http://second:5000");
    assert_eq!(settings.upload_path, "/classify");
    assert_eq!(settings.field_name, DEFAULT_FIELD_NAME);
}

#[test]
fn upload_url_keeps_origin_path_prefix() {
    let settings = Settings {
        server_url: "http://gateway.local/smartdoc/".to_string(),
        ..Settings::default()
    };
    let endpoint = settings.endpoint().expect("endpoint");
    assert_eq!(
        endpoint.upload_url().as_str(),
        "http://gateway.local/smartdoc/upload"
    );
}

#[test]
fn rejects_non_http_server_url() {
    let settings = Settings {
        server_url: "ftp://files.local".to_string(),
        ..Settings::default()
    };
    let err = settings.endpoint().expect_err("must fail");
    assert!(err.to_string().contains("unsupported scheme"));

    let settings = Settings {
        server_url: "localhost:5000".to_string(),
        ..Settings::default()
    };
    assert!(matches!(
        settings.endpoint(),
        Err(SettingsError::InvalidServerUrl { .. })
    ));
}

#[test]
fn rejects_relative_upload_path_and_empty_field_name() {
    let settings = Settings {
        upload_path: "upload".to_string(),
        ..Settings::default()
    };
    assert!(matches!(
        settings.endpoint(),
        Err(SettingsError::InvalidUploadPath(_))
    ));

    let settings = Settings {
        field_name: "  ".to_string(),
        ..Settings::default()
    };
    assert!(matches!(settings.endpoint(), Err(SettingsError::EmptyFieldName)));
}
