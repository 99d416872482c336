use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;
use url::Url;

pub const SETTINGS_FILE: &str = "smartdoc.toml";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";
pub const DEFAULT_FIELD_NAME: &str = "files";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("upload path must start with '/': '{0}'")]
    InvalidUploadPath(String),
    #[error("multipart field name must not be empty")]
    EmptyFieldName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub upload_path: String,
    pub field_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            upload_path: DEFAULT_UPLOAD_PATH.into(),
            field_name: DEFAULT_FIELD_NAME.into(),
        }
    }
}

/// Loads settings from defaults, the settings file and the process environment.
///
/// `config_path` names an explicit file which must exist. Without it,
/// `smartdoc.toml` in the working directory is used when present.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(SETTINGS_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &path, &raw)?,
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "settings: no settings file, using defaults");
        }
        Err(source) => return Err(SettingsError::Read { path, source }),
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path, raw: &str) -> Result<(), SettingsError> {
    let file_cfg =
        toml::from_str::<HashMap<String, String>>(raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(v) = file_cfg.get("server_url") {
        settings.server_url = v.clone();
    }
    if let Some(v) = file_cfg.get("upload_path") {
        settings.upload_path = v.clone();
    }
    if let Some(v) = file_cfg.get("field_name") {
        settings.field_name = v.clone();
    }
    Ok(())
}

/// Applies environment overrides; later variables in each group win.
pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SMARTDOC_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__UPLOAD_PATH") {
        settings.upload_path = v;
    }

    if let Some(v) = lookup("APP__FIELD_NAME") {
        settings.field_name = v;
    }
}

/// Validated form of [`Settings`]: where uploads go and how parts are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEndpoint {
    origin: Url,
    upload_url: Url,
    field_name: String,
}

impl UploadEndpoint {
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

impl Settings {
    pub fn endpoint(&self) -> Result<UploadEndpoint, SettingsError> {
        let origin = parse_origin(&self.server_url)?;

        let upload_path = self.upload_path.trim();
        if !upload_path.starts_with('/') {
            return Err(SettingsError::InvalidUploadPath(self.upload_path.clone()));
        }

        let field_name = self.field_name.trim();
        if field_name.is_empty() {
            return Err(SettingsError::EmptyFieldName);
        }

        let joined = format!("{}{upload_path}", origin.as_str().trim_end_matches('/'));
        let upload_url = Url::parse(&joined).map_err(|err| SettingsError::InvalidServerUrl {
            url: joined.clone(),
            reason: err.to_string(),
        })?;

        Ok(UploadEndpoint {
            origin,
            upload_url,
            field_name: field_name.to_string(),
        })
    }
}

fn parse_origin(raw: &str) -> Result<Url, SettingsError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|err| SettingsError::InvalidServerUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::InvalidServerUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.host_str().is_none() {
        return Err(SettingsError::InvalidServerUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
