use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    domain::{ClassificationResult, DownloadReference},
    error::ProtocolError,
};

/// One element of the upload response.
///
/// Serialized with an explicit `kind` discriminant. Deserialization also accepts
/// untagged items and tells them apart by which field is present (`class` or
/// `download_link`); older classifier deployments only emit that form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UploadResponseItem {
    Classification(ClassificationResult),
    Download(DownloadReference),
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TaggedItem {
    Classification(ClassificationResult),
    Download(DownloadReference),
}

impl From<TaggedItem> for UploadResponseItem {
    fn from(value: TaggedItem) -> Self {
        match value {
            TaggedItem::Classification(result) => Self::Classification(result),
            TaggedItem::Download(reference) => Self::Download(reference),
        }
    }
}

impl<'de> Deserialize<'de> for UploadResponseItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Some(object) = value.as_object() else {
            return Err(D::Error::custom("response item must be a JSON object"));
        };

        if object.contains_key("kind") {
            return TaggedItem::deserialize(value)
                .map(Self::from)
                .map_err(D::Error::custom);
        }

        // Untagged compatibility path: the role is inferred from field presence.
        if object.contains_key("class") {
            ClassificationResult::deserialize(value)
                .map(Self::Classification)
                .map_err(D::Error::custom)
        } else if object.contains_key("download_link") {
            DownloadReference::deserialize(value)
                .map(Self::Download)
                .map_err(D::Error::custom)
        } else {
            Err(D::Error::custom(
                "response item carries neither `kind`, `class` nor `download_link`",
            ))
        }
    }
}

impl UploadResponseItem {
    pub fn as_classification(&self) -> Option<&ClassificationResult> {
        match self {
            Self::Classification(result) => Some(result),
            Self::Download(_) => None,
        }
    }

    pub fn as_download(&self) -> Option<&DownloadReference> {
        match self {
            Self::Download(reference) => Some(reference),
            Self::Classification(_) => None,
        }
    }
}

/// Body of a successful upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub items: Vec<UploadResponseItem>,
}

impl UploadResponse {
    /// Decodes a response body.
    ///
    /// Accepts the `{ "message", "items" }` envelope and the legacy bare array of
    /// items (which has no message). Anything else is a contract violation.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_slice(body).map_err(ProtocolError::InvalidJson)?;
        match value {
            Value::Object(_) => serde_json::from_value(value).map_err(ProtocolError::Contract),
            Value::Array(_) => serde_json::from_value::<Vec<UploadResponseItem>>(value)
                .map(|items| Self {
                    message: None,
                    items,
                })
                .map_err(ProtocolError::Contract),
            other => Err(ProtocolError::UnexpectedShape {
                found: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
