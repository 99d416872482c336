use serde::{Deserialize, Serialize};

/// Category assigned by the classifier to one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub file: String,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl ClassificationResult {
    pub fn new(file: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            class_name: class_name.into(),
        }
    }
}

/// Server-generated pointer to the archive of sorted documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReference {
    pub download_link: String,
}

impl DownloadReference {
    pub fn new(download_link: impl Into<String>) -> Self {
        Self {
            download_link: download_link.into(),
        }
    }
}
