use shared::{
    domain::{ClassificationResult, DownloadReference},
    protocol::{UploadResponse, UploadResponseItem},
};
use url::Url;

/// Display state derived from one successful upload response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultProjection {
    results: Vec<ClassificationResult>,
    download_reference: Option<DownloadReference>,
    download_url: Option<String>,
}

impl ResultProjection {
    /// Items with an empty `class` or `download_link` are skipped, so a blank
    /// link never hides a later usable one.
    pub fn project(response: &UploadResponse, origin: &Url) -> Self {
        let results = response
            .items
            .iter()
            .filter_map(UploadResponseItem::as_classification)
            .filter(|result| !result.class_name.is_empty())
            .cloned()
            .collect();
        let download_reference = response
            .items
            .iter()
            .filter_map(UploadResponseItem::as_download)
            .find(|reference| !reference.download_link.is_empty())
            .cloned();
        let download_url = download_reference
            .as_ref()
            .map(|reference| resolve_download_url(origin, &reference.download_link));

        Self {
            results,
            download_reference,
            download_url,
        }
    }

    pub fn results(&self) -> &[ClassificationResult] {
        &self.results
    }

    pub fn download_reference(&self) -> Option<&DownloadReference> {
        self.download_reference.as_ref()
    }

    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.download_reference.is_none()
    }
}

/// Resolves a server download link against the configured origin.
///
/// Relative links are appended to the origin with exactly one `/` between the
/// two. Links that are already absolute http(s) URLs are kept as they are.
pub fn resolve_download_url(origin: &Url, link: &str) -> String {
    if let Ok(absolute) = Url::parse(link) {
        if matches!(absolute.scheme(), "http" | "https") {
            return absolute.into();
        }
    }

    let base = origin.as_str().trim_end_matches('/');
    if link.starts_with('/') {
        format!("{base}{link}")
    } else {
        format!("{base}/{link}")
    }
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
