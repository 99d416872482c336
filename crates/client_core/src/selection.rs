use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FileContent {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A file chosen for upload. Content is read only when the upload is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content: FileContent,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            content: FileContent::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            content: FileContent::Bytes(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            FileContent::Path(path) => Some(path),
            FileContent::Bytes(_) => None,
        }
    }

    pub async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        match &self.content {
            FileContent::Path(path) => tokio::fs::read(path).await,
            FileContent::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Picker,
    Drop,
}

impl SelectionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Picker => "picker",
            Self::Drop => "drop",
        }
    }
}

/// Files currently chosen for upload. Every selection event replaces the whole set.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    files: Vec<SelectedFile>,
    source: Option<SelectionSource>,
}

impl SelectionStore {
    pub fn set_selection(
        &mut self,
        source: SelectionSource,
        files: impl IntoIterator<Item = SelectedFile>,
    ) {
        let files: Vec<SelectedFile> = files.into_iter().collect();
        debug!(
            source = source.as_str(),
            replaced = self.files.len(),
            selected = files.len(),
            "selection: replaced"
        );
        self.files = files;
        self.source = Some(source);
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(SelectedFile::name)
    }

    pub fn source(&self) -> Option<SelectionSource> {
        self.source
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
