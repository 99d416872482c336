//! Upload-and-classify client workflow: selection, multipart submission and
//! projection of the classifier response into display state.

pub mod config;
pub mod projection;
pub mod selection;
pub mod submission;
pub mod workflow;

pub use config::{load_settings, Settings, SettingsError, UploadEndpoint};
pub use projection::{resolve_download_url, ResultProjection};
pub use selection::{SelectedFile, SelectionSource, SelectionStore};
pub use submission::{
    HttpUploadTransport, SubmissionError, UploadTransport, GENERIC_FAILURE_MESSAGE,
};
pub use workflow::{SubmissionTicket, SubmitAttempt, UploadWorkflow, WorkflowStatus};

#[cfg(test)]
pub(crate) mod test_support;
