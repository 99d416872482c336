use shared::protocol::UploadResponse;
use tracing::{error, info, warn};
use url::Url;

use crate::{
    projection::ResultProjection,
    selection::{SelectedFile, SelectionSource, SelectionStore},
    submission::{SubmissionError, UploadTransport, GENERIC_FAILURE_MESSAGE},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    Submitting,
    /// Carries the server's status text when it sent one.
    Succeeded(Option<String>),
    Failed(String),
}

impl WorkflowStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Succeeded(message) => message.as_deref(),
            Self::Failed(message) => Some(message),
            Self::Idle | Self::Submitting => None,
        }
    }
}

/// Snapshot of the selection handed to the transport for one submission.
#[derive(Debug)]
pub struct SubmissionTicket {
    id: u64,
    files: Vec<SelectedFile>,
}

impl SubmissionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// A submission was already in flight; nothing was sent.
    AlreadySubmitting,
    Finished(WorkflowStatus),
}

/// State of one upload session: selection, submission status and the last
/// successful projection.
#[derive(Debug)]
pub struct UploadWorkflow {
    origin: Url,
    selection: SelectionStore,
    status: WorkflowStatus,
    projection: ResultProjection,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl UploadWorkflow {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            selection: SelectionStore::default(),
            status: WorkflowStatus::Idle,
            projection: ResultProjection::default(),
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn status(&self) -> &WorkflowStatus {
        &self.status
    }

    pub fn projection(&self) -> &ResultProjection {
        &self.projection
    }

    pub fn set_selection(
        &mut self,
        source: SelectionSource,
        files: impl IntoIterator<Item = SelectedFile>,
    ) {
        self.selection.set_selection(source, files);
    }

    /// Enters `Submitting` and snapshots the selection.
    ///
    /// Returns `None` without side effects while another submission is in flight.
    pub fn begin_submission(&mut self) -> Option<SubmissionTicket> {
        if self.status.is_submitting() {
            info!(
                ticket = self.in_flight,
                "upload: submission already in flight, ignoring trigger"
            );
            return None;
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(id);
        self.status = WorkflowStatus::Submitting;
        info!(
            ticket = id,
            file_count = self.selection.len(),
            source = self.selection.source().map(SelectionSource::as_str),
            "upload: submission started"
        );

        Some(SubmissionTicket {
            id,
            files: self.selection.files().to_vec(),
        })
    }

    /// Applies the transport outcome for `ticket` and releases the submission lock.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<UploadResponse, SubmissionError>,
    ) -> &WorkflowStatus {
        if self.in_flight != Some(ticket.id) {
            warn!(
                ticket = ticket.id,
                in_flight = self.in_flight,
                "upload: ignoring outcome for stale submission"
            );
            return &self.status;
        }
        self.in_flight = None;

        match outcome {
            Ok(response) => {
                self.projection = ResultProjection::project(&response, &self.origin);
                info!(
                    ticket = ticket.id,
                    results = self.projection.results().len(),
                    has_download = self.projection.download_url().is_some(),
                    "upload: submission succeeded"
                );
                self.status = WorkflowStatus::Succeeded(response.message);
            }
            Err(err) => {
                error!(
                    ticket = ticket.id,
                    category = err.category(),
                    error = %err,
                    "upload: submission failed"
                );
                self.status = WorkflowStatus::Failed(GENERIC_FAILURE_MESSAGE.to_string());
            }
        }
        &self.status
    }

    /// Releases the submission lock when no outcome will ever arrive for `ticket_id`.
    pub fn abandon_submission(&mut self, ticket_id: u64, reason: &str) {
        if self.in_flight != Some(ticket_id) {
            return;
        }
        self.in_flight = None;
        error!(ticket = ticket_id, reason, "upload: submission abandoned");
        self.status = WorkflowStatus::Failed(GENERIC_FAILURE_MESSAGE.to_string());
    }

    /// Runs one full submission through `transport`.
    ///
    /// The lock is released even if the returned future is dropped before the
    /// transport finishes.
    pub async fn submit<T>(&mut self, transport: &T) -> SubmitAttempt
    where
        T: UploadTransport + ?Sized,
    {
        let Some(ticket) = self.begin_submission() else {
            return SubmitAttempt::AlreadySubmitting;
        };

        let guard = InFlightGuard {
            workflow: self,
            ticket_id: ticket.id,
            armed: true,
        };
        let outcome = transport.upload(ticket.files()).await;
        SubmitAttempt::Finished(guard.finish(ticket, outcome))
    }
}

struct InFlightGuard<'a> {
    workflow: &'a mut UploadWorkflow,
    ticket_id: u64,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn finish(
        mut self,
        ticket: SubmissionTicket,
        outcome: Result<UploadResponse, SubmissionError>,
    ) -> WorkflowStatus {
        self.armed = false;
        self.workflow.complete_submission(ticket, outcome).clone()
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.workflow
                .abandon_submission(self.ticket_id, "submission dropped before completion");
        }
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
