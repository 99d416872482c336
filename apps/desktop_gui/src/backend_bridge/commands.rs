//! Backend commands queued from UI to backend worker.

use client_core::SubmissionTicket;

pub enum BackendCommand {
    Upload { ticket: SubmissionTicket },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "upload",
        }
    }
}
