//! UI/backend events and error modeling for the desktop GUI controller.

use client_core::{SubmissionError, SubmissionTicket};
use shared::protocol::UploadResponse;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    UploadFinished {
        ticket: SubmissionTicket,
        outcome: Result<UploadResponse, SubmissionError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Dispatch,
}

#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
