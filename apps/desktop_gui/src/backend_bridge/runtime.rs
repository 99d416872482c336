//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{HttpUploadTransport, UploadEndpoint, UploadTransport};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(endpoint: UploadEndpoint, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let transport = HttpUploadTransport::new(&endpoint);
        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Ready to upload to {}",
                endpoint.upload_url()
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Upload { ticket } => {
                        let outcome = transport.upload(ticket.files()).await;
                        // Blocking send: a lost outcome would leave the UI stuck in Submitting.
                        if ui_tx
                            .send(UiEvent::UploadFinished { ticket, outcome })
                            .is_err()
                        {
                            tracing::warn!("ui event channel closed; stopping backend worker");
                            break;
                        }
                    }
                }
            }
        });
    });
}
