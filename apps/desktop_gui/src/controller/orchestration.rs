//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// A command the backend never received, handed back to the caller.
pub struct DispatchFailure {
    pub command: BackendCommand,
    pub reason: &'static str,
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), DispatchFailure> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(command)) => Err(DispatchFailure {
            command,
            reason: "UI command queue is full; please retry",
        }),
        Err(TrySendError::Disconnected(command)) => Err(DispatchFailure {
            command,
            reason: "Backend command processor disconnected (possible startup/runtime failure)",
        }),
    }
}
