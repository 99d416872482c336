use client_core::{SelectedFile, SelectionSource, UploadWorkflow, WorkflowStatus};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::{dispatch_backend_command, DispatchFailure};

pub const APP_TITLE: &str = "SmartDoc - Document Classifier";

pub struct SmartDocApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    workflow: UploadWorkflow,
    backend_status: String,
    drop_hovered: bool,
}

impl SmartDocApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, origin: Url) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            workflow: UploadWorkflow::new(origin),
            backend_status: "Backend worker not started".to_string(),
            drop_hovered: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.backend_status = message;
                }
                UiEvent::Error(err) => self.report_error(&err),
                UiEvent::UploadFinished { ticket, outcome } => {
                    self.workflow.complete_submission(ticket, outcome);
                }
            }
        }
    }

    fn report_error(&mut self, err: &UiError) {
        let label = match err.context() {
            UiErrorContext::BackendStartup => "Backend startup",
            UiErrorContext::Dispatch => "Backend queue",
        };
        tracing::warn!(context = label, error = err.message(), "desktop gui: backend error");
        self.backend_status = format!("{label}: {}", err.message());
    }

    fn select_files(&mut self, source: SelectionSource, files: Vec<SelectedFile>) {
        self.workflow.set_selection(source, files);
    }

    fn request_upload(&mut self) {
        let Some(ticket) = self.workflow.begin_submission() else {
            return;
        };

        if let Err(DispatchFailure { command, reason }) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::Upload { ticket })
        {
            let BackendCommand::Upload { ticket } = command;
            self.workflow.abandon_submission(ticket.id(), reason);
            self.report_error(&UiError::new(UiErrorContext::Dispatch, reason));
        }
    }

    fn pick_files(&mut self) {
        if let Some(paths) = rfd::FileDialog::new().pick_files() {
            let files = paths.into_iter().map(SelectedFile::from_path).collect();
            self.select_files(SelectionSource::Picker, files);
        }
    }

    fn handle_file_drop(&mut self, ctx: &egui::Context) {
        let (hovered, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        self.drop_hovered = hovered;
        if !dropped.is_empty() {
            let files = dropped_files_to_selection(dropped);
            self.select_files(SelectionSource::Drop, files);
        }
    }

    fn show_upload_panel(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading(APP_TITLE);
            ui.add_space(16.0);

            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_min_width(360.0);
                ui.vertical_centered(|ui| {
                    if ui.button("CHOOSE FILES").clicked() {
                        self.pick_files();
                    }
                    let hint = if self.drop_hovered {
                        "release to select these files"
                    } else {
                        "or drop files here"
                    };
                    ui.label(hint);
                });
            });

            let selection = self.workflow.selection();
            if !selection.is_empty() {
                ui.add_space(8.0);
                for name in selection.names() {
                    ui.label(name);
                }
            }

            ui.add_space(8.0);
            let status = self.workflow.status().clone();
            ui.horizontal(|ui| {
                let clicked = ui
                    .add_enabled(status.can_submit(), egui::Button::new("UPLOAD FILES"))
                    .clicked();
                if status.is_submitting() {
                    ui.spinner();
                }
                if clicked {
                    self.request_upload();
                }
            });

            if let Some(message) = status.message() {
                ui.add_space(8.0);
                if matches!(status, WorkflowStatus::Failed(_)) {
                    ui.colored_label(ui.visuals().error_fg_color, message);
                } else {
                    ui.label(message);
                }
            }

            let projection = self.workflow.projection();
            if !projection.results().is_empty() {
                ui.add_space(12.0);
                ui.heading("Classification Results");
                for result in projection.results() {
                    ui.label(format!("{} - {}", result.file, result.class_name));
                }
            }
            if let Some(url) = projection.download_url() {
                ui.add_space(12.0);
                ui.hyperlink_to("DOWNLOAD SORTED DOCUMENTS", url);
            }
        });
    }
}

/// Maps dropped items onto the selection. Native drops carry a path, web drops carry bytes.
pub fn dropped_files_to_selection(dropped: Vec<egui::DroppedFile>) -> Vec<SelectedFile> {
    dropped
        .into_iter()
        .filter_map(|file| match (file.path, file.bytes) {
            (Some(path), _) => Some(SelectedFile::from_path(path)),
            (None, Some(bytes)) => Some(SelectedFile::from_bytes(file.name, bytes)),
            (None, None) => {
                tracing::warn!(name = %file.name, "drop: item has neither path nor bytes");
                None
            }
        })
        .collect()
}

impl eframe::App for SmartDocApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.handle_file_drop(ctx);

        egui::TopBottomPanel::bottom("backend_status").show(ctx, |ui| {
            ui.small(&self.backend_status);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.show_upload_panel(ui));
        });

        if self.workflow.status().is_submitting() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
