use super::*;
use client_core::{SubmissionError, GENERIC_FAILURE_MESSAGE};
use crossbeam_channel::bounded;
use shared::{
    domain::{ClassificationResult, DownloadReference},
    error::ProtocolError,
    protocol::{UploadResponse, UploadResponseItem},
};
use std::{path::PathBuf, sync::Arc};

struct Harness {
    app: SmartDocApp,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
}

fn harness() -> Harness {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = bounded(4);
    let origin = Url::parse("http://localhost:5000").expect("origin");
    Harness {
        app: SmartDocApp::new(cmd_tx, ui_rx, origin),
        cmd_rx,
        ui_tx,
    }
}

fn take_ticket(cmd_rx: &Receiver<BackendCommand>) -> client_core::SubmissionTicket {
    match cmd_rx.try_recv().expect("queued command") {
        BackendCommand::Upload { ticket } => ticket,
    }
}

#[test]
fn upload_click_queues_one_command_until_finished() {
    let mut h = harness();
    h.app.select_files(
        SelectionSource::Picker,
        vec![SelectedFile::from_bytes("a.pdf", b"%PDF".to_vec())],
    );

    h.app.request_upload();
    h.app.request_upload();

    assert!(h.app.workflow.status().is_submitting());
    let ticket = take_ticket(&h.cmd_rx);
    assert_eq!(ticket.files().len(), 1);
    assert!(h.cmd_rx.try_recv().is_err());
}

#[test]
fn finished_event_applies_projection() {
    let mut h = harness();
    h.app.request_upload();
    let ticket = take_ticket(&h.cmd_rx);

    h.ui_tx
        .send(UiEvent::UploadFinished {
            ticket,
            outcome: Ok(UploadResponse {
                message: Some("1 files uploaded and sorted successfully".to_string()),
                items: vec![
                    UploadResponseItem::Classification(ClassificationResult::new(
                        "a.pdf", "invoice",
                    )),
                    UploadResponseItem::Download(DownloadReference::new("/dl/1")),
                ],
            }),
        })
        .expect("send event");
    h.app.process_ui_events();

    assert_eq!(
        h.app.workflow.status().message(),
        Some("1 files uploaded and sorted successfully")
    );
    assert_eq!(
        h.app.workflow.projection().download_url(),
        Some("http://localhost:5000/dl/1")
    );
    assert!(h.app.workflow.status().can_submit());
}

#[test]
fn failed_event_shows_generic_message() {
    let mut h = harness();
    h.app.request_upload();
    let ticket = take_ticket(&h.cmd_rx);

    h.ui_tx
        .send(UiEvent::UploadFinished {
            ticket,
            outcome: Err(SubmissionError::MalformedResponse(
                ProtocolError::UnexpectedShape { found: "number" },
            )),
        })
        .expect("send event");
    h.app.process_ui_events();

    assert_eq!(
        h.app.workflow.status().message(),
        Some(GENERIC_FAILURE_MESSAGE)
    );
    assert!(h.app.workflow.projection().is_empty());
}

#[test]
fn disconnected_backend_releases_submission_lock() {
    let mut h = harness();
    drop(h.cmd_rx);

    h.app.request_upload();

    assert_eq!(
        h.app.workflow.status().message(),
        Some(GENERIC_FAILURE_MESSAGE)
    );
    assert!(h.app.workflow.status().can_submit());
    assert!(h.app.backend_status.contains("disconnected"));
}

#[test]
fn backend_info_and_errors_update_status_line() {
    let mut h = harness();
    h.ui_tx
        .send(UiEvent::Info("Ready to upload".to_string()))
        .expect("send event");
    h.app.process_ui_events();
    assert_eq!(h.app.backend_status, "Ready to upload");

    h.ui_tx
        .send(UiEvent::Error(UiError::new(
            UiErrorContext::BackendStartup,
            "failed to build runtime",
        )))
        .expect("send event");
    h.app.process_ui_events();
    assert_eq!(
        h.app.backend_status,
        "Backend startup: failed to build runtime"
    );
}

#[test]
fn dropped_files_keep_order_and_prefer_paths() {
    let dropped = vec![
        egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/docs/b.pdf")),
            name: "b.pdf".to_string(),
            ..Default::default()
        },
        egui::DroppedFile {
            name: "memo.txt".to_string(),
            bytes: Some(Arc::from(b"memo".to_vec())),
            ..Default::default()
        },
        egui::DroppedFile {
            name: "ghost".to_string(),
            ..Default::default()
        },
    ];

    let files = dropped_files_to_selection(dropped);
    let names: Vec<&str> = files.iter().map(SelectedFile::name).collect();
    assert_eq!(names, vec!["b.pdf", "memo.txt"]);
    assert_eq!(files[0].path(), Some(PathBuf::from("/tmp/docs/b.pdf").as_path()));
    assert_eq!(files[1].path(), None);
}

#[test]
fn drop_replaces_picker_selection() {
    let mut h = harness();
    h.app.select_files(
        SelectionSource::Picker,
        vec![
            SelectedFile::from_bytes("a.pdf", b"a".to_vec()),
            SelectedFile::from_bytes("b.pdf", b"b".to_vec()),
        ],
    );
    h.app.select_files(
        SelectionSource::Drop,
        dropped_files_to_selection(vec![egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/docs/c.pdf")),
            ..Default::default()
        }]),
    );

    let names: Vec<&str> = h.app.workflow.selection().names().collect();
    assert_eq!(names, vec!["c.pdf"]);
}
