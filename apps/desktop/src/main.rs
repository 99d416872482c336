use std::{fmt::Write as _, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, HttpUploadTransport, SelectedFile, SelectionSource, SubmitAttempt,
    UploadWorkflow, WorkflowStatus,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "smartdoc", about = "Upload documents to the SmartDoc classifier")]
struct Args {
    /// Classifier origin, e.g. http://localhost:5000
    #[arg(long)]
    server_url: Option<String>,
    /// Settings file to use instead of ./smartdoc.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Files to upload; none still sends an empty upload
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let endpoint = settings.endpoint().context("invalid upload settings")?;
    tracing::info!(upload_url = %endpoint.upload_url(), "smartdoc: configured");

    let transport = HttpUploadTransport::new(&endpoint);
    let mut workflow = UploadWorkflow::new(endpoint.origin().clone());
    workflow.set_selection(
        SelectionSource::Picker,
        args.files.into_iter().map(SelectedFile::from_path),
    );

    if let SubmitAttempt::AlreadySubmitting = workflow.submit(&transport).await {
        anyhow::bail!("upload already in progress");
    }

    print!("{}", render_report(&workflow));
    Ok(match workflow.status() {
        WorkflowStatus::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

fn render_report(workflow: &UploadWorkflow) -> String {
    let mut out = String::new();
    if let Some(message) = workflow.status().message() {
        let _ = writeln!(out, "{message}");
    }

    let projection = workflow.projection();
    if !projection.results().is_empty() {
        let _ = writeln!(out, "Classification Results");
        for result in projection.results() {
            let _ = writeln!(out, "  {} - {}", result.file, result.class_name);
        }
    }
    if let Some(url) = projection.download_url() {
        let _ = writeln!(out, "Download sorted documents: {url}");
    }
    out
}
