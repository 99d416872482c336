use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::{load_settings, UploadEndpoint};
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::{app::APP_TITLE, SmartDocApp};

#[derive(Parser, Debug)]
#[command(name = "smartdoc_gui", about = "Desktop uploader for the SmartDoc classifier")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn resolve_endpoint(args: &Args) -> Result<UploadEndpoint> {
    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    settings.endpoint().context("invalid upload settings")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let endpoint = resolve_endpoint(&args)?;
    tracing::info!(upload_url = %endpoint.upload_url(), "desktop gui: configured");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    let origin = endpoint.origin().clone();
    backend_bridge::runtime::launch(endpoint, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([480.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(SmartDocApp::new(cmd_tx, ui_rx, origin)))),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
