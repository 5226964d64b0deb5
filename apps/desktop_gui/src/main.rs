use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{ClientConfig, ConfigOverrides};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use backend_bridge::{commands::BackendCommand, runtime};
use controller::events::UiEvent;
use ui::InventoryApp;

const WINDOW_TITLE: &str = "Cloud Inventory";

#[derive(Debug, Parser)]
#[command(name = "inventory_gui", about = "Desktop inventory list backed by a hosted table")]
struct Args {
    /// Config file; defaults to the per-user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    project_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    table: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = ClientConfig::load(
        args.config.as_deref(),
        ConfigOverrides {
            project_url: args.project_url,
            api_key: args.api_key,
            table: args.table,
        },
    );
    if let Err(err) = &config {
        tracing::error!(error = %err, "failed to load client configuration");
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::launch(config, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([520.0, 640.0])
            .with_min_inner_size([380.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|cc| {
            ui::theme::apply(&cc.egui_ctx);
            Ok(Box::new(InventoryApp::new(cmd_tx, ui_rx)))
        }),
    )
}
