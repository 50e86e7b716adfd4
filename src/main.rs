use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use entity_graph::app::EntityGraphApp;
use entity_graph::source::{DEFAULT_GRAPH_URL, FileSource, GraphSource, HttpSource};
use entity_graph::{GraphViewer, ViewerConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Endpoint serving `{nodes, edges}` JSON.
    #[arg(long, default_value = DEFAULT_GRAPH_URL)]
    url: String,

    /// Read the graph from a JSON file instead of the endpoint.
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// JSON file with layout and view overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_viewer(source: impl GraphSource + 'static, config: ViewerConfig) -> (String, GraphViewer) {
    let origin = source.describe();
    (origin, GraphViewer::with_config(source, config))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let (origin, viewer) = match args.file {
        Some(path) => build_viewer(FileSource::new(path), config),
        None => build_viewer(
            HttpSource::new(args.url, Duration::from_secs(args.timeout_secs)),
            config,
        ),
    };
    info!(source = %origin, "starting entity graph viewer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "entity-graph",
        options,
        Box::new(move |cc| Ok(Box::new(EntityGraphApp::new(cc, origin, viewer)))),
    )
    .map_err(|error| anyhow!("viewer window failed: {error}"))
}
