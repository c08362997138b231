mod advice;
mod error;
mod metrics;
mod model;
mod report;
mod settings;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use model::BusinessInputs;
use report::Report;
use settings::{Settings, DEFAULT_SETTINGS_PATH};
use ui::DashboardApp;

#[derive(Debug, Parser)]
#[command(name = "biz_dashboard", about = "Business metrics dashboard with PDF report export")]
struct Args {
    /// Settings file (JSON). Missing file means defaults.
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Prefill the form from a JSON file of business inputs.
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Write the PDF report to this path and exit without opening a window.
    #[arg(long, requires = "inputs")]
    export: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = Settings::load_or_default(&args.settings);

    let inputs = match &args.inputs {
        Some(path) => load_inputs(path)?,
        None => BusinessInputs::default(),
    };

    if let Some(dest) = &args.export {
        return export_headless(&inputs, &settings, dest);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "E-commerce Business Dashboard",
        options,
        Box::new(|cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(inputs, settings)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}

fn load_inputs(path: &Path) -> anyhow::Result<BusinessInputs> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read inputs file {}", path.display()))?;
    let inputs: BusinessInputs = serde_json::from_str(&data)
        .with_context(|| format!("parse inputs file {}", path.display()))?;
    Ok(inputs.sanitized())
}

fn export_headless(inputs: &BusinessInputs, settings: &Settings, dest: &Path) -> anyhow::Result<()> {
    let metrics = metrics::compute(inputs);
    let advice = advice::recommend(inputs, &metrics, &settings.thresholds);
    let summary = Report::build(&inputs.business_name, inputs.total_revenue, &metrics, &advice);

    let bytes = report::render_pdf(&summary, &settings.layout).context("render report")?;
    std::fs::write(dest, &bytes).with_context(|| format!("write report to {}", dest.display()))?;

    tracing::info!(
        dest = %dest.display(),
        bytes = bytes.len(),
        recommendations = advice.len(),
        "report exported"
    );
    Ok(())
}
