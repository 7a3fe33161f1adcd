use std::path::PathBuf;

use anyhow::Context;
use bill_core::AppConfig;
use bill_ui::{headless::run_headless, logging, open_main_window, scan::read_scan, setup_app};
use clap::Parser;
use gpui::Application;
use tracing::{debug, error, info};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Water bill tracker.
///
/// Scan (or type in) a water bill, review the values and record it.
#[derive(Debug, Parser)]
#[command(name = "WaterBillTracker", version, about)]
struct Cli {
    /// TOML config file. Defaults apply to every missing key.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `info,bill_core=trace`. Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append logs to this file. Overrides the config file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Text file holding the OCR output of a bill.
    /// The window opens on the entry form with its values filled in.
    #[arg(long)]
    scan_file: Option<PathBuf>,

    /// Submit `--scan-file` without opening a window and print the outcome.
    #[arg(long, requires = "scan_file")]
    headless: bool,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(file) = cli.log_file {
        config.logging.file = Some(file);
    }

    if std::env::var_os("RUST_LOG").is_none() {
        logging::set_log_level(&config.logging.level)?;
    }
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration loaded");

    let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;

    if cli.headless {
        let Some(scan_path) = cli.scan_file.as_deref() else {
            anyhow::bail!("--headless needs --scan-file");
        };
        let receipt = runtime.block_on(run_headless(&config, scan_path))?;
        println!("{receipt}");
        return Ok(());
    }

    let initial_scan = cli.scan_file.as_deref().map(read_scan).transpose()?;
    let handle = runtime.handle().clone();

    info!("starting water bill tracker");
    Application::new()
        .with_assets(gpui_component_assets::Assets)
        .run(move |cx| {
            setup_app(cx);
            if let Err(error) = open_main_window(cx, config, handle, initial_scan) {
                error!(?error, "cannot open main window");
                cx.quit();
            }
        });

    Ok(())
}
