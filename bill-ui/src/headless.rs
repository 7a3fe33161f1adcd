//! Window-less run: submit one scanned bill and report the outcome.

use std::path::Path;

use anyhow::Context;
use bill_core::{AppConfig, EntryFlow, SimulatedSubmitter, SubmissionReceipt, run_submission};
use tracing::{info, warn};

use crate::scan::read_scan;

pub async fn run_headless(
    config: &AppConfig,
    scan_path: &Path,
) -> anyhow::Result<SubmissionReceipt> {
    let text = read_scan(scan_path)?;

    let mut flow = EntryFlow::new();
    let extraction = flow.scan_completed(text)?;
    if !extraction.is_complete() {
        warn!(missing = ?extraction.missing(), "scan is incomplete, submission will be rejected");
    }

    let submitter = SimulatedSubmitter::from_config(&config.submission);
    let receipt = run_submission(&mut flow, &submitter, config.submission.success_window())
        .await
        .with_context(|| format!("cannot submit bill from {}", scan_path.display()))?;

    info!(route = %receipt.follow_up.route(), "headless submission finished");
    Ok(receipt)
}
