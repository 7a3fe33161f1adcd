//! Simulated bill submission.
//!
//! There is no backend: [`SimulatedSubmitter`] waits a fixed latency and asks
//! an [`OutcomeSource`] whether every bill type has now been entered. A real
//! integration implements [`Submitter`] (and, for the routing decision,
//! [`OutcomeSource`]) instead.

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::SubmissionConfig,
    flow::{EntryFlow, FlowError},
    models::{FollowUp, SubmissionReceipt, WaterBill},
};

/// Failure reported by a [`Submitter`]. The simulated one never fails; a
/// networked implementation reports an unreachable backend this way.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(
        &self,
        bill: &WaterBill,
    ) -> Result<SubmissionReceipt, SubmitError>;
}

/// Decides whether all utility bill types have been entered.
pub trait OutcomeSource: Send {
    fn all_bills_entered(&mut self) -> bool;
}

/// Coin flip with a configurable probability of "all bills entered".
#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    probability: f64,
}

impl RandomOutcome {
    /// `probability` is clamped to `0.0..=1.0`; NaN falls back to an even split.
    pub fn new(probability: f64) -> Self {
        let probability = if probability.is_nan() {
            0.5
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self { probability }
    }
}

impl Default for RandomOutcome {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl OutcomeSource for RandomOutcome {
    fn all_bills_entered(&mut self) -> bool {
        rand::rng().random_bool(self.probability)
    }
}

/// Always returns the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub bool);

impl OutcomeSource for FixedOutcome {
    fn all_bills_entered(&mut self) -> bool {
        self.0
    }
}

/// Stand-in for a network submission. Never fails.
pub struct SimulatedSubmitter<O: OutcomeSource> {
    latency: Duration,
    eco_points: u32,
    outcomes: Mutex<O>,
}

impl SimulatedSubmitter<RandomOutcome> {
    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self::new(
            config.latency(),
            config.eco_points,
            RandomOutcome::new(config.all_bills_probability),
        )
    }
}

impl<O: OutcomeSource> SimulatedSubmitter<O> {
    pub fn new(
        latency: Duration,
        eco_points: u32,
        outcomes: O,
    ) -> Self {
        Self {
            latency,
            eco_points,
            outcomes: Mutex::new(outcomes),
        }
    }

    fn next_follow_up(&self) -> FollowUp {
        let all_bills_entered = match self.outcomes.lock() {
            Ok(mut outcomes) => outcomes.all_bills_entered(),
            Err(poisoned) => poisoned.into_inner().all_bills_entered(),
        };
        FollowUp::from_all_bills_entered(all_bills_entered)
    }
}

#[async_trait]
impl<O: OutcomeSource> Submitter for SimulatedSubmitter<O> {
    async fn submit(
        &self,
        bill: &WaterBill,
    ) -> Result<SubmissionReceipt, SubmitError> {
        debug!(latency_ms = self.latency.as_millis() as u64, "simulating network latency");
        tokio::time::sleep(self.latency).await;

        let follow_up = self.next_follow_up();
        info!(amount = %bill.amount, ?follow_up, "simulated submission accepted");

        Ok(SubmissionReceipt {
            follow_up,
            eco_points: self.eco_points,
        })
    }
}

/// Runs one whole submission cycle without a UI: validate, submit, show the
/// success state for `success_window`, then reset the flow.
pub async fn run_submission(
    flow: &mut EntryFlow,
    submitter: &dyn Submitter,
    success_window: Duration,
) -> Result<SubmissionReceipt, FlowError> {
    let ticket = flow.begin_submit()?;

    let receipt = match submitter.submit(ticket.bill()).await {
        Ok(receipt) => receipt,
        Err(e) => {
            flow.abort_submission(&ticket)?;
            return Err(e.into());
        }
    };

    flow.complete_submission(&ticket, receipt)?;
    tokio::time::sleep(success_window).await;
    flow.finish(&ticket)?;

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bill() -> WaterBill {
        WaterBill {
            usage_m3: dec!(12.5),
            amount: dec!(34.20),
            billed_on: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn fixed_outcome_decides_follow_up() {
        let submitter = SimulatedSubmitter::new(Duration::ZERO, 25, FixedOutcome(true));
        let receipt = submitter.submit(&bill()).await.unwrap();

        assert_eq!(receipt.follow_up, FollowUp::AllBillsRecorded);
        assert_eq!(receipt.eco_points, 25);
    }

    #[tokio::test]
    async fn random_outcome_is_one_of_two_follow_ups() {
        let submitter = SimulatedSubmitter::new(Duration::ZERO, 25, RandomOutcome::default());

        for _ in 0..20 {
            let receipt = submitter.submit(&bill()).await.unwrap();
            assert!(matches!(
                receipt.follow_up,
                FollowUp::AllBillsRecorded | FollowUp::ContinueAdding
            ));
        }
    }

    #[test]
    fn random_outcome_extremes_are_deterministic() {
        assert!(RandomOutcome::new(1.0).all_bills_entered());
        assert!(!RandomOutcome::new(0.0).all_bills_entered());
        assert!(RandomOutcome::new(7.0).all_bills_entered());
    }

    struct FailingSubmitter;

    #[async_trait]
    impl Submitter for FailingSubmitter {
        async fn submit(
            &self,
            _bill: &WaterBill,
        ) -> Result<SubmissionReceipt, SubmitError> {
            Err(SubmitError::Unavailable("offline".into()))
        }
    }

    #[tokio::test]
    async fn failed_submission_returns_to_form() {
        let mut flow = EntryFlow::new();
        flow.scan_completed("Usage: 1\nAmount: $2\nDate: 3/4/2025")
            .unwrap();

        let result = run_submission(&mut flow, &FailingSubmitter, Duration::ZERO).await;

        assert!(matches!(result, Err(FlowError::Submit(_))));
        assert!(!flow.is_submitting());
        assert_eq!(flow.fields().usage, "1");
    }
}
