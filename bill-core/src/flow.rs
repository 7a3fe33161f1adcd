//! View state of the water bill entry screen.
//!
//! The screen moves `Prompt -> Entry -> Submitting -> Submitted -> Prompt`.
//! `Entry` is reached from a scan or a manual-entry request, `Submitted`
//! returns to `Prompt` once the success window has elapsed, and cancel
//! drops back from `Entry` to `Prompt`.
//!
//! Each submission is identified by a [`SubmissionTicket`]. The timer-driven
//! steps (completion, reset) only apply to the current ticket, so a timer
//! that fires after a cancel or a newer submission does nothing.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    extract::{BillTextExtractor, Extraction},
    models::{BillField, BillFields, SubmissionReceipt, WaterBill},
    parse::FieldError,
    submission::SubmitError,
};

/// Which of the three screens is rendered.
///
/// A submission in flight is still rendered as [`View::Entry`] with a busy
/// submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Prompt,
    Entry,
    Submitted,
}

/// How the entry form was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Scanned,
    Manual,
}

impl EntryMode {
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Scanned => "Verify Extracted Information",
            Self::Manual => "Enter Water Bill Details",
        }
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("no bill is being entered")]
    NotEditing,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("the bill has already been submitted")]
    AlreadySubmitted,

    #[error("submission ticket {0} is no longer current")]
    StaleTicket(u64),

    #[error("bill has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Handle for one submission cycle, carrying the validated bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    id: u64,
    bill: WaterBill,
}

impl SubmissionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bill(&self) -> &WaterBill {
        &self.bill
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Submitting { ticket: u64 },
    Submitted { ticket: u64, receipt: SubmissionReceipt },
}

/// Local state of the entry screen.
#[derive(Debug, Clone)]
pub struct EntryFlow {
    scan_result: Option<String>,
    manual_entry: bool,
    fields: BillFields,
    missing_fields: Vec<BillField>,
    phase: Phase,
    all_bills_entered: bool,
    last_ticket: u64,
    extractor: BillTextExtractor,
}

impl Default for EntryFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryFlow {
    pub fn new() -> Self {
        Self {
            scan_result: None,
            manual_entry: false,
            fields: BillFields::default(),
            missing_fields: Vec::new(),
            phase: Phase::Idle,
            all_bills_entered: false,
            last_ticket: 0,
            extractor: BillTextExtractor,
        }
    }

    pub fn view(&self) -> View {
        if self.is_submitted() {
            View::Submitted
        } else if self.scan_result.is_some() || self.manual_entry {
            View::Entry
        } else {
            View::Prompt
        }
    }

    pub fn entry_mode(&self) -> Option<EntryMode> {
        match self.view() {
            View::Entry if self.manual_entry => Some(EntryMode::Manual),
            View::Entry => Some(EntryMode::Scanned),
            _ => None,
        }
    }

    pub fn scan_result(&self) -> Option<&str> {
        self.scan_result.as_deref()
    }

    pub fn fields(&self) -> &BillFields {
        &self.fields
    }

    /// Fields the last scan could not read. Empty for manual entry.
    pub fn missing_fields(&self) -> &[BillField] {
        &self.missing_fields
    }

    pub fn is_manual_entry(&self) -> bool {
        self.manual_entry
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Submitted { .. })
    }

    pub fn all_bills_entered(&self) -> bool {
        self.all_bills_entered
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        match &self.phase {
            Phase::Submitted { receipt, .. } => Some(receipt),
            _ => None,
        }
    }

    fn ensure_idle(&self) -> Result<(), FlowError> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Submitting { .. } => Err(FlowError::SubmissionInFlight),
            Phase::Submitted { .. } => Err(FlowError::AlreadySubmitted),
        }
    }

    /// Stores the scanned text and fills every field the extractor finds.
    /// Fields it cannot find keep their current value.
    pub fn scan_completed(
        &mut self,
        text: impl Into<String>,
    ) -> Result<Extraction, FlowError> {
        self.ensure_idle()?;

        let text = text.into();
        let extraction = self.extractor.extract(&text);
        extraction.apply_to(&mut self.fields);

        self.missing_fields = extraction.missing();
        self.scan_result = Some(text);
        self.manual_entry = false;

        info!(
            missing = self.missing_fields.len(),
            "scan completed, verifying extracted fields"
        );
        Ok(extraction)
    }

    pub fn request_manual_entry(&mut self) -> Result<(), FlowError> {
        self.ensure_idle()?;

        self.scan_result = None;
        self.missing_fields.clear();
        self.manual_entry = true;

        info!("manual entry requested");
        Ok(())
    }

    /// Updates one input while the entry form is shown.
    pub fn set_field(
        &mut self,
        field: BillField,
        value: impl Into<String>,
    ) -> Result<(), FlowError> {
        if self.view() != View::Entry {
            return Err(FlowError::NotEditing);
        }
        self.ensure_idle()?;

        self.fields.set(field, value);
        Ok(())
    }

    /// Leaves the entry form, discarding the scan and everything typed.
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        self.ensure_idle()?;
        if self.view() != View::Entry {
            return Err(FlowError::NotEditing);
        }

        self.scan_result = None;
        self.manual_entry = false;
        self.missing_fields.clear();
        self.fields.clear();

        info!("bill entry cancelled");
        Ok(())
    }

    /// Validates the form and marks the submission as in flight.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, FlowError> {
        if self.view() != View::Entry {
            return Err(FlowError::NotEditing);
        }
        self.ensure_idle()?;

        let bill = WaterBill::from_fields(&self.fields).map_err(|errors| {
            for error in &errors {
                warn!(%error, "validation error");
            }
            FlowError::Invalid(errors)
        })?;

        self.last_ticket += 1;
        let ticket = SubmissionTicket {
            id: self.last_ticket,
            bill,
        };
        self.phase = Phase::Submitting { ticket: ticket.id };

        info!(ticket = ticket.id, "submitting water bill");
        debug!(bill = %ticket.bill, "bill contents");
        Ok(ticket)
    }

    /// Shows the success state for `ticket`.
    pub fn complete_submission(
        &mut self,
        ticket: &SubmissionTicket,
        receipt: SubmissionReceipt,
    ) -> Result<(), FlowError> {
        match self.phase {
            Phase::Submitting { ticket: current } if current == ticket.id => {
                self.all_bills_entered = receipt.follow_up.all_bills_entered();
                self.phase = Phase::Submitted {
                    ticket: ticket.id,
                    receipt,
                };
                info!(
                    ticket = ticket.id,
                    route = %receipt.follow_up.route(),
                    "water bill recorded"
                );
                Ok(())
            }
            _ => self.stale(ticket),
        }
    }

    /// Returns to the form after a failed submission, keeping the entered values.
    pub fn abort_submission(
        &mut self,
        ticket: &SubmissionTicket,
    ) -> Result<(), FlowError> {
        match self.phase {
            Phase::Submitting { ticket: current } if current == ticket.id => {
                self.phase = Phase::Idle;
                warn!(ticket = ticket.id, "submission aborted");
                Ok(())
            }
            _ => self.stale(ticket),
        }
    }

    /// Ends the success window for `ticket` and clears the whole screen.
    pub fn finish(
        &mut self,
        ticket: &SubmissionTicket,
    ) -> Result<(), FlowError> {
        match self.phase {
            Phase::Submitted { ticket: current, .. } if current == ticket.id => {
                self.reset();
                debug!(ticket = ticket.id, "entry screen reset");
                Ok(())
            }
            _ => self.stale(ticket),
        }
    }

    fn stale(
        &self,
        ticket: &SubmissionTicket,
    ) -> Result<(), FlowError> {
        debug!(ticket = ticket.id, "ignoring stale submission ticket");
        Err(FlowError::StaleTicket(ticket.id))
    }

    fn reset(&mut self) {
        self.scan_result = None;
        self.manual_entry = false;
        self.fields.clear();
        self.missing_fields.clear();
        self.phase = Phase::Idle;
        self.all_bills_entered = false;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::FollowUp;

    const SCAN: &str = "Usage: 12.5\nAmount: $34.20\nDate: 01/02/2023";

    fn receipt(follow_up: FollowUp) -> SubmissionReceipt {
        SubmissionReceipt {
            follow_up,
            eco_points: 25,
        }
    }

    fn scanned_flow() -> EntryFlow {
        let mut flow = EntryFlow::new();
        flow.scan_completed(SCAN).unwrap();
        flow
    }

    #[test]
    fn starts_on_prompt() {
        let flow = EntryFlow::new();

        assert_eq!(flow.view(), View::Prompt);
        assert_eq!(flow.entry_mode(), None);
        assert!(flow.fields().is_empty());
    }

    #[test]
    fn scan_moves_to_entry_with_parsed_fields() {
        let flow = scanned_flow();

        assert_eq!(flow.view(), View::Entry);
        assert_eq!(flow.entry_mode(), Some(EntryMode::Scanned));
        assert_eq!(flow.scan_result(), Some(SCAN));
        assert_eq!(flow.fields().usage, "12.5");
        assert_eq!(flow.fields().amount, "34.20");
        assert_eq!(flow.fields().date, "01/02/2023");
        assert!(flow.missing_fields().is_empty());
    }

    #[test]
    fn partial_scan_reports_missing_field() {
        let mut flow = EntryFlow::new();
        flow.scan_completed("Usage: 3\nAmount: $9.10").unwrap();

        assert_eq!(flow.missing_fields(), &[BillField::Date]);
        assert_eq!(flow.fields().date, "");
    }

    #[test]
    fn manual_entry_clears_scan_result() {
        let mut flow = scanned_flow();
        flow.request_manual_entry().unwrap();

        assert_eq!(flow.scan_result(), None);
        assert!(flow.is_manual_entry());
        assert_eq!(flow.entry_mode(), Some(EntryMode::Manual));
        assert_eq!(
            flow.entry_mode().map(|m| m.heading()),
            Some("Enter Water Bill Details")
        );
    }

    #[test]
    fn cancel_returns_to_prompt() {
        let mut flow = scanned_flow();
        flow.cancel().unwrap();

        assert_eq!(flow.view(), View::Prompt);
        assert_eq!(flow.scan_result(), None);
        assert!(!flow.is_manual_entry());
        assert!(flow.fields().is_empty());
    }

    #[test]
    fn cancel_on_prompt_is_rejected() {
        let mut flow = EntryFlow::new();

        assert!(matches!(flow.cancel(), Err(FlowError::NotEditing)));
    }

    #[test]
    fn submit_cycle_goes_through_submitting_and_submitted() {
        let mut flow = scanned_flow();

        let ticket = flow.begin_submit().unwrap();
        assert!(flow.is_submitting());
        assert!(!flow.is_submitted());
        assert_eq!(flow.view(), View::Entry);

        flow.complete_submission(&ticket, receipt(FollowUp::AllBillsRecorded))
            .unwrap();
        assert!(!flow.is_submitting());
        assert!(flow.is_submitted());
        assert!(flow.all_bills_entered());
        assert_eq!(flow.view(), View::Submitted);

        flow.finish(&ticket).unwrap();
        assert_eq!(flow.view(), View::Prompt);
        assert!(flow.fields().is_empty());
        assert_eq!(flow.scan_result(), None);
        assert!(!flow.is_manual_entry());
        assert!(!flow.is_submitted());
        assert!(!flow.all_bills_entered());
        assert!(flow.receipt().is_none());
    }

    #[test]
    fn double_submit_is_rejected() {
        let mut flow = scanned_flow();
        flow.begin_submit().unwrap();

        assert!(matches!(
            flow.begin_submit(),
            Err(FlowError::SubmissionInFlight)
        ));
        assert!(matches!(flow.cancel(), Err(FlowError::SubmissionInFlight)));
    }

    #[test]
    fn invalid_fields_block_submission() {
        let mut flow = EntryFlow::new();
        flow.request_manual_entry().unwrap();
        flow.set_field(BillField::Usage, "12").unwrap();
        flow.set_field(BillField::Amount, "twelve").unwrap();

        let Err(FlowError::Invalid(errors)) = flow.begin_submit() else {
            panic!("expected validation errors");
        };
        let failing: Vec<BillField> = errors.iter().map(FieldError::field).collect();

        assert_eq!(failing, vec![BillField::Amount, BillField::Date]);
        assert!(!flow.is_submitting());
        assert_eq!(flow.view(), View::Entry);
    }

    #[test]
    fn stale_ticket_is_ignored_after_abort() {
        let mut flow = scanned_flow();
        let first = flow.begin_submit().unwrap();
        flow.abort_submission(&first).unwrap();
        let second = flow.begin_submit().unwrap();

        assert!(matches!(
            flow.complete_submission(&first, receipt(FollowUp::ContinueAdding)),
            Err(FlowError::StaleTicket(1))
        ));
        assert!(flow.is_submitting());

        flow.complete_submission(&second, receipt(FollowUp::ContinueAdding))
            .unwrap();
        assert!(matches!(flow.finish(&first), Err(FlowError::StaleTicket(1))));
        assert!(flow.is_submitted());
    }

    #[test]
    fn scan_is_rejected_while_submitted() {
        let mut flow = scanned_flow();
        let ticket = flow.begin_submit().unwrap();
        flow.complete_submission(&ticket, receipt(FollowUp::ContinueAdding))
            .unwrap();

        assert!(matches!(
            flow.scan_completed(SCAN),
            Err(FlowError::AlreadySubmitted)
        ));
        assert!(matches!(
            flow.set_field(BillField::Usage, "1"),
            Err(FlowError::NotEditing)
        ));
    }
}
