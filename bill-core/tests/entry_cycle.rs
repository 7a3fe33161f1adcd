//! End-to-end runs of the entry screen state without a UI.

use std::time::Duration;

use bill_core::{
    BillField, EntryFlow, FixedOutcome, FlowError, FollowUp, RandomOutcome, Route,
    SimulatedSubmitter, View, run_submission,
};
use pretty_assertions::assert_eq;

const SCAN_FULL: &str = include_str!("../test-data/scan_full.txt");
const SCAN_NO_DATE: &str = include_str!("../test-data/scan_no_date.txt");

#[tokio::test]
async fn scanned_bill_is_recorded_and_screen_resets() {
    let mut flow = EntryFlow::new();
    let extraction = flow.scan_completed(SCAN_FULL).expect("scan on prompt");
    assert!(extraction.is_complete());

    let submitter = SimulatedSubmitter::new(Duration::ZERO, 25, FixedOutcome(true));
    let receipt = run_submission(&mut flow, &submitter, Duration::ZERO)
        .await
        .expect("submission should succeed");

    assert_eq!(receipt.follow_up, FollowUp::AllBillsRecorded);
    assert_eq!(receipt.follow_up.route(), Route::BillsSummary);
    assert_eq!(flow.view(), View::Prompt);
    assert!(flow.fields().is_empty());
    assert!(flow.scan_result().is_none());
}

#[tokio::test]
async fn partial_scan_completed_by_hand() {
    let mut flow = EntryFlow::new();
    flow.scan_completed(SCAN_NO_DATE).expect("scan on prompt");
    assert_eq!(flow.missing_fields(), &[BillField::Date]);
    assert_eq!(flow.fields().usage, "9");
    assert_eq!(flow.fields().amount, "21.75");

    let submitter = SimulatedSubmitter::new(Duration::ZERO, 25, FixedOutcome(false));
    let early = run_submission(&mut flow, &submitter, Duration::ZERO).await;
    assert!(matches!(early, Err(FlowError::Invalid(ref errors)) if errors.len() == 1));

    flow.set_field(BillField::Date, "15/03/2024")
        .expect("entry form is shown");
    let receipt = run_submission(&mut flow, &submitter, Duration::ZERO)
        .await
        .expect("submission should succeed");

    assert_eq!(receipt.follow_up.route(), Route::ConsumptionGoals);
    assert!(receipt.follow_up.next_steps().is_some());
}

#[tokio::test]
async fn manual_entry_with_random_outcome() {
    let mut flow = EntryFlow::new();
    flow.request_manual_entry().expect("manual entry on prompt");
    flow.set_field(BillField::Usage, "4.2").unwrap();
    flow.set_field(BillField::Amount, "1,020.00").unwrap();
    flow.set_field(BillField::Date, "1/1/2025").unwrap();

    let submitter = SimulatedSubmitter::new(Duration::ZERO, 25, RandomOutcome::default());
    let receipt = run_submission(&mut flow, &submitter, Duration::ZERO)
        .await
        .expect("submission should succeed");

    assert!(matches!(
        receipt.follow_up.route(),
        Route::BillsSummary | Route::ConsumptionGoals
    ));
    assert_eq!(flow.view(), View::Prompt);
}

#[tokio::test]
async fn timers_from_an_earlier_cycle_do_nothing() {
    let mut flow = EntryFlow::new();
    flow.scan_completed(SCAN_FULL).unwrap();

    let submitter = SimulatedSubmitter::new(Duration::ZERO, 25, FixedOutcome(false));
    let first = flow.begin_submit().unwrap();
    let receipt = bill_core::Submitter::submit(&submitter, first.bill())
        .await
        .unwrap();
    flow.complete_submission(&first, receipt).unwrap();
    flow.finish(&first).unwrap();

    flow.scan_completed(SCAN_FULL).unwrap();
    let second = flow.begin_submit().unwrap();

    // The first cycle's reset timer fires late.
    assert!(matches!(
        flow.finish(&first),
        Err(FlowError::StaleTicket(_))
    ));
    assert!(flow.is_submitting());
    assert_eq!(second.id(), first.id() + 1);
}

#[tokio::test]
async fn scanned_dates_in_other_layouts_are_submitted() {
    let submitter = SimulatedSubmitter::new(Duration::ZERO, 25, FixedOutcome(true));

    for date in ["12/31/2023", "2023/01/02"] {
        let mut flow = EntryFlow::new();
        let scan = format!("Usage: 12.5\nAmount: $34.20\nDate: {date}");
        let extraction = flow.scan_completed(&scan).expect("scan on prompt");
        assert!(extraction.is_complete());

        let receipt = run_submission(&mut flow, &submitter, Duration::ZERO)
            .await
            .unwrap_or_else(|e| panic!("{date} should submit: {e}"));

        assert_eq!(receipt.follow_up, FollowUp::AllBillsRecorded);
        assert_eq!(flow.view(), View::Prompt);
    }
}

#[tokio::test]
async fn scanned_two_digit_year_keeps_the_form_open() {
    let mut flow = EntryFlow::new();
    flow.scan_completed("Usage: 12.5\nAmount: $34.20\nDate: 1/2/23")
        .expect("scan on prompt");

    let submitter = SimulatedSubmitter::new(Duration::ZERO, 25, FixedOutcome(true));
    let result = run_submission(&mut flow, &submitter, Duration::ZERO).await;

    assert!(matches!(
        result,
        Err(FlowError::Invalid(ref errors))
            if errors.iter().map(|e| e.field()).collect::<Vec<_>>() == vec![BillField::Date]
    ));
    assert_eq!(flow.view(), View::Entry);
    assert_eq!(flow.fields().date, "1/2/23");
}
