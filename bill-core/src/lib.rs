pub mod config;
pub mod extract;
pub mod flow;
pub mod models;
pub mod parse;
pub mod submission;

pub use config::{AppConfig, ConfigError, LoggingConfig, SubmissionConfig};
pub use extract::{BillTextExtractor, Extraction};
pub use flow::{EntryFlow, EntryMode, FlowError, SubmissionTicket, View};
pub use models::*;
pub use parse::FieldError;
pub use submission::{
    FixedOutcome, OutcomeSource, RandomOutcome, SimulatedSubmitter, SubmitError, Submitter,
    run_submission,
};
