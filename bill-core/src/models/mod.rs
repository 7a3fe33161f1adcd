mod bill_field;
mod follow_up;
mod water_bill;

pub use bill_field::{BillField, BillFields};
pub use follow_up::{FollowUp, Route, SubmissionReceipt};
pub use water_bill::WaterBill;
