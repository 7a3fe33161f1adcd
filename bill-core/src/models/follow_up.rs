use std::fmt;

use serde::{Deserialize, Serialize};

/// Screens the success state can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    ConsumptionGoals,
    BillsSummary,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::ConsumptionGoals => "/consumption-goals",
            Self::BillsSummary => "/bills-summary",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What the user is pointed at after a bill is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUp {
    /// Every utility bill type is in; offer the consumption report.
    AllBillsRecorded,
    /// More bill types are missing; offer the consumption goals.
    ContinueAdding,
}

impl FollowUp {
    pub fn from_all_bills_entered(all_bills_entered: bool) -> Self {
        if all_bills_entered {
            Self::AllBillsRecorded
        } else {
            Self::ContinueAdding
        }
    }

    pub fn all_bills_entered(&self) -> bool {
        matches!(self, Self::AllBillsRecorded)
    }

    pub fn route(&self) -> Route {
        match self {
            Self::AllBillsRecorded => Route::BillsSummary,
            Self::ContinueAdding => Route::ConsumptionGoals,
        }
    }

    pub fn toast_title(&self) -> &'static str {
        match self {
            Self::AllBillsRecorded => "All Bill Types Recorded!",
            Self::ContinueAdding => "Water Bill Recorded Successfully",
        }
    }

    pub fn toast_description(&self) -> &'static str {
        match self {
            Self::AllBillsRecorded => {
                "View your comprehensive consumption report to see savings opportunities."
            }
            Self::ContinueAdding => {
                "Continue adding your other utility bills for a complete analysis."
            }
        }
    }

    pub fn toast_action_label(&self) -> &'static str {
        match self {
            Self::AllBillsRecorded => "View Report",
            Self::ContinueAdding => "View Goals",
        }
    }

    /// Label of the link button on the success card.
    pub fn link_label(&self) -> &'static str {
        match self {
            Self::AllBillsRecorded => "View Consumption Report",
            Self::ContinueAdding => "View Consumption Goals",
        }
    }

    /// Only shown while other bill types are still missing.
    pub fn next_steps(&self) -> Option<&'static str> {
        match self {
            Self::AllBillsRecorded => None,
            Self::ContinueAdding => Some(
                "For a complete analysis of your consumption patterns and potential savings, \
                 add your electricity and fuel bills too.",
            ),
        }
    }
}

/// Result of a successful (simulated) submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub follow_up: FollowUp,
    pub eco_points: u32,
}

impl fmt::Display for SubmissionReceipt {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", self.follow_up.toast_title())?;
        writeln!(f, "{}", self.follow_up.toast_description())?;
        writeln!(f, "Eco points earned: {}", self.eco_points)?;
        write!(
            f,
            "{}: {}",
            self.follow_up.toast_action_label(),
            self.follow_up.route()
        )
    }
}
