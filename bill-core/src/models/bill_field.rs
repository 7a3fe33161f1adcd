use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three values read off a water bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillField {
    Usage,
    Amount,
    Date,
}

impl BillField {
    pub const ALL: [BillField; 3] = [BillField::Usage, BillField::Amount, BillField::Date];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Amount => "amount",
            Self::Date => "date",
        }
    }

    /// Form label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Usage => "Water Usage (m³)",
            Self::Amount => "Bill Amount ($)",
            Self::Date => "Bill Date",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Usage => "Enter water usage in cubic meters",
            Self::Amount => "Enter bill amount in dollars",
            Self::Date => "DD/MM/YYYY",
        }
    }
}

impl fmt::Display for BillField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, unvalidated text of the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFields {
    pub usage: String,
    pub amount: String,
    pub date: String,
}

impl BillFields {
    pub fn get(
        &self,
        field: BillField,
    ) -> &str {
        match field {
            BillField::Usage => &self.usage,
            BillField::Amount => &self.amount,
            BillField::Date => &self.date,
        }
    }

    pub fn set(
        &mut self,
        field: BillField,
        value: impl Into<String>,
    ) {
        let slot = match field {
            BillField::Usage => &mut self.usage,
            BillField::Amount => &mut self.amount,
            BillField::Date => &mut self.date,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty() && self.amount.is_empty() && self.date.is_empty()
    }

    pub fn clear(&mut self) {
        self.usage.clear();
        self.amount.clear();
        self.date.clear();
    }
}
