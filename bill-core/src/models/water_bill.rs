use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    models::{BillField, BillFields},
    parse::{DATE_FORMAT, FieldError, parse_amount, parse_bill_date},
};

/// A validated water bill, ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterBill {
    /// Water consumed in cubic meters.
    pub usage_m3: Decimal,
    /// Billed amount in dollars.
    pub amount: Decimal,
    pub billed_on: NaiveDate,
}

impl WaterBill {
    /// Validates the raw form inputs.
    ///
    /// Rules:
    /// - usage and amount are required non-negative decimals
    /// - date is required, day-first with month-first and year-first fallbacks
    ///
    /// All failing fields are reported, not just the first.
    pub fn from_fields(fields: &BillFields) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let usage_m3 = parse_amount(BillField::Usage, &fields.usage)
            .map_err(|e| errors.push(e))
            .ok();
        let amount = parse_amount(BillField::Amount, &fields.amount)
            .map_err(|e| errors.push(e))
            .ok();
        let billed_on = parse_bill_date(&fields.date)
            .map_err(|e| errors.push(e))
            .ok();

        match (usage_m3, amount, billed_on) {
            (Some(usage_m3), Some(amount), Some(billed_on)) => Ok(Self {
                usage_m3,
                amount,
                billed_on,
            }),
            _ => Err(errors),
        }
    }
}

impl fmt::Display for WaterBill {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Usage (m³):  {}", self.usage_m3)?;
        writeln!(f, "Amount ($):  {}", self.amount)?;
        write!(f, "Bill date:   {}", self.billed_on.format(DATE_FORMAT))
    }
}
