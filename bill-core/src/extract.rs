//! Field extraction from scanned bill text.
//!
//! The scan control hands over the raw OCR text. Three independent searches
//! pull the usage, amount and date out of it; the first match of each wins.
//!
//! ```text
//! Usage: 12.5
//! Amount: $34.20
//! Date: 01/02/2023
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::models::{BillField, BillFields};

static USAGE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"Usage: (\d+\.?\d*)"));
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"Amount: \$(\d+\.?\d*)"));
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"Date: (\d+/\d+/\d+)"));

/// Patterns are literals; `field_patterns_compile` checks them.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("bill field pattern must compile")
}

/// Values found in one scan, plus the fields that could not be found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub usage: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
}

impl Extraction {
    pub fn get(
        &self,
        field: BillField,
    ) -> Option<&str> {
        match field {
            BillField::Usage => self.usage.as_deref(),
            BillField::Amount => self.amount.as_deref(),
            BillField::Date => self.date.as_deref(),
        }
    }

    pub fn missing(&self) -> Vec<BillField> {
        BillField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Copies the found values into `fields`. Missing values leave the
    /// corresponding field untouched.
    pub fn apply_to(
        &self,
        fields: &mut BillFields,
    ) {
        for field in BillField::ALL {
            if let Some(value) = self.get(field) {
                fields.set(field, value);
            }
        }
    }
}

/// Pattern-matches bill fields out of free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BillTextExtractor;

impl BillTextExtractor {
    pub fn extract(
        &self,
        text: &str,
    ) -> Extraction {
        let extraction = Extraction {
            usage: first_capture(&USAGE_RE, text),
            amount: first_capture(&AMOUNT_RE, text),
            date: first_capture(&DATE_RE, text),
        };

        for field in extraction.missing() {
            warn!(%field, "field not found in scanned text");
        }
        debug!(?extraction, "extracted bill fields");

        extraction
    }
}

fn first_capture(
    re: &Regex,
    text: &str,
) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FULL_SCAN: &str = "\
CITY WATER UTILITY
Account: 0042-1187
Usage: 12.5 m3
Amount: $34.20
Date: 01/02/2023
";

    #[test]
    fn field_patterns_compile() {
        for re in [&*USAGE_RE, &*AMOUNT_RE, &*DATE_RE] {
            assert_eq!(re.captures_len(), 2, "{re}");
        }
    }

    #[test]
    fn extracts_all_three_fields() {
        let extraction = BillTextExtractor.extract(FULL_SCAN);

        assert_eq!(extraction.usage.as_deref(), Some("12.5"));
        assert_eq!(extraction.amount.as_deref(), Some("34.20"));
        assert_eq!(extraction.date.as_deref(), Some("01/02/2023"));
        assert!(extraction.is_complete());
    }

    #[test]
    fn missing_field_is_reported_and_left_unchanged() {
        let extraction = BillTextExtractor.extract("Usage: 7\nDate: 3/4/2024");
        let mut fields = BillFields {
            usage: String::new(),
            amount: "99.99".into(),
            date: String::new(),
        };
        extraction.apply_to(&mut fields);

        assert_eq!(extraction.missing(), vec![BillField::Amount]);
        assert_eq!(fields.usage, "7");
        assert_eq!(fields.amount, "99.99");
        assert_eq!(fields.date, "3/4/2024");
    }

    #[test]
    fn first_match_wins() {
        let extraction = BillTextExtractor.extract("Amount: $10.00\nAmount: $20.00");

        assert_eq!(extraction.amount.as_deref(), Some("10.00"));
    }

    #[test]
    fn amount_requires_dollar_sign() {
        let extraction = BillTextExtractor.extract("Amount: 34.20");

        assert_eq!(extraction.amount, None);
    }

    #[test]
    fn trailing_dot_is_kept() {
        let extraction = BillTextExtractor.extract("Usage: 12.");

        assert_eq!(extraction.usage.as_deref(), Some("12."));
    }

    #[test]
    fn empty_text_finds_nothing() {
        let extraction = BillTextExtractor.extract("");

        assert_eq!(
            extraction.missing(),
            vec![BillField::Usage, BillField::Amount, BillField::Date]
        );
    }
}
