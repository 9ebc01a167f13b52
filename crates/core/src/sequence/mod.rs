//! Year-scoped sequential code formatting.
//!
//! Codes look like `EXP-2024-0007`: a prefix naming the record family,
//! the calendar year, and a zero-padded sequence number. Numbering
//! restarts every year because the year is part of the counter key.
//! Allocation itself is an atomic counter in the database layer; this
//! module only formats and parses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Code prefix identifying the record family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CodePrefix {
    /// Income transaction records.
    Income,
    /// Expense transaction records.
    Expense,
    /// Manual balance adjustments.
    Adjustment,
    /// Receipts (shared across income and expense).
    Receipt,
}

impl CodePrefix {
    /// Returns the short prefix used in codes.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INC",
            Self::Expense => "EXP",
            Self::Adjustment => "ADJ",
            Self::Receipt => "REC",
        }
    }

    /// Parses a prefix from its short form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INC" => Some(Self::Income),
            "EXP" => Some(Self::Expense),
            "ADJ" => Some(Self::Adjustment),
            "REC" => Some(Self::Receipt),
            _ => None,
        }
    }
}

impl fmt::Display for CodePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Formats a code as `PREFIX-YYYY-NNNN`.
///
/// Sequence numbers are padded to four digits; a counter past 9999
/// simply widens instead of wrapping.
#[must_use]
pub fn format_code(prefix: CodePrefix, year: i32, seq: i64) -> String {
    format!("{prefix}-{year}-{seq:04}")
}

/// A code parsed back into its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCode {
    /// The record family.
    pub prefix: CodePrefix,
    /// The calendar year embedded in the code.
    pub year: i32,
    /// The sequence number within (prefix, year).
    pub seq: i64,
}

/// Parses a `PREFIX-YYYY-NNNN` code.
#[must_use]
pub fn parse_code(code: &str) -> Option<ParsedCode> {
    let mut parts = code.splitn(3, '-');
    let prefix = CodePrefix::parse(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    let seq_part = parts.next()?;
    if seq_part.is_empty() || !seq_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seq: i64 = seq_part.parse().ok()?;
    Some(ParsedCode { prefix, year, seq })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_zero_pads() {
        assert_eq!(format_code(CodePrefix::Expense, 2024, 7), "EXP-2024-0007");
        assert_eq!(format_code(CodePrefix::Income, 2024, 1), "INC-2024-0001");
        assert_eq!(format_code(CodePrefix::Receipt, 2025, 123), "REC-2025-0123");
    }

    #[test]
    fn test_format_code_widens_past_9999() {
        assert_eq!(
            format_code(CodePrefix::Adjustment, 2024, 10001),
            "ADJ-2024-10001"
        );
    }

    #[test]
    fn test_parse_code_round_trip() {
        let code = format_code(CodePrefix::Receipt, 2024, 42);
        let parsed = parse_code(&code).expect("valid code");
        assert_eq!(parsed.prefix, CodePrefix::Receipt);
        assert_eq!(parsed.year, 2024);
        assert_eq!(parsed.seq, 42);
    }

    #[test]
    fn test_parse_code_rejects_garbage() {
        assert_eq!(parse_code(""), None);
        assert_eq!(parse_code("EXP-2024"), None);
        assert_eq!(parse_code("XYZ-2024-0001"), None);
        assert_eq!(parse_code("EXP-20x4-0001"), None);
        assert_eq!(parse_code("EXP-2024-00a1"), None);
    }

    #[test]
    fn test_codes_strictly_increase_within_namespace() {
        let codes: Vec<String> = (1..=20)
            .map(|n| format_code(CodePrefix::Expense, 2024, n))
            .collect();
        let mut sorted = codes.clone();
        sorted.sort();
        // Lexicographic order matches numeric order thanks to padding.
        assert_eq!(codes, sorted);
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_prefix_round_trip() {
        for prefix in [
            CodePrefix::Income,
            CodePrefix::Expense,
            CodePrefix::Adjustment,
            CodePrefix::Receipt,
        ] {
            assert_eq!(CodePrefix::parse(prefix.as_str()), Some(prefix));
        }
    }
}
