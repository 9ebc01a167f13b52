//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `FundId` where a
//! `BankAccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(ParishId, "Unique identifier for a parish.");
typed_id!(FundId, "Unique identifier for a fund.");
typed_id!(BankAccountId, "Unique identifier for a bank account.");
typed_id!(TransactionId, "Unique identifier for a transaction record.");
typed_id!(ReceiptId, "Unique identifier for a receipt.");
typed_id!(AdjustmentId, "Unique identifier for a balance adjustment.");
typed_id!(ContactId, "Unique identifier for a counterparty contact.");
typed_id!(PayrollId, "Unique identifier for a payroll row.");
typed_id!(StaffId, "Unique identifier for a staff member.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_ids_are_distinct_types() {
        let fund = FundId::new();
        let bank = BankAccountId::new();
        // Same inner representation, different types; equality across
        // types would not even compile.
        assert_ne!(fund.into_inner(), bank.into_inner());
    }

    #[test]
    fn test_id_display_and_parse_round_trip() {
        let id = TransactionId::new();
        let parsed = TransactionId::from_str(&id.to_string()).expect("parse back");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_v7_ids_are_time_ordered() {
        let a = ReceiptId::new();
        let b = ReceiptId::new();
        assert!(a.into_inner() <= b.into_inner());
    }
}
