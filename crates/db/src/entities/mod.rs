//! `SeaORM` entity definitions.

pub mod adjustments;
pub mod bank_accounts;
pub mod contacts;
pub mod funds;
pub mod parishes;
pub mod payrolls;
pub mod receipts;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
