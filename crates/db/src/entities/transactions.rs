//! `SeaORM` Entity for the transactions table.
//!
//! One row per income or expense record. Salary expenses staged from
//! payroll additionally carry the staff reference, the `MM/YYYY`
//! period token, and a frozen snapshot of the payroll line items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{
    ExpenseKind, PaymentMethod, RecordKind, RecordStatus,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub record_kind: RecordKind,
    pub parish_id: Uuid,
    pub fund_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub expense_kind: Option<ExpenseKind>,
    pub counterparty_name: Option<String>,
    pub contact_id: Option<Uuid>,
    pub description: String,
    pub transaction_date: Date,
    pub fiscal_year: i32,
    pub fiscal_period: i16,
    pub images: Json,
    pub notes: Option<String>,
    pub status: RecordStatus,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub decision_notes: Option<String>,
    pub receipt_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub payroll_id: Option<Uuid>,
    pub salary_period: Option<String>,
    pub salary_snapshot: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parishes::Entity",
        from = "Column::ParishId",
        to = "super::parishes::Column::Id"
    )]
    Parishes,
    #[sea_orm(
        belongs_to = "super::funds::Entity",
        from = "Column::FundId",
        to = "super::funds::Column::Id"
    )]
    Funds,
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id"
    )]
    BankAccounts,
    #[sea_orm(
        belongs_to = "super::receipts::Entity",
        from = "Column::ReceiptId",
        to = "super::receipts::Column::Id"
    )]
    Receipts,
    #[sea_orm(
        belongs_to = "super::contacts::Entity",
        from = "Column::ContactId",
        to = "super::contacts::Column::Id"
    )]
    Contacts,
}

impl Related<super::receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipts.def()
    }
}

impl Related<super::parishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parishes.def()
    }
}

impl Related<super::funds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Funds.def()
    }
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
