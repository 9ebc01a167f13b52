//! `SeaORM` Entity for the receipts table.
//!
//! The transactions a receipt covers are found through their
//! `receipt_id` back-reference; the receipt row itself stores only
//! the printed document fields.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{RecordKind, ReceiptStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub receipt_no: String,
    pub record_kind: RecordKind,
    pub parish_id: Uuid,
    pub amount: Decimal,
    pub payer_payee: Option<String>,
    pub description: String,
    pub receipt_date: Date,
    pub status: ReceiptStatus,
    pub issued_by: Uuid,
    pub cancelled_by: Option<Uuid>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(
        belongs_to = "super::parishes::Entity",
        from = "Column::ParishId",
        to = "super::parishes::Column::Id"
    )]
    Parishes,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
