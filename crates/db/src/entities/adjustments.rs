//! `SeaORM` Entity for the adjustments table.
//!
//! Exactly one of `fund_id`/`bank_account_id` is set, enforced by a
//! table CHECK constraint. Adjustments apply to balances
//! unconditionally from creation; there is no approval state.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AdjustmentKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "adjustments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub parish_id: Uuid,
    pub fund_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    pub adjustment_kind: AdjustmentKind,
    pub amount: Decimal,
    pub description: String,
    pub adjustment_date: Date,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
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

impl ActiveModelBehavior for ActiveModel {}
