//! `SeaORM` Entity for the payrolls table.
//!
//! One row per staff member per `MM/YYYY` period. Contact details are
//! denormalized onto the row so the bridge can resolve counterparty
//! contacts without a staff table join.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PayrollStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payrolls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub staff_id: Uuid,
    pub staff_name: String,
    pub staff_phone: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_no: Option<String>,
    pub parish_id: Uuid,
    pub salary_period: String,
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub advances: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
    pub status: PayrollStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub paid_at: Option<DateTimeWithTimeZone>,
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
}

impl ActiveModelBehavior for ActiveModel {}
