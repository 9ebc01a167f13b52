//! Counterparty contact resolution.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use curia_core::payroll::StaffContact;

use crate::entities::contacts;

/// Finds or creates counterparty contacts keyed by phone number.
pub struct ContactRepository;

impl ContactRepository {
    /// Resolves a contact for a staff member.
    ///
    /// Reuses an existing active contact with the same phone,
    /// backfilling missing bank metadata onto it; creates a new
    /// contact otherwise. Staff without a phone always get a fresh
    /// contact, since there is no key to dedupe on.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn resolve<C: ConnectionTrait>(
        conn: &C,
        staff: &StaffContact,
    ) -> Result<Uuid, DbErr> {
        if let Some(phone) = &staff.phone {
            let existing = contacts::Entity::find()
                .filter(contacts::Column::Phone.eq(phone.as_str()))
                .filter(contacts::Column::IsActive.eq(true))
                .one(conn)
                .await?;

            if let Some(contact) = existing {
                let needs_bank_name = contact.bank_name.is_none() && staff.bank_name.is_some();
                let needs_account_no =
                    contact.bank_account_no.is_none() && staff.bank_account_no.is_some();

                let id = contact.id;
                if needs_bank_name || needs_account_no {
                    let mut active: contacts::ActiveModel = contact.into();
                    if needs_bank_name {
                        active.bank_name = Set(staff.bank_name.clone());
                    }
                    if needs_account_no {
                        active.bank_account_no = Set(staff.bank_account_no.clone());
                    }
                    active.updated_at = Set(Utc::now().into());
                    active.update(conn).await?;
                }
                return Ok(id);
            }
        }

        let now = Utc::now().into();
        let id = Uuid::now_v7();
        let contact = contacts::ActiveModel {
            id: Set(id),
            name: Set(staff.name.clone()),
            phone: Set(staff.phone.clone()),
            bank_name: Set(staff.bank_name.clone()),
            bank_account_no: Set(staff.bank_account_no.clone()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        contact.insert(conn).await?;

        Ok(id)
    }
}
