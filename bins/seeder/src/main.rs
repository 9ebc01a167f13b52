//! Database seeder for Curia development and testing.
//!
//! Seeds a test parish, the standard funds, a bank account, users for
//! every role, and one month of draft payroll rows.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use curia_db::entities::{
    bank_accounts, funds, parishes, payrolls, sea_orm_active_enums::PayrollStatus, users,
};

/// Test parish ID (consistent for all seeds)
const TEST_PARISH_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = curia_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test parish...");
    seed_parish(&db).await;

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding funds...");
    seed_funds(&db).await;

    println!("Seeding bank account...");
    seed_bank_account(&db).await;

    println!("Seeding draft payroll rows...");
    seed_payrolls(&db).await;

    println!("Seeding complete!");
}

fn test_parish_id() -> Uuid {
    Uuid::parse_str(TEST_PARISH_ID).unwrap()
}

/// Seeds a test parish for development.
async fn seed_parish(db: &DatabaseConnection) {
    if parishes::Entity::find_by_id(test_parish_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Test parish already exists, skipping...");
        return;
    }

    let parish = parishes::ActiveModel {
        id: Set(test_parish_id()),
        code: Set("PAR-001".to_string()),
        name: Set("St. Mary Cathedral Parish".to_string()),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = parish.insert(db).await {
        eprintln!("Failed to insert test parish: {e}");
    } else {
        println!("  Created parish: St. Mary Cathedral Parish");
    }
}

/// Seeds one user per role.
async fn seed_users(db: &DatabaseConnection) {
    // Users carry no unique key, so guard on the parish instead.
    let existing = users::Entity::find()
        .filter(users::Column::ParishId.eq(test_parish_id()))
        .count(db)
        .await
        .unwrap_or(0);
    if existing > 0 {
        println!("  Users already exist, skipping...");
        return;
    }

    let seed_users = [
        ("Maria Viewer", "viewer"),
        ("Agnes Secretary", "secretary"),
        ("Fr. Thomas", "priest"),
        ("Joseph Accountant", "accountant"),
        ("Clara Admin", "super_admin"),
    ];

    let mut inserted = 0;
    for (name, role) in seed_users {
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            role: Set(role.to_string()),
            parish_id: Set(Some(test_parish_id())),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert user {name}: {e}");
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} users");
}

/// Seeds the standard funds.
async fn seed_funds(db: &DatabaseConnection) {
    let seed_funds = [
        ("F-001", "General Fund", Some("operational")),
        ("F-002", "Mass Stipends", Some("liturgical")),
        ("F-003", "Building Fund", Some("capital")),
        ("F-004", "Charity Fund", Some("social")),
    ];

    let mut inserted = 0;
    for (code, name, category) in seed_funds {
        let fund = funds::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            category: Set(category.map(str::to_string)),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = fund.insert(db).await {
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert fund {code}: {e}");
            }
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} funds");
}

/// Seeds an operating bank account.
async fn seed_bank_account(db: &DatabaseConnection) {
    let account = bank_accounts::ActiveModel {
        id: Set(Uuid::now_v7()),
        code: Set("BA-001".to_string()),
        name: Set("Parish Operating Account".to_string()),
        bank_name: Set("Bank Central".to_string()),
        account_no: Set("1234567890".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = account.insert(db).await {
        if !e.to_string().contains("duplicate key") {
            eprintln!("Failed to insert bank account: {e}");
        }
    } else {
        println!("  Created bank account: Parish Operating Account");
    }
}

/// Seeds draft payroll rows for the current month.
async fn seed_payrolls(db: &DatabaseConnection) {
    let period = Utc::now().date_naive().format("%m/%Y").to_string();

    // Phones must be distinct; the contact resolver keys on them and
    // would otherwise fold every staff member into one contact.
    let staff = [
        ("Anna Organist", "+62-812-0000-0001", dec!(4_000_000), dec!(500_000), dec!(0)),
        ("Peter Caretaker", "+62-812-0000-0002", dec!(3_500_000), dec!(250_000), dec!(100_000)),
        ("Lucy Catechist", "+62-812-0000-0003", dec!(3_000_000), dec!(0), dec!(0)),
    ];

    let mut inserted = 0;
    for (name, phone, basic, allowances, deductions) in staff {
        let net = basic + allowances - deductions;
        let row = payrolls::ActiveModel {
            id: Set(Uuid::now_v7()),
            staff_id: Set(Uuid::now_v7()),
            staff_name: Set(name.to_string()),
            staff_phone: Set(Some(phone.to_string())),
            bank_name: Set(Some("Bank Central".to_string())),
            bank_account_no: Set(Some("9876543210".to_string())),
            parish_id: Set(test_parish_id()),
            salary_period: Set(period.clone()),
            basic_salary: Set(basic),
            allowances: Set(allowances),
            advances: Set(rust_decimal::Decimal::ZERO),
            deductions: Set(deductions),
            net_salary: Set(net),
            status: Set(PayrollStatus::Draft),
            approved_by: Set(None),
            approved_at: Set(None),
            paid_at: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = row.insert(db).await {
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert payroll row for {name}: {e}");
            }
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} draft payroll rows for {period}");
}
