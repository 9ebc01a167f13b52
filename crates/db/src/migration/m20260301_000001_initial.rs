//! Initial database migration.
//!
//! Creates all enums, tables, and indexes. Every concurrency
//! invariant lives here: unique code/receipt-number indexes, the
//! atomic sequence counter table, the exactly-one-dimension CHECK on
//! adjustments, and the salary idempotency index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;

        db.execute_unprepared(PARISHES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(FUNDS_SQL).await?;
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;
        db.execute_unprepared(CONTACTS_SQL).await?;

        db.execute_unprepared(SEQUENCES_SQL).await?;
        db.execute_unprepared(RECEIPTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(ADJUSTMENTS_SQL).await?;
        db.execute_unprepared(PAYROLLS_SQL).await?;

        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE record_kind AS ENUM ('income', 'expense');

CREATE TYPE record_status AS ENUM ('pending', 'approved', 'rejected');

CREATE TYPE payment_method AS ENUM ('cash', 'transfer');

CREATE TYPE expense_kind AS ENUM ('general', 'salary');

CREATE TYPE adjustment_kind AS ENUM ('increase', 'decrease');

CREATE TYPE receipt_status AS ENUM ('active', 'cancelled');

CREATE TYPE payroll_status AS ENUM ('draft', 'approved', 'paid');
";

const PARISHES_SQL: &str = r"
CREATE TABLE parishes (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    role VARCHAR(20) NOT NULL,
    parish_id UUID REFERENCES parishes(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const FUNDS_SQL: &str = r"
CREATE TABLE funds (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(100),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    bank_name VARCHAR(100) NOT NULL,
    account_no VARCHAR(50) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CONTACTS_SQL: &str = r"
CREATE TABLE contacts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    phone VARCHAR(30),
    bank_name VARCHAR(100),
    bank_account_no VARCHAR(50),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

// Codes are allocated with INSERT .. ON CONFLICT .. RETURNING on this
// table, so two concurrent allocations in the same (prefix, year)
// namespace serialize on the row and can never collide.
const SEQUENCES_SQL: &str = r"
CREATE TABLE sequences (
    prefix VARCHAR(10) NOT NULL,
    year INTEGER NOT NULL,
    value INTEGER NOT NULL,
    PRIMARY KEY (prefix, year)
);
";

const RECEIPTS_SQL: &str = r"
CREATE TABLE receipts (
    id UUID PRIMARY KEY,
    receipt_no VARCHAR(20) NOT NULL UNIQUE,
    record_kind record_kind NOT NULL,
    parish_id UUID NOT NULL REFERENCES parishes(id),
    amount NUMERIC(18, 2) NOT NULL,
    payer_payee VARCHAR(255),
    description TEXT NOT NULL,
    receipt_date DATE NOT NULL,
    status receipt_status NOT NULL DEFAULT 'active',
    issued_by UUID NOT NULL,
    cancelled_by UUID,
    cancelled_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    record_kind record_kind NOT NULL,
    parish_id UUID NOT NULL REFERENCES parishes(id),
    fund_id UUID REFERENCES funds(id),
    bank_account_id UUID REFERENCES bank_accounts(id),
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    payment_method payment_method NOT NULL,
    expense_kind expense_kind,
    counterparty_name VARCHAR(255),
    contact_id UUID REFERENCES contacts(id),
    description TEXT NOT NULL,
    transaction_date DATE NOT NULL,
    fiscal_year INTEGER NOT NULL,
    fiscal_period SMALLINT NOT NULL,
    images JSONB NOT NULL DEFAULT '[]',
    notes TEXT,
    status record_status NOT NULL DEFAULT 'pending',
    created_by UUID NOT NULL,
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    decision_notes TEXT,
    receipt_id UUID REFERENCES receipts(id),
    staff_id UUID,
    payroll_id UUID,
    salary_period VARCHAR(7),
    salary_snapshot JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Expense records carry a kind; income records never do.
    CONSTRAINT transactions_expense_kind_chk CHECK (
        (record_kind = 'expense') = (expense_kind IS NOT NULL)
    )
);
";

const ADJUSTMENTS_SQL: &str = r"
CREATE TABLE adjustments (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    parish_id UUID NOT NULL REFERENCES parishes(id),
    fund_id UUID REFERENCES funds(id),
    bank_account_id UUID REFERENCES bank_accounts(id),
    adjustment_kind adjustment_kind NOT NULL,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    description TEXT NOT NULL,
    adjustment_date DATE NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Exactly one target dimension.
    CONSTRAINT adjustments_one_dimension_chk CHECK (
        (fund_id IS NULL) <> (bank_account_id IS NULL)
    )
);
";

const PAYROLLS_SQL: &str = r"
CREATE TABLE payrolls (
    id UUID PRIMARY KEY,
    staff_id UUID NOT NULL,
    staff_name VARCHAR(255) NOT NULL,
    staff_phone VARCHAR(30),
    bank_name VARCHAR(100),
    bank_account_no VARCHAR(50),
    parish_id UUID NOT NULL REFERENCES parishes(id),
    salary_period VARCHAR(7) NOT NULL,
    basic_salary NUMERIC(18, 2) NOT NULL,
    allowances NUMERIC(18, 2) NOT NULL DEFAULT 0,
    advances NUMERIC(18, 2) NOT NULL DEFAULT 0,
    deductions NUMERIC(18, 2) NOT NULL DEFAULT 0,
    net_salary NUMERIC(18, 2) NOT NULL,
    status payroll_status NOT NULL DEFAULT 'draft',
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    paid_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT payrolls_staff_period_uniq UNIQUE (staff_id, salary_period)
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_transactions_parish_status
    ON transactions(parish_id, status);
CREATE INDEX idx_transactions_fund
    ON transactions(fund_id) WHERE fund_id IS NOT NULL;
CREATE INDEX idx_transactions_bank_account
    ON transactions(bank_account_id) WHERE bank_account_id IS NOT NULL;
CREATE INDEX idx_transactions_receipt
    ON transactions(receipt_id) WHERE receipt_id IS NOT NULL;
CREATE INDEX idx_transactions_fiscal
    ON transactions(fiscal_year, fiscal_period);

-- A retried payroll batch must not duplicate a staff member's salary
-- expense for the same period.
CREATE UNIQUE INDEX idx_transactions_salary_idempotency
    ON transactions(staff_id, salary_period)
    WHERE expense_kind = 'salary';

CREATE INDEX idx_adjustments_fund
    ON adjustments(fund_id) WHERE fund_id IS NOT NULL;
CREATE INDEX idx_adjustments_bank_account
    ON adjustments(bank_account_id) WHERE bank_account_id IS NOT NULL;

CREATE INDEX idx_payrolls_period_status
    ON payrolls(salary_period, status);

-- One active contact per phone number; cancelled/disabled contacts
-- free the number up again.
CREATE UNIQUE INDEX idx_contacts_active_phone
    ON contacts(phone) WHERE phone IS NOT NULL AND is_active;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS payrolls CASCADE;
DROP TABLE IF EXISTS adjustments CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS receipts CASCADE;
DROP TABLE IF EXISTS sequences CASCADE;
DROP TABLE IF EXISTS contacts CASCADE;
DROP TABLE IF EXISTS bank_accounts CASCADE;
DROP TABLE IF EXISTS funds CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS parishes CASCADE;

DROP TYPE IF EXISTS payroll_status;
DROP TYPE IF EXISTS receipt_status;
DROP TYPE IF EXISTS adjustment_kind;
DROP TYPE IF EXISTS expense_kind;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS record_status;
DROP TYPE IF EXISTS record_kind;
";
