//! Fee ledger schema.
//!
//! Creates the catalog (fee types, fee structures), the obligations
//! (fee transactions) and the money received (payments, allocations).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: FEE CATALOG
        // ============================================================
        db.execute_unprepared(FEE_TYPES_SQL).await?;
        db.execute_unprepared(FEE_STRUCTURES_SQL).await?;

        // ============================================================
        // PART 3: OBLIGATIONS
        // ============================================================
        db.execute_unprepared(FEE_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: PAYMENTS & ALLOCATIONS
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(PAYMENT_ALLOCATIONS_SQL).await?;

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
CREATE TYPE fee_applicability AS ENUM ('CURRICULAR', 'EXTRA_CURRICULAR', 'BOTH');

CREATE TYPE fee_frequency AS ENUM ('MONTHLY', 'QUARTERLY', 'HALF_YEARLY', 'ANNUAL', 'ONE_TIME');

CREATE TYPE fee_transaction_status AS ENUM ('PENDING', 'PARTIAL', 'PAID', 'CANCELLED');

CREATE TYPE payment_mode AS ENUM (
    'CASH',
    'CHEQUE',
    'UPI',
    'CARD',
    'NET_BANKING',
    'DEMAND_DRAFT'
);
";

const FEE_TYPES_SQL: &str = r#"
CREATE TABLE fee_types (
    code VARCHAR(20) PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    description VARCHAR(255),
    "applicableTo" fee_applicability NOT NULL DEFAULT 'BOTH',
    "isActive" BOOLEAN NOT NULL DEFAULT true,
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "deletedAt" TIMESTAMPTZ
);
"#;

const FEE_STRUCTURES_SQL: &str = r#"
CREATE TABLE fee_structures (
    code VARCHAR(50) PRIMARY KEY,
    "feeTypeCode" VARCHAR(20) NOT NULL REFERENCES fee_types(code) ON UPDATE CASCADE ON DELETE RESTRICT,
    "classCode" VARCHAR(8) NOT NULL REFERENCES classes(code) ON UPDATE CASCADE ON DELETE RESTRICT,
    frequency fee_frequency NOT NULL,
    amount DECIMAL(10, 2) NOT NULL,
    "academicYear" VARCHAR(20) NOT NULL,
    "isActive" BOOLEAN NOT NULL DEFAULT true,
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "deletedAt" TIMESTAMPTZ,

    CONSTRAINT chk_fee_structures_amount CHECK (amount >= 0)
);

CREATE INDEX idx_fee_structures_fee_type_code ON fee_structures("feeTypeCode");
CREATE INDEX idx_fee_structures_class_code ON fee_structures("classCode");
CREATE INDEX idx_fee_structures_academic_year ON fee_structures("academicYear");
"#;

const FEE_TRANSACTIONS_SQL: &str = r#"
CREATE TABLE fee_transactions (
    code VARCHAR(100) PRIMARY KEY,
    "studentId" UUID NOT NULL REFERENCES students(id) ON UPDATE CASCADE ON DELETE RESTRICT,
    "feeStructureCode" VARCHAR(50) NOT NULL REFERENCES fee_structures(code) ON UPDATE CASCADE ON DELETE RESTRICT,
    "dueDate" DATE NOT NULL,
    "baseAmount" DECIMAL(10, 2) NOT NULL,
    "customAmount" DECIMAL(10, 2),
    "netAmount" DECIMAL(10, 2) NOT NULL,
    "paidAmount" DECIMAL(10, 2) NOT NULL DEFAULT 0,
    status fee_transaction_status NOT NULL DEFAULT 'PENDING',
    remarks VARCHAR(500),
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "deletedAt" TIMESTAMPTZ,

    CONSTRAINT chk_fee_transactions_base CHECK ("baseAmount" >= 0),
    CONSTRAINT chk_fee_transactions_net CHECK ("netAmount" = COALESCE("customAmount", "baseAmount")),
    CONSTRAINT chk_fee_transactions_paid CHECK ("paidAmount" >= 0 AND "paidAmount" <= "netAmount")
);

CREATE INDEX idx_fee_transactions_student_outstanding
    ON fee_transactions("studentId", status, "dueDate", "createdAt");
CREATE INDEX idx_fee_transactions_fee_structure ON fee_transactions("feeStructureCode");
"#;

const PAYMENTS_SQL: &str = r#"
CREATE TABLE payments (
    id SERIAL PRIMARY KEY,
    "studentId" UUID NOT NULL REFERENCES students(id) ON UPDATE CASCADE ON DELETE RESTRICT,
    amount DECIMAL(10, 2) NOT NULL,
    "paymentDate" DATE NOT NULL,
    "paymentMode" payment_mode NOT NULL,
    "referenceNumber" VARCHAR(100),
    remarks VARCHAR(500),
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "deletedAt" TIMESTAMPTZ,

    CONSTRAINT chk_payments_amount CHECK (amount > 0)
);

CREATE INDEX idx_payments_student_date ON payments("studentId", "paymentDate" DESC);
"#;

const PAYMENT_ALLOCATIONS_SQL: &str = r#"
CREATE TABLE payment_allocations (
    id SERIAL PRIMARY KEY,
    "paymentId" INTEGER NOT NULL REFERENCES payments(id) ON UPDATE CASCADE ON DELETE RESTRICT,
    "feeTransactionCode" VARCHAR(100) NOT NULL REFERENCES fee_transactions(code) ON UPDATE CASCADE ON DELETE RESTRICT,
    "allocatedAmount" DECIMAL(10, 2) NOT NULL,
    "allocationDate" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_payment_allocations_amount CHECK ("allocatedAmount" > 0)
);

CREATE INDEX idx_payment_allocations_payment ON payment_allocations("paymentId");
CREATE INDEX idx_payment_allocations_fee_transaction ON payment_allocations("feeTransactionCode");
"#;

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS payment_allocations CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS fee_transactions CASCADE;
DROP TABLE IF EXISTS fee_structures CASCADE;
DROP TABLE IF EXISTS fee_types CASCADE;
DROP TYPE IF EXISTS payment_mode CASCADE;
DROP TYPE IF EXISTS fee_transaction_status CASCADE;
DROP TYPE IF EXISTS fee_frequency CASCADE;
DROP TYPE IF EXISTS fee_applicability CASCADE;
";
