//! School reference tables read by the fee ledger.
//!
//! These tables belong to the student and class registries. They are created
//! only when missing so the ledger can run against an existing school schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: STUDENTS
        // ============================================================
        db.execute_unprepared(STUDENTS_SQL).await?;

        // ============================================================
        // PART 2: CLASSES & SECTIONS
        // ============================================================
        db.execute_unprepared(CLASSES_SQL).await?;
        db.execute_unprepared(CLASS_SECTIONS_SQL).await?;

        // ============================================================
        // PART 3: ENROLLMENTS
        // ============================================================
        db.execute_unprepared(STUDENT_ASSIGNMENTS_SQL).await?;

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

const STUDENTS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    phone VARCHAR(20) NOT NULL,
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

const CLASSES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS classes (
    code VARCHAR(8) PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

const CLASS_SECTIONS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS class_sections (
    code VARCHAR(8) PRIMARY KEY,
    "classCode" VARCHAR(8) NOT NULL REFERENCES classes(code) ON UPDATE CASCADE ON DELETE RESTRICT,
    section VARCHAR(10),
    name VARCHAR(100) NOT NULL,
    "academicYearCode" VARCHAR(8) NOT NULL,
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_class_sections_class_code ON class_sections("classCode");
"#;

const STUDENT_ASSIGNMENTS_SQL: &str = r#"
DO $$ BEGIN
    CREATE TYPE assignment_status AS ENUM ('ACTIVE', 'INACTIVE');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;

CREATE TABLE IF NOT EXISTS student_assignments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    "studentId" UUID NOT NULL REFERENCES students(id) ON UPDATE CASCADE ON DELETE RESTRICT,
    "classSectionCode" VARCHAR(8) NOT NULL REFERENCES class_sections(code) ON UPDATE CASCADE ON DELETE RESTRICT,
    status assignment_status NOT NULL DEFAULT 'ACTIVE',
    notes TEXT,
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_student_assignments_student
    ON student_assignments("studentId", status);
"#;

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS student_assignments CASCADE;
DROP TABLE IF EXISTS class_sections CASCADE;
DROP TABLE IF EXISTS classes CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TYPE IF EXISTS assignment_status CASCADE;
";
