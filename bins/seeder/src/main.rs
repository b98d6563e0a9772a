//! Database seeder for Bursar development and testing.
//!
//! Seeds a demo class with one section, an enrolled student, a handful of
//! fee types and the fee structures that bill them for 2023-2024.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::str::FromStr;
use uuid::Uuid;

use bursar_db::entities::{
    class_sections, classes, fee_structures, fee_types,
    sea_orm_active_enums::{AssignmentStatus, FeeApplicability, FeeFrequency},
    student_assignments, students,
};
use bursar_shared::config::DatabaseConfig;

/// Demo student ID (consistent for all seeds)
const DEMO_STUDENT_ID: &str = "00000000-0000-0000-0000-000000000101";
/// Demo enrollment ID
const DEMO_ASSIGNMENT_ID: &str = "00000000-0000-0000-0000-000000000102";

const DEMO_CLASS: &str = "GRADE-5";
const DEMO_SECTION: &str = "GRADE-5-A-2324";
const DEMO_ACADEMIC_YEAR: &str = "2023-2024";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let config = DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    };

    println!("Connecting to database...");
    let db = bursar_db::connect(&config)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo class and section...");
    seed_class(&db).await;

    println!("Seeding demo student...");
    seed_student(&db).await;

    println!("Seeding fee types...");
    seed_fee_types(&db).await;

    println!("Seeding fee structures...");
    seed_fee_structures(&db).await;

    println!("Seeding complete!");
    println!("  Bill the demo student with:");
    println!(
        "  POST /fee-transactions/generate {{\"studentId\":\"{DEMO_STUDENT_ID}\",\"month\":\"2024-04\",\"academicYear\":\"{DEMO_ACADEMIC_YEAR}\"}}"
    );
}

fn demo_student_id() -> Uuid {
    Uuid::parse_str(DEMO_STUDENT_ID).unwrap()
}

fn demo_assignment_id() -> Uuid {
    Uuid::parse_str(DEMO_ASSIGNMENT_ID).unwrap()
}

/// Seeds the demo class and its section for the academic year.
async fn seed_class(db: &DatabaseConnection) {
    if classes::Entity::find_by_id(DEMO_CLASS)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo class already exists, skipping...");
        return;
    }

    let class = classes::ActiveModel {
        code: Set(DEMO_CLASS.to_string()),
        name: Set("Grade 5".to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };
    if let Err(e) = class.insert(db).await {
        eprintln!("Failed to insert demo class: {e}");
        return;
    }

    let section = class_sections::ActiveModel {
        code: Set(DEMO_SECTION.to_string()),
        class_code: Set(DEMO_CLASS.to_string()),
        section: Set(Some("A".to_string())),
        name: Set("Grade 5 - A".to_string()),
        academic_year_code: Set(DEMO_ACADEMIC_YEAR.to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };
    if let Err(e) = section.insert(db).await {
        eprintln!("Failed to insert demo section: {e}");
    } else {
        println!("  Created class {DEMO_CLASS} with section {DEMO_SECTION}");
    }
}

/// Seeds a demo student with an active enrollment.
async fn seed_student(db: &DatabaseConnection) {
    if students::Entity::find_by_id(demo_student_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo student already exists, skipping...");
        return;
    }

    let student = students::ActiveModel {
        id: Set(demo_student_id()),
        name: Set("Demo Student".to_string()),
        phone: Set("9000000000".to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };
    if let Err(e) = student.insert(db).await {
        eprintln!("Failed to insert demo student: {e}");
        return;
    }

    let assignment = student_assignments::ActiveModel {
        id: Set(demo_assignment_id()),
        student_id: Set(demo_student_id()),
        class_section_code: Set(DEMO_SECTION.to_string()),
        status: Set(AssignmentStatus::Active),
        notes: Set(Some("seeded".to_string())),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };
    if let Err(e) = assignment.insert(db).await {
        eprintln!("Failed to insert demo enrollment: {e}");
    } else {
        println!("  Created student {DEMO_STUDENT_ID} enrolled in {DEMO_SECTION}");
    }
}

/// Seeds the fee types the demo structures bill.
async fn seed_fee_types(db: &DatabaseConnection) {
    let fee_types_data = [
        ("TUITION", "Tuition Fee", "Monthly tuition", FeeApplicability::Curricular),
        ("LAB", "Laboratory Fee", "Science lab consumables", FeeApplicability::Curricular),
        ("SPORTS", "Sports Fee", "Coaching and equipment", FeeApplicability::ExtraCurricular),
        ("ANNUAL", "Annual Charges", "Books, diary and ID card", FeeApplicability::Both),
    ];

    let mut inserted = 0;

    for (code, name, description, applicable_to) in fee_types_data {
        if fee_types::Entity::find_by_id(code)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            continue;
        }

        let fee_type = fee_types::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            applicable_to: Set(applicable_to),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
            deleted_at: Set(None),
        };

        if let Err(e) = fee_type.insert(db).await {
            eprintln!("Failed to insert fee type {code}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} fee types");
}

/// Seeds one structure per fee type for the demo class.
async fn seed_fee_structures(db: &DatabaseConnection) {
    let structures_data = [
        ("FS-G5-TUITION-2324", "TUITION", FeeFrequency::Monthly, "4500.00"),
        ("FS-G5-LAB-2324", "LAB", FeeFrequency::Quarterly, "1200.00"),
        ("FS-G5-SPORTS-2324", "SPORTS", FeeFrequency::HalfYearly, "1500.00"),
        ("FS-G5-ANNUAL-2324", "ANNUAL", FeeFrequency::Annual, "3000.00"),
    ];

    let mut inserted = 0;

    for (code, fee_type_code, frequency, amount) in structures_data {
        if fee_structures::Entity::find_by_id(code)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            continue;
        }

        let structure = fee_structures::ActiveModel {
            code: Set(code.to_string()),
            fee_type_code: Set(fee_type_code.to_string()),
            class_code: Set(DEMO_CLASS.to_string()),
            frequency: Set(frequency),
            amount: Set(Decimal::from_str(amount).unwrap()),
            academic_year: Set(DEMO_ACADEMIC_YEAR.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
            deleted_at: Set(None),
        };

        if let Err(e) = structure.insert(db).await {
            eprintln!("Failed to insert fee structure {code}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} fee structures (academic year {DEMO_ACADEMIC_YEAR})");
}
