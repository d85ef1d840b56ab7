//! # Seed Data Generator
//!
//! Populates the database with sample products and activities for
//! development, and can promote an existing account to admin.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p farm-db --bin seed
//!
//! # Specify database path
//! cargo run -p farm-db --bin seed -- --db ./data/farm.db
//!
//! # Promote a signed-up account so it can use /api/admin
//! cargo run -p farm-db --bin seed -- --promote ada@farm.test
//! ```

use std::env;

use farm_core::Role;
use farm_db::{Database, DbConfig, ItemDraft};

/// Sample products: (id, name, description, quantity)
const PRODUCTS: &[(&str, &str, &str, i64)] = &[
    ("bread", "Sourdough Bread", "Baked Saturday morning", 20),
    ("eggs", "Free-Range Eggs", "Half dozen", 40),
    ("honey", "Wildflower Honey", "250g jar", 12),
    ("carrots", "Heirloom Carrots", "1kg bunch", 30),
    ("cheese", "Farmhouse Cheddar", "Aged 12 months", 8),
    ("apples", "Cox Apples", "Bag of 6", 25),
    ("milk", "Raw Milk", "1 litre, glass bottle", 15),
    ("jam", "Strawberry Jam", "Made on the farm", 10),
];

/// Sample activities: (id, name, description, capacity)
const ACTIVITIES: &[(&str, &str, &str, i64)] = &[
    ("harvest-day", "Harvest Day", "Help bring in the autumn crop", 25),
    ("milking", "Morning Milking", "Meet the herd at 6am", 6),
    ("beekeeping", "Beekeeping Intro", "Suits provided", 10),
    ("farm-tour", "Guided Farm Tour", "Two hours, all ages", 40),
    ("cheese-class", "Cheese Making Class", "Take home your own wheel", 8),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./farm_dev.db");
    let mut promote: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--promote" | "-p" => {
                if i + 1 < args.len() {
                    promote = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Farm Share Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: ./farm_dev.db)");
                println!("  -p, --promote <EMAIL>   Make an existing account an admin");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Farm Share Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if let Some(email) = promote {
        return promote_admin(&db, &email).await;
    }

    let catalog = db.catalog();

    let existing = catalog.list_products(false).await?.len() + catalog.list_activities(false).await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} catalog items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut seeded = 0;

    for (id, name, description, quantity) in PRODUCTS {
        let draft = ItemDraft::new(*name, *quantity)
            .with_id(*id)
            .with_description(*description)
            .with_image_url(format!("/images/products/{id}.jpg"));

        match catalog.create_product(&draft).await {
            Ok(_) => seeded += 1,
            Err(e) => eprintln!("Failed to insert product {}: {}", id, e),
        }
    }

    for (id, name, description, capacity) in ACTIVITIES {
        let draft = ItemDraft::new(*name, *capacity)
            .with_id(*id)
            .with_description(*description)
            .with_image_url(format!("/images/activities/{id}.jpg"));

        match catalog.create_activity(&draft).await {
            Ok(_) => seeded += 1,
            Err(e) => eprintln!("Failed to insert activity {}: {}", id, e),
        }
    }

    println!("✓ Seeded {} catalog items", seeded);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

async fn promote_admin(db: &Database, email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let customers = db.customers();
    let email = email.trim().to_lowercase();

    let Some(customer) = customers.get_by_email(&email).await? else {
        println!("✗ No account with email {}", email);
        println!("  Sign up through POST /signup first.");
        return Err(format!("account not found: {email}").into());
    };

    customers.update_role(&customer.id, Role::Admin).await?;
    println!("✓ {} is now an admin", email);

    Ok(())
}
