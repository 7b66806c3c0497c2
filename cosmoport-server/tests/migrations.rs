//! Verifies the embedded migrations define the ship table the server maps.

use std::fs;
use std::path::PathBuf;

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn read_migration(file: &str) -> String {
    let mut contents = Vec::new();
    for entry in fs::read_dir(migrations_dir()).expect("read migrations dir") {
        let path = entry.expect("migration entry").path().join(file);
        if path.exists() {
            contents.push(fs::read_to_string(&path).expect("read migration"));
        }
    }
    contents.join("\n")
}

#[test]
fn up_migration_creates_ship_columns() {
    let up = read_migration("up.sql");
    assert!(up.contains("CREATE TABLE ships"));
    let columns = [
        "id BIGSERIAL",
        "name VARCHAR(50)",
        "planet VARCHAR(50)",
        "ship_type",
        "prod_date TIMESTAMP",
        "is_used BOOLEAN",
        "speed DOUBLE PRECISION",
        "crew_size INTEGER",
        "rating DOUBLE PRECISION",
    ];
    for column in columns {
        assert!(up.contains(column), "up.sql missing column: {column}");
    }
}

#[test]
fn up_migration_restricts_ship_types() {
    let up = read_migration("up.sql");
    for ship_type in ["TRANSPORT", "MILITARY", "MERCHANT"] {
        assert!(up.contains(ship_type), "up.sql missing ship type: {ship_type}");
    }
}

#[test]
fn down_migration_drops_ship_table() {
    let down = read_migration("down.sql");
    assert!(down.contains("DROP TABLE ships"));
}
