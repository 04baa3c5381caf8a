//! CLI and product command tests

mod common;

use common::{create_test_product, json_output, minv, minv_in, setup_test_project};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    minv()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stock levels and expiration dates"));
}

#[test]
fn test_version_displays() {
    minv()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("minv"));
}

#[test]
fn test_unknown_command_fails() {
    minv()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_generate() {
    minv()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("minv"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    minv_in(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".minv/config.yaml").exists());
    for category in ["beef", "pork", "chicken", "fish", "other"] {
        assert!(tmp.path().join("products").join(category).is_dir());
    }
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = setup_test_project();

    minv_in(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_command_outside_project_fails() {
    let tmp = TempDir::new().unwrap();

    minv_in(tmp.path())
        .args(["product", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a minv project"));
}

// ============================================================================
// Product Command Tests
// ============================================================================

#[test]
fn test_product_new_writes_file_in_category_dir() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &["--category", "beef", "--stock", "12"]);

    assert!(id.starts_with("PROD-"));
    let path = tmp.path().join("products/beef").join(format!("{}.minv.yaml", id));
    let content = fs::read_to_string(path).unwrap();
    assert!(content.contains("Ribeye"));
    assert!(content.contains("current_stock: 12"));
}

#[test]
fn test_product_new_shows_short_id() {
    let tmp = setup_test_project();

    minv_in(tmp.path())
        .args(["product", "new", "--name", "Wings", "--sku", "CHK-001", "-c", "chicken"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created product PROD@1"));
}

#[test]
fn test_product_new_rejects_duplicate_sku() {
    let tmp = setup_test_project();
    create_test_product(&tmp, "Ribeye", "BEEF-001", &[]);

    minv_in(tmp.path())
        .args(["product", "new", "--name", "Other Ribeye", "--sku", "beef-001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already used"));
}

#[test]
fn test_product_new_rejects_negative_values() {
    let tmp = setup_test_project();

    minv_in(tmp.path())
        .args(["product", "new", "--name", "Bad", "--sku", "BAD-1", "--stock", "-3"])
        .assert()
        .failure();
    minv_in(tmp.path())
        .args(["product", "new", "--name", "Bad", "--sku", "BAD-2", "--price", "-1"])
        .assert()
        .failure();
    minv_in(tmp.path())
        .args(["product", "new", "--name", "Bad", "--sku", "BAD-3", "--expires", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid expiration date"));
}

#[test]
fn test_product_show_by_short_id() {
    let tmp = setup_test_project();
    let id = create_test_product(
        &tmp,
        "Pork Belly",
        "PORK-001",
        &["-c", "pork", "--stock", "3", "--min-stock", "10", "--expires", "2025-06-18"],
    );

    let value = json_output(minv_in(tmp.path()).args(["product", "show", "PROD@1", "-o", "json"]));
    assert_eq!(value["id"], id);
    assert_eq!(value["name"], "Pork Belly");
    assert_eq!(value["stock_status"], "low");
    assert_eq!(value["stock_severity"], "low");
    assert_eq!(value["expiration_status"], "expiring_soon");
    assert_eq!(value["days_until_expiration"], 3);
}

#[test]
fn test_product_show_pretty() {
    let tmp = setup_test_project();
    create_test_product(&tmp, "Brisket", "BEEF-002", &["-c", "beef", "--price", "1250.5"]);

    minv_in(tmp.path())
        .args(["product", "show", "PROD@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Brisket"))
        .stdout(predicate::str::contains("₱1,250.50"));
}

#[test]
fn test_product_show_unknown_fails() {
    let tmp = setup_test_project();

    minv_in(tmp.path())
        .args(["product", "show", "PROD-NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No product found"));
}

#[test]
fn test_product_list_filters() {
    let tmp = setup_test_project();
    create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef", "--stock", "2", "--min-stock", "10"]);
    create_test_product(&tmp, "Sirloin", "BEEF-002", &["-c", "beef", "--stock", "50", "--min-stock", "10"]);
    create_test_product(
        &tmp,
        "Salmon",
        "FISH-001",
        &["-c", "fish", "--stock", "8", "--min-stock", "10", "--expires", "2025-06-10"],
    );

    let count = |args: &[&str]| {
        let output = minv_in(tmp.path())
            .args(["product", "list", "--count"])
            .args(args)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    };

    assert_eq!(count(&[]), "3");
    assert_eq!(count(&["--category", "beef"]), "2");
    assert_eq!(count(&["--search", "sal"]), "1");
    assert_eq!(count(&["--search", "beef-00"]), "2");
    assert_eq!(count(&["--stock", "low"]), "2");
    assert_eq!(count(&["--stock", "critical"]), "1");
    assert_eq!(count(&["--stock", "ok"]), "1");
    assert_eq!(count(&["--expiration", "expired"]), "1");
    assert_eq!(count(&["--expiration", "none"]), "2");
}

#[test]
fn test_product_list_table_shows_badges() {
    let tmp = setup_test_project();
    create_test_product(
        &tmp,
        "Salmon",
        "FISH-001",
        &["-c", "fish", "--stock", "1", "--min-stock", "10", "--expires", "2025-06-10"],
    );

    minv_in(tmp.path())
        .args(["product", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salmon"))
        .stdout(predicate::str::contains("LOW STOCK"))
        .stdout(predicate::str::contains("EXPIRED"));
}

#[test]
fn test_product_list_pagination() {
    let tmp = setup_test_project();
    for i in 0..5 {
        create_test_product(&tmp, &format!("Cut {}", i), &format!("CUT-{}", i), &[]);
    }

    let page = json_output(
        minv_in(tmp.path()).args(["product", "list", "--per-page", "2", "--page", "3", "-o", "json"]),
    );
    assert_eq!(page.as_array().unwrap().len(), 1);

    // Pages past the end clamp to the last page
    let page = json_output(
        minv_in(tmp.path()).args(["product", "list", "--per-page", "2", "--page", "9", "-o", "json"]),
    );
    assert_eq!(page.as_array().unwrap().len(), 1);

    minv_in(tmp.path())
        .args(["product", "list", "--per-page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1 of 3"))
        .stdout(predicate::str::contains("Next page: --page 2"))
        .stdout(predicate::str::contains("Previous page").not());

    minv_in(tmp.path())
        .args(["product", "list", "--per-page", "2", "--page", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Previous page: --page 2"))
        .stdout(predicate::str::contains("Next page").not());
}

#[test]
fn test_product_list_id_format() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &[]);

    minv_in(tmp.path())
        .args(["product", "list", "-o", "id"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", id)));
}

#[test]
fn test_product_edit_applies_valid_changes() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef"]);

    minv_in(tmp.path())
        .args(["product", "edit", &id])
        .env("VISUAL", "sed -i s/\"Ribeye\"/\"Dry-Aged-Ribeye\"/")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));

    let value = json_output(minv_in(tmp.path()).args(["product", "show", &id, "-o", "json"]));
    assert_eq!(value["name"], "Dry-Aged-Ribeye");
    assert_eq!(value["entity_revision"], 2);
}

#[test]
fn test_product_edit_rejected_restores_file() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef"]);
    let path = tmp.path().join("products/beef").join(format!("{}.minv.yaml", id));
    let before = fs::read_to_string(&path).unwrap();

    minv_in(tmp.path())
        .args(["product", "edit", &id])
        .env("VISUAL", "sed -i s/\"Ribeye\"/\"\"/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Edit rejected"));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    minv_in(tmp.path())
        .args(["product", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ribeye"));
}

#[test]
fn test_product_set_updates_fields() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "other"]);

    minv_in(tmp.path())
        .args(["product", "set", &id, "--price", "399.99", "--category", "beef", "--location", "Freezer A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));

    // Category change moves the file
    assert!(!tmp.path().join("products/other").join(format!("{}.minv.yaml", id)).exists());
    assert!(tmp.path().join("products/beef").join(format!("{}.minv.yaml", id)).exists());

    let value = json_output(minv_in(tmp.path()).args(["product", "show", &id, "-o", "json"]));
    assert_eq!(value["unit_price"], 399.99);
    assert_eq!(value["category"], "beef");
    assert_eq!(value["storage_location"], "Freezer A");
    assert_eq!(value["entity_revision"], 2);
}

#[test]
fn test_product_set_clears_expiration() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &["--expires", "2025-06-20"]);

    minv_in(tmp.path())
        .args(["product", "set", &id, "--expires", "none"])
        .assert()
        .success();

    let value = json_output(minv_in(tmp.path()).args(["product", "show", &id, "-o", "json"]));
    assert!(value.get("expiration_date").is_none());
    assert_eq!(value["expiration_status"], "none");
}

#[test]
fn test_product_set_without_fields_fails() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &[]);

    minv_in(tmp.path())
        .args(["product", "set", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to update"));
}

#[test]
fn test_product_delete_requires_admin() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &[]);

    minv_in(tmp.path())
        .env("MINV_ROLE", "staff")
        .args(["product", "delete", &id, "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"));

    // Staff may still create and update
    minv_in(tmp.path())
        .env("MINV_ROLE", "staff")
        .args(["product", "set", &id, "--price", "10"])
        .assert()
        .success();
}

#[test]
fn test_product_delete_removes_file() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &[]);

    minv_in(tmp.path())
        .args(["product", "delete", &id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted product"));

    minv_in(tmp.path())
        .args(["product", "list", "--count"])
        .assert()
        .success()
        .stdout("0\n");
}

// ============================================================================
// Category Command Tests
// ============================================================================

#[test]
fn test_category_list_totals() {
    let tmp = setup_test_project();
    create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef", "--stock", "4", "--price", "100"]);
    create_test_product(&tmp, "Sirloin", "BEEF-002", &["-c", "beef", "--stock", "6", "--price", "50"]);

    let overview = json_output(minv_in(tmp.path()).args(["category", "list", "-o", "json"]));
    let categories = overview.as_array().unwrap();
    assert_eq!(categories.len(), 5);
    let beef = categories.iter().find(|c| c["category"] == "beef").unwrap();
    assert_eq!(beef["product_count"], 2);
    assert_eq!(beef["total_stock"], 10);
    assert_eq!(beef["value"], 700.0);
}

#[test]
fn test_category_show_lists_only_that_category() {
    let tmp = setup_test_project();
    create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef", "--expires", "2025-06-16"]);
    create_test_product(&tmp, "Pork Chop", "PORK-001", &["-c", "pork"]);

    minv_in(tmp.path())
        .args(["category", "show", "beef"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ribeye"))
        .stdout(predicate::str::contains("Expiring Soon"))
        .stdout(predicate::str::contains("Pork Chop").not());
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_passes_on_clean_project() {
    let tmp = setup_test_project();
    create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef", "--expires", "2025-07-01"]);

    minv_in(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All files passed validation"));
}

#[test]
fn test_validate_reports_schema_violations() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef"]);
    let path = tmp.path().join("products/beef").join(format!("{}.minv.yaml", id));
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("current_stock: 0", "current_stock: -4")).unwrap();

    minv_in(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_validate_rejects_unknown_fields() {
    let tmp = setup_test_project();
    let id = create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef"]);
    let path = tmp.path().join("products/beef").join(format!("{}.minv.yaml", id));
    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str("tags: [grass-fed]\n");
    fs::write(&path, content).unwrap();

    minv_in(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));

    let shown = json_output(minv_in(tmp.path()).args(["product", "show", &id, "-o", "json"]));
    assert!(shown.get("tags").is_none());
}

#[test]
fn test_validate_detects_duplicate_sku_written_by_hand() {
    let tmp = setup_test_project();
    let first = create_test_product(&tmp, "Ribeye", "BEEF-001", &["-c", "beef"]);
    let second = create_test_product(&tmp, "Sirloin", "BEEF-002", &["-c", "beef"]);
    let path = tmp.path().join("products/beef").join(format!("{}.minv.yaml", second));
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("BEEF-002", "BEEF-001")).unwrap();

    minv_in(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("already used"));
    assert!(!first.is_empty());
}
