//! Tests for field scans
//!
//! These tests verify:
//! - find/delete by title, price and quantity
//! - The 1e-9 price tolerance
//! - Tombstoned and never-used slots are skipped
//! - Results come back in slot order
//! - delete-by-field keeps the persisted count in step

use flatstore::scan::PRICE_EPSILON;
use flatstore::{Config, FieldQuery, Record, Store, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(Config::in_dir(temp_dir.path())).unwrap();
    (temp_dir, store)
}

fn ids(records: &[Record]) -> Vec<i32> {
    records.iter().map(|record| record.id).collect()
}

// =============================================================================
// FieldQuery Tests
// =============================================================================

#[test]
fn test_query_matches_each_field() {
    let record = Record::new(1, "Apple", 1.5, 10);

    assert!(FieldQuery::Title("Apple".into()).matches(&record));
    assert!(!FieldQuery::Title("apple".into()).matches(&record));
    assert!(!FieldQuery::Title("Apple ".into()).matches(&record));

    assert!(FieldQuery::Price(1.5).matches(&record));
    assert!(!FieldQuery::Price(1.6).matches(&record));

    assert!(FieldQuery::Quantity(10).matches(&record));
    assert!(!FieldQuery::Quantity(11).matches(&record));
}

#[test]
fn test_price_tolerance_boundary() {
    let record = Record::new(1, "Apple", 1.5, 10);

    assert_eq!(PRICE_EPSILON, 1e-9);
    assert!(FieldQuery::Price(1.5 + 5e-10).matches(&record));
    assert!(FieldQuery::Price(1.5 - 5e-10).matches(&record));
    assert!(!FieldQuery::Price(1.5 + 2e-9).matches(&record));
    assert!(!FieldQuery::Price(1.5 - 2e-9).matches(&record));
}

// =============================================================================
// Find Tests
// =============================================================================

#[test]
fn test_find_by_price_uses_tolerance() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();
    store.insert(2, "Pear", 2.0, 5).unwrap();

    assert_eq!(ids(&store.find_by_price(1.5 + 5e-10).unwrap()), vec![1]);
    assert!(store.find_by_price(1.5 + 2e-9).unwrap().is_empty());
}

#[test]
fn test_find_by_title_exact_bytes() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();
    store.insert(2, "apple", 1.5, 10).unwrap();
    store.insert(3, "Apple", 3.0, 1).unwrap();

    assert_eq!(ids(&store.find_by_title("Apple").unwrap()), vec![1, 3]);
    assert_eq!(ids(&store.find_by_title("apple").unwrap()), vec![2]);
    assert!(store.find_by_title("Appl").unwrap().is_empty());
}

#[test]
fn test_find_by_title_against_truncated_value() {
    let (_temp, mut store) = setup_temp_store();
    let long = "x".repeat(100);
    store.insert(1, &long, 1.0, 1).unwrap();

    assert_eq!(ids(&store.find_by_title(&"x".repeat(63)).unwrap()), vec![1]);
    assert!(store.find_by_title(&long).unwrap().is_empty());
}

#[test]
fn test_find_by_quantity_skips_tombstones() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "a", 1.0, 10).unwrap();
    store.insert(2, "b", 1.0, 10).unwrap();
    store.delete_by_id(1).unwrap();

    assert_eq!(ids(&store.find_by_quantity(10).unwrap()), vec![2]);
}

#[test]
fn test_get_all_returns_slot_order() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(50, "fifty", 1.0, 1).unwrap();
    store.insert(3, "three", 1.0, 1).unwrap();
    store.insert(120, "one-twenty", 1.0, 1).unwrap(); // slot 20

    assert_eq!(ids(&store.get_all().unwrap()), vec![3, 120, 50]);
}

#[test]
fn test_scans_on_dropped_store_fail() {
    let (_temp, mut store) = setup_temp_store();
    store.drop_store().unwrap();

    assert!(matches!(store.find_by_title("x"), Err(StoreError::NotInitialized)));
    assert!(matches!(store.delete_by_quantity(1), Err(StoreError::NotInitialized)));
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_by_quantity_scenario() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "a", 1.0, 10).unwrap();
    store.insert(2, "b", 2.0, 10).unwrap();
    store.insert(3, "c", 3.0, 7).unwrap();
    store.insert(4, "d", 4.0, 10).unwrap();
    store.insert(5, "e", 5.0, 3).unwrap();

    assert_eq!(store.delete_by_quantity(10).unwrap(), 3);
    assert!(store.find_by_quantity(10).unwrap().is_empty());
    assert_eq!(store.count(), 2);
    assert_eq!(ids(&store.get_all().unwrap()), vec![3, 5]);
}

#[test]
fn test_delete_by_title_and_price() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();
    store.insert(2, "Apple", 2.5, 10).unwrap();
    store.insert(3, "Pear", 2.5, 10).unwrap();

    assert_eq!(store.delete_by_title("Apple").unwrap(), 2);
    assert_eq!(store.delete_by_price(2.5).unwrap(), 1);
    assert_eq!(store.count(), 0);
}

#[test]
fn test_delete_by_field_without_matches() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();

    assert_eq!(store.delete_by(&FieldQuery::Quantity(99)).unwrap(), 0);
    assert_eq!(store.count(), 1);
}

#[test]
fn test_deleted_ids_stay_probeable() {
    let (_temp, mut store) = setup_temp_store();
    // Same home slot 5; the first two become tombstones
    store.insert(5, "gone", 1.0, 1).unwrap();
    store.insert(105, "gone", 1.0, 1).unwrap();
    store.insert(205, "kept", 1.0, 1).unwrap();

    assert_eq!(store.delete_by_title("gone").unwrap(), 2);

    let lookup = store.find_by_id(205).unwrap();
    assert!(lookup.is_found());
    assert_eq!(lookup.probes, 3);
}

#[test]
fn test_delete_by_field_persists_count() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut store = Store::open(Config::in_dir(temp_dir.path())).unwrap();
        store.insert(1, "a", 1.0, 10).unwrap();
        store.insert(2, "b", 1.0, 10).unwrap();
        store.insert(3, "c", 1.0, 4).unwrap();
        assert_eq!(store.delete_by_quantity(10).unwrap(), 2);
    }

    let store = Store::open(Config::in_dir(temp_dir.path())).unwrap();
    assert_eq!(store.count(), 1);
    assert_eq!(ids(&store.get_all().unwrap()), vec![3]);
}
