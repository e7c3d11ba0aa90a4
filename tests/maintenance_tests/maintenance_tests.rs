//! Tests for maintenance operations
//!
//! These tests verify:
//! - CSV export format (header, quoting, no escaping)
//! - Backup/restore round trips, including capacity changes
//! - Failure reporting: backup logs and returns false, restore surfaces
//!   unreadable or malformed backups and leaves the live store untouched
//! - clear resets to the configured initial capacity

use flatstore::maintenance::{copy_verified, file_crc32, render_csv, CSV_HEADER};
use flatstore::{Config, Record, Store, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(Config::in_dir(temp_dir.path())).unwrap();
    (temp_dir, store)
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_all_format() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();
    store.insert(2, "Pear", 2.0, 5).unwrap();

    assert_eq!(
        store.export_all().unwrap(),
        "id,title,price,quantity\n1,\"Apple\",1.5,10\n2,\"Pear\",2,5\n"
    );
}

#[test]
fn test_export_empty_store_is_header_only() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.export_all().unwrap(), format!("{}\n", CSV_HEADER));
}

#[test]
fn test_export_does_not_escape_title() {
    let records = vec![Record::new(3, "say \"hi\", ok", 1.0, 1)];

    assert_eq!(
        render_csv(&records),
        "id,title,price,quantity\n3,\"say \"hi\", ok\",1,1\n"
    );
}

#[test]
fn test_export_skips_deleted_records() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();
    store.insert(2, "Pear", 2.0, 5).unwrap();
    store.delete_by_id(1).unwrap();

    assert_eq!(
        store.export_all().unwrap(),
        "id,title,price,quantity\n2,\"Pear\",2,5\n"
    );
}

#[test]
fn test_export_csv_writes_file() {
    let (temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();

    assert_eq!(store.export_csv().unwrap(), 1);

    let written = std::fs::read_to_string(temp.path().join("data.csv")).unwrap();
    assert_eq!(written, store.export_all().unwrap());
}

// =============================================================================
// Backup / Restore Tests
// =============================================================================

#[test]
fn test_backup_copies_store_file() {
    let (temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();

    assert!(store.backup());

    let original = std::fs::read(temp.path().join("store.db")).unwrap();
    let backup = std::fs::read(temp.path().join("store_backup.db")).unwrap();
    assert_eq!(original, backup);
}

#[test]
fn test_restore_rolls_back_changes() {
    let (_temp, mut store) = setup_temp_store();
    for id in 1..=3 {
        store.insert(id, "item", 1.0, id).unwrap();
    }
    assert!(store.backup());

    store.insert(4, "later", 1.0, 4).unwrap();
    store.delete_by_id(1).unwrap();

    store.restore().unwrap();

    assert_eq!(store.count(), 3);
    assert!(store.find_by_id(1).unwrap().is_found());
    assert!(!store.find_by_id(4).unwrap().is_found());
}

#[test]
fn test_restore_adopts_backup_capacity() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "first", 1.0, 1).unwrap();
    assert!(store.backup());

    for id in 2..=80 {
        store.insert(id, "more", 1.0, 1).unwrap();
    }
    assert_eq!(store.capacity(), 200);

    store.restore().unwrap();

    assert_eq!(store.capacity(), 100);
    assert_eq!(store.count(), 1);
    assert!(store.find_by_id(1).unwrap().is_found());
}

#[test]
fn test_restore_without_backup_fails() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();

    let result = store.restore();

    assert!(matches!(result, Err(StoreError::MaintenanceFailure(_))));
    assert_eq!(store.count(), 1);
    assert!(store.find_by_id(1).unwrap().is_found());
}

#[test]
fn test_restore_rejects_corrupt_backup() {
    let (temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();
    let store_path = temp.path().join("store.db");
    let before = std::fs::read(&store_path).unwrap();

    std::fs::write(temp.path().join("store_backup.db"), b"junk").unwrap();
    let result = store.restore();

    assert!(matches!(result, Err(StoreError::MaintenanceFailure(_))));
    assert_eq!(std::fs::read(&store_path).unwrap(), before);
    assert_eq!(store.capacity(), 100);
    assert_eq!(store.count(), 1);
    assert!(store.find_by_id(1).unwrap().is_found());
}

#[test]
fn test_restore_rejects_truncated_backup() {
    let (temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();
    assert!(store.backup());

    let backup_path = temp.path().join("store_backup.db");
    let mut backup = std::fs::read(&backup_path).unwrap();
    backup.truncate(8 + 10 * 88);
    std::fs::write(&backup_path, backup).unwrap();

    store.insert(2, "Pear", 2.0, 5).unwrap();

    assert!(matches!(store.restore(), Err(StoreError::MaintenanceFailure(_))));
    assert_eq!(store.count(), 2);
    assert!(store.find_by_id(2).unwrap().is_found());
}

#[test]
fn test_restore_after_drop() {
    let (_temp, mut store) = setup_temp_store();
    store.insert(1, "Apple", 1.5, 10).unwrap();
    assert!(store.backup());

    store.drop_store().unwrap();
    store.restore().unwrap();

    assert!(store.is_initialized());
    assert_eq!(store.count(), 1);
}

#[test]
fn test_backup_failure_returns_false() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .backup_path(temp_dir.path().join("missing_dir").join("backup.db"))
        .build();
    let store = Store::open(config).unwrap();

    assert!(!store.backup());
}

#[test]
fn test_backup_of_dropped_store_returns_false() {
    let (temp, mut store) = setup_temp_store();
    store.drop_store().unwrap();

    assert!(!store.backup());
    assert!(!temp.path().join("store_backup.db").exists());
}

#[test]
fn test_copy_verified_checksum() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("a.bin");
    let dst = temp_dir.path().join("b.bin");
    std::fs::write(&src, b"flatstore backup").unwrap();
    std::fs::write(&dst, b"stale contents to overwrite").unwrap();

    let crc = copy_verified(&src, &dst).unwrap();

    assert_eq!(crc, file_crc32(&src).unwrap());
    assert_eq!(std::fs::read(&dst).unwrap(), b"flatstore backup");
}

// =============================================================================
// Clear Tests
// =============================================================================

#[test]
fn test_clear_resets_to_initial_capacity() {
    let (temp, mut store) = setup_temp_store();
    for id in 1..=80 {
        store.insert(id, "x", 1.0, 1).unwrap();
    }
    assert_eq!(store.capacity(), 200);

    store.clear().unwrap();

    assert_eq!(store.capacity(), 100);
    assert_eq!(store.count(), 0);
    assert!(store.get_all().unwrap().is_empty());
    assert_eq!(
        std::fs::metadata(temp.path().join("store.db")).unwrap().len(),
        8 + 100 * 88
    );
}

#[test]
fn test_clear_recreates_dropped_store() {
    let (_temp, mut store) = setup_temp_store();
    store.drop_store().unwrap();

    store.clear().unwrap();

    assert!(store.is_initialized());
    assert!(store.insert(1, "a", 1.0, 1).unwrap().is_inserted());
}
