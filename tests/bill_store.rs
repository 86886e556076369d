//! Journey tests for the saved-bill file.
//!
//! These tests verify HOW bills survive being saved, reopened and
//! replaced, using real files on disk.

use billx_core::{BillDefinition, BillStore, BpayDetails, EftDetails};

fn water_bill() -> BillDefinition {
    BillDefinition::bpay(
        "water",
        BpayDetails {
            code: 93880,
            reference: "5461497013987".to_owned(),
        },
    )
    .expect("valid bill")
}

fn strata_bill() -> BillDefinition {
    BillDefinition::eft(
        "strata",
        EftDetails {
            bsb: "062-692".to_owned(),
            account_number: "12345678".to_owned(),
            account_name: "Strata Plan 1234".to_owned(),
            remitter: Some("Unit 7".to_owned()),
        },
    )
    .expect("valid bill")
}

#[test]
fn saved_bills_survive_reopening_the_store() {
    // Given: a store with two bills saved
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bills.json");
    let store = BillStore::open(&path);
    store.add(water_bill()).expect("add water");
    store.add(strata_bill()).expect("add strata");

    // When: the same file is opened fresh
    let reopened = BillStore::open(&path);
    let bills = reopened.load().expect("load should succeed");

    // Then: both bills come back exactly as saved
    assert_eq!(bills.len(), 2);
    assert_eq!(bills.get("water"), Some(&water_bill()));
    assert_eq!(bills.get("strata"), Some(&strata_bill()));
}

#[test]
fn adding_under_an_existing_name_replaces_the_bill() {
    // Given: a saved BPAY bill named "water"
    let dir = tempfile::tempdir().expect("temp dir");
    let store = BillStore::open(dir.path().join("bills.json"));
    store.add(water_bill()).expect("add");

    // When: a different bill is saved under the same name
    let replacement = BillDefinition::bpay(
        "water",
        BpayDetails {
            code: 857,
            reference: "99".to_owned(),
        },
    )
    .expect("valid bill");
    store.add(replacement.clone()).expect("replace");

    // Then: only the replacement remains
    let bills = store.load().expect("load");
    assert_eq!(bills.len(), 1);
    assert_eq!(bills.get("water"), Some(&replacement));
}

#[test]
fn bills_list_in_name_order_regardless_of_insertion_order() {
    // Given: bills saved out of order
    let dir = tempfile::tempdir().expect("temp dir");
    let store = BillStore::open(dir.path().join("bills.json"));
    store.add(water_bill()).expect("add water");
    store.add(strata_bill()).expect("add strata");

    // When: the file is listed
    let bills = store.load().expect("load");

    // Then: names come back sorted
    let names: Vec<&str> = bills.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["strata", "water"]);
}

#[test]
fn looking_a_bill_up_does_not_change_the_file() {
    // Given: a store with one bill
    let dir = tempfile::tempdir().expect("temp dir");
    let store = BillStore::open(dir.path().join("bills.json"));
    store.add(water_bill()).expect("add");

    // When: the bill is fetched twice
    let first = store.get("water").expect("first lookup");
    let second = store.get("water").expect("second lookup");

    // Then: lookups are repeatable and equal
    assert_eq!(first, second);
    assert_eq!(first, water_bill());
}

#[test]
fn saving_leaves_no_staging_file_behind() {
    // Given: a store that has written at least once
    let dir = tempfile::tempdir().expect("temp dir");
    let store = BillStore::open(dir.path().join("bills.json"));
    store.add(water_bill()).expect("add");

    // Then: only the real file exists, the temp was renamed over it
    assert!(store.path().exists());
    assert!(!dir.path().join("bills.tmp").exists());
}

#[test]
fn the_file_on_disk_is_readable_json_without_empty_sections() {
    // Given: one EFT bill with no remitter
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bills.json");
    let store = BillStore::open(&path);
    let bill = BillDefinition::eft(
        "rent",
        EftDetails {
            bsb: "062-692".to_owned(),
            account_number: "12345678".to_owned(),
            account_name: "Landlord".to_owned(),
            remitter: None,
        },
    )
    .expect("valid bill");
    store.add(bill).expect("add");

    // When: the raw file is inspected
    let raw = std::fs::read_to_string(&path).expect("read");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

    // Then: absent payment methods and options are omitted entirely
    assert!(raw.contains('\n'), "file should be pretty-printed");
    assert!(parsed["rent"].get("bpay").is_none());
    assert!(parsed["rent"]["eft"].get("remitter").is_none());
    assert_eq!(parsed["rent"]["eft"]["bsb"], "062-692");
}
