#![forbid(unsafe_code)]

use rusqlite::Connection;
use sr_core::model::{CustodyState, TransferOutcome};
use sr_storage::{
    AddPersonRequest, AssignRequest, MAX_MINT_BATCH, MintStickersRequest,
    RegisterMaterialRequest, SqliteStore, StoreError, TransferRequest, UpdateMaterialRequest,
};
use std::path::PathBuf;

const T0: i64 = 1_750_000_000_000;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("sr_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn setup(test_name: &str, people: &[&str]) -> SqliteStore {
    let mut store = SqliteStore::open(temp_dir(test_name)).expect("open store");
    store
        .register_material(RegisterMaterialRequest {
            code: "IT0001".to_string(),
            name: "Laptop".to_string(),
            category: Some("Bilgisayar".to_string()),
            photo: None,
            created_at_ms: T0,
        })
        .expect("register material");
    for name in people {
        store
            .add_person(AddPersonRequest {
                name: name.to_string(),
                floor: None,
                branch: None,
                created_at_ms: T0,
            })
            .expect("add person");
    }
    store
}

fn mint(store: &mut SqliteStore, count: usize) -> Vec<String> {
    store
        .mint_stickers(MintStickersRequest {
            code: "IT0001".to_string(),
            count,
            created_at_ms: T0,
        })
        .expect("mint")
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

fn transfer(store: &mut SqliteStore, sticker: &str, to: &str) -> TransferOutcome {
    store
        .transfer(TransferRequest {
            sticker_code: sticker.to_string(),
            new_owner: to.to_string(),
            created_at_ms: T0,
        })
        .expect("transfer")
}

fn owner_of(store: &SqliteStore, sticker: &str) -> Option<String> {
    store
        .find_owner(sticker)
        .expect("find owner")
        .map(|person| person.name)
}

#[test]
fn mint_numbers_contiguously_from_current_max() {
    let mut store = setup("mint_numbers_contiguously_from_current_max", &[]);

    let first = mint(&mut store, 3);
    assert_eq!(
        first,
        vec![
            "2025_IT0001_000001",
            "2025_IT0001_000002",
            "2025_IT0001_000003"
        ]
    );
    let second = mint(&mut store, 2);
    assert_eq!(second, vec!["2025_IT0001_000004", "2025_IT0001_000005"]);

    let units = store.list_stickers("IT0001").expect("list");
    assert_eq!(units[0].seq_no, 5);
    assert!(units.iter().all(|u| u.name == "Laptop"));
    assert!(mint(&mut store, 0).is_empty());
}

#[test]
fn mint_uses_year_of_request_time() {
    let mut store = setup("mint_uses_year_of_request_time", &[]);
    let minted = store
        .mint_stickers(MintStickersRequest {
            code: "IT0001".to_string(),
            count: 1,
            created_at_ms: 1_735_689_599_999, // last millisecond of 2024
        })
        .expect("mint");
    assert_eq!(minted[0].year(), 2024);
    assert_eq!(minted[0].seq_no(), 1);

    let next = mint(&mut store, 1);
    assert_eq!(next, vec!["2025_IT0001_000002"]);
}

#[test]
fn mint_rejects_unknown_type() {
    let mut store = setup("mint_rejects_unknown_type", &[]);
    let err = store
        .mint_stickers(MintStickersRequest {
            code: "IT9999".to_string(),
            count: 2,
            created_at_ms: T0,
        })
        .expect_err("unknown type");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn deleted_tail_number_is_reissued() {
    let mut store = setup("deleted_tail_number_is_reissued", &[]);
    mint(&mut store, 3);

    let removed = store.delete_last_sticker("IT0001").expect("delete last");
    assert_eq!(removed.to_string(), "2025_IT0001_000003");

    let again = mint(&mut store, 1);
    assert_eq!(again, vec!["2025_IT0001_000003"]);
}

#[test]
fn delete_last_sticker_on_empty_sequence() {
    let mut store = setup("delete_last_sticker_on_empty_sequence", &[]);
    let err = store
        .delete_last_sticker("IT0001")
        .expect_err("empty sequence");
    assert!(matches!(err, StoreError::Empty { .. }));
    assert_eq!(err.code(), "EMPTY");

    let err = store
        .delete_last_sticker("IT0404")
        .expect_err("unknown type");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn mint_collision_after_rename_writes_nothing() {
    let mut store = setup("mint_collision_after_rename_writes_nothing", &[]);
    mint(&mut store, 2);
    store
        .update_material(UpdateMaterialRequest {
            code: "IT0001".to_string(),
            new_code: Some("IT0002".to_string()),
            updated_at_ms: T0,
            ..Default::default()
        })
        .expect("rename");
    store
        .register_material(RegisterMaterialRequest {
            code: "IT0001".to_string(),
            name: "Laptop v2".to_string(),
            category: None,
            photo: None,
            created_at_ms: T0,
        })
        .expect("re-register old code");

    let err = store
        .mint_stickers(MintStickersRequest {
            code: "IT0001".to_string(),
            count: 3,
            created_at_ms: T0,
        })
        .expect_err("sticker code collision");
    assert!(matches!(err, StoreError::AlreadyExists { .. }));
    assert!(store.list_stickers("IT0001").expect("list").is_empty());
}

#[test]
fn mint_rolls_back_when_a_later_insert_collides() {
    let mut store = setup("mint_rolls_back_when_a_later_insert_collides", &[]);
    store
        .mint_stickers(MintStickersRequest {
            code: "IT0001".to_string(),
            count: 1,
            created_at_ms: 1_702_700_000_000, // 2023-12-16
        })
        .expect("mint in an earlier year");
    let current = mint(&mut store, 1);
    assert_eq!(current, vec!["2025_IT0001_000002"]);

    store
        .update_material(UpdateMaterialRequest {
            code: "IT0001".to_string(),
            new_code: Some("IT0009".to_string()),
            updated_at_ms: T0,
            ..Default::default()
        })
        .expect("rename");
    store
        .register_material(RegisterMaterialRequest {
            code: "IT0001".to_string(),
            name: "Laptop v2".to_string(),
            category: None,
            photo: None,
            created_at_ms: T0,
        })
        .expect("re-register old code");

    // 2025_IT0001_000001 is free, 2025_IT0001_000002 is still taken
    let err = store
        .mint_stickers(MintStickersRequest {
            code: "IT0001".to_string(),
            count: 2,
            created_at_ms: T0,
        })
        .expect_err("second insert collides");
    match &err {
        StoreError::AlreadyExists { key, .. } => assert_eq!(key, "2025_IT0001_000002"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.list_stickers("IT0001").expect("list").is_empty());
    assert_eq!(store.list_stickers("IT0009").expect("list").len(), 2);
}

#[test]
fn mint_rejects_oversized_batches_without_writing() {
    let mut store = setup("mint_rejects_oversized_batches_without_writing", &[]);
    for count in [i64::MAX as usize, usize::MAX, MAX_MINT_BATCH + 1] {
        let err = store
            .mint_stickers(MintStickersRequest {
                code: "IT0001".to_string(),
                count,
                created_at_ms: T0,
            })
            .expect_err("oversized batch");
        assert!(matches!(err, StoreError::InvalidInput(_)), "{count}: {err}");
    }
    assert!(store.list_stickers("IT0001").expect("list").is_empty());
}

#[test]
fn mint_rejects_timestamps_before_year_zero() {
    let mut store = setup("mint_rejects_timestamps_before_year_zero", &[]);
    let err = store
        .mint_stickers(MintStickersRequest {
            code: "IT0001".to_string(),
            count: 1,
            created_at_ms: -62_300_000_000_000, // before year 0
        })
        .expect_err("negative year");
    assert!(matches!(err, StoreError::InvalidInput("created_at_ms is out of range")));
    assert!(store.list_stickers("IT0001").expect("list").is_empty());

    let err = store
        .delete_last_sticker("IT0001")
        .expect_err("nothing was written");
    assert!(matches!(err, StoreError::Empty { .. }));
}

#[test]
fn sticker_has_at_most_one_owner() {
    let mut store = setup("sticker_has_at_most_one_owner", &["Ayşe", "Mehmet"]);
    let stickers = mint(&mut store, 1);
    let sticker = &stickers[0];

    let record = store
        .assign(AssignRequest {
            person_name: "Ayşe".to_string(),
            sticker_code: sticker.clone(),
            name: None,
            created_at_ms: T0,
        })
        .expect("assign");
    assert_eq!(record.name, "Laptop");

    let err = store
        .assign(AssignRequest {
            person_name: "Mehmet".to_string(),
            sticker_code: sticker.clone(),
            name: None,
            created_at_ms: T0,
        })
        .expect_err("second owner must be rejected");
    match &err {
        StoreError::DuplicateOwnerViolation { owner, .. } => assert_eq!(owner, "Ayşe"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.code(), "DUPLICATE_OWNER");
    assert_eq!(owner_of(&store, sticker).as_deref(), Some("Ayşe"));
    assert!(store.owned_items("Mehmet").expect("owned").is_empty());
}

#[test]
fn assign_validates_person_and_sticker() {
    let mut store = setup("assign_validates_person_and_sticker", &["Ayşe"]);
    let stickers = mint(&mut store, 1);

    let err = store
        .assign(AssignRequest {
            person_name: "Nobody".to_string(),
            sticker_code: stickers[0].clone(),
            name: None,
            created_at_ms: T0,
        })
        .expect_err("unknown person");
    assert!(matches!(err, StoreError::NotFound { .. }));

    let err = store
        .assign(AssignRequest {
            person_name: "Ayşe".to_string(),
            sticker_code: "2025_IT0001_000009".to_string(),
            name: None,
            created_at_ms: T0,
        })
        .expect_err("no unit to take the name from");
    assert!(matches!(err, StoreError::NotFound { .. }));

    let err = store
        .assign(AssignRequest {
            person_name: "Ayşe".to_string(),
            sticker_code: "not-a-code".to_string(),
            name: None,
            created_at_ms: T0,
        })
        .expect_err("malformed code");
    assert!(matches!(err, StoreError::InvalidInput(_)));

    // an explicit name skips the unit lookup
    let record = store
        .assign(AssignRequest {
            person_name: "Ayşe".to_string(),
            sticker_code: "2025_IT0001_000009".to_string(),
            name: Some("Hand label".to_string()),
            created_at_ms: T0,
        })
        .expect("assign with explicit name");
    assert_eq!(record.name, "Hand label");
}

#[test]
fn transfer_a_to_b_to_a() {
    let mut store = setup("transfer_a_to_b_to_a", &["Ayşe", "Mehmet"]);
    let stickers = mint(&mut store, 1);
    let sticker = &stickers[0];

    assert_eq!(transfer(&mut store, sticker, "Ayşe"), TransferOutcome::Assigned);
    assert_eq!(
        transfer(&mut store, sticker, "Mehmet"),
        TransferOutcome::ReassignedFrom {
            previous_owner: "Ayşe".to_string()
        }
    );
    assert_eq!(owner_of(&store, sticker).as_deref(), Some("Mehmet"));
    assert_eq!(
        transfer(&mut store, sticker, "Ayşe"),
        TransferOutcome::ReassignedFrom {
            previous_owner: "Mehmet".to_string()
        }
    );

    assert_eq!(store.owned_items("Ayşe").expect("owned").len(), 1);
    assert!(store.owned_items("Mehmet").expect("owned").is_empty());
    assert_eq!(
        store.custody_state(sticker).expect("state"),
        CustodyState::Assigned {
            owner: "Ayşe".to_string()
        }
    );
}

#[test]
fn transfer_onto_current_owner_makes_it_most_recent() {
    let mut store = setup("transfer_onto_current_owner_makes_it_most_recent", &["Ayşe"]);
    let stickers = mint(&mut store, 2);
    transfer(&mut store, &stickers[0], "Ayşe");
    transfer(&mut store, &stickers[1], "Ayşe");

    let outcome = transfer(&mut store, &stickers[0], "Ayşe");
    assert_eq!(outcome.previous_owner(), Some("Ayşe"));

    let items = store.owned_items("Ayşe").expect("owned");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].sticker_code, stickers[0]);
}

#[test]
fn transfer_rejects_unknown_owner_and_sticker() {
    let mut store = setup("transfer_rejects_unknown_owner_and_sticker", &["Ayşe"]);
    let stickers = mint(&mut store, 1);

    let err = store
        .transfer(TransferRequest {
            sticker_code: stickers[0].clone(),
            new_owner: "Nobody".to_string(),
            created_at_ms: T0,
        })
        .expect_err("unknown owner");
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(
        store.custody_state(&stickers[0]).expect("state"),
        CustodyState::Unassigned
    );

    let err = store
        .transfer(TransferRequest {
            sticker_code: "2025_IT0001_000777".to_string(),
            new_owner: "Ayşe".to_string(),
            created_at_ms: T0,
        })
        .expect_err("no unit and no record");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn delete_last_owned_item_undoes_latest_assignment() {
    let mut store = setup("delete_last_owned_item_undoes_latest_assignment", &["Ayşe"]);
    let stickers = mint(&mut store, 2);
    transfer(&mut store, &stickers[0], "Ayşe");
    transfer(&mut store, &stickers[1], "Ayşe");

    let released = store
        .delete_last_owned_item("Ayşe")
        .expect("delete last owned");
    assert_eq!(released.to_string(), stickers[1]);
    assert_eq!(
        store.custody_state(&stickers[1]).expect("state"),
        CustodyState::Unassigned
    );
    assert_eq!(owner_of(&store, &stickers[0]).as_deref(), Some("Ayşe"));
    assert_eq!(store.list_stickers("IT0001").expect("units").len(), 2);

    store.delete_last_owned_item("Ayşe").expect("second release");
    let err = store
        .delete_last_owned_item("Ayşe")
        .expect_err("nothing left");
    assert!(matches!(err, StoreError::Empty { .. }));

    let err = store
        .delete_last_owned_item("Nobody")
        .expect_err("unknown person");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn deleting_an_assigned_last_sticker_leaves_a_dangling_record() {
    let mut store = setup(
        "deleting_an_assigned_last_sticker_leaves_a_dangling_record",
        &["Ayşe"],
    );
    let stickers = mint(&mut store, 2);
    transfer(&mut store, &stickers[1], "Ayşe");

    let removed = store.delete_last_sticker("IT0001").expect("delete last");
    assert_eq!(removed.to_string(), stickers[1]);

    let dangling = store.dangling_assignments().expect("dangling");
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].owner, "Ayşe");
    assert_eq!(dangling[0].sticker_code, stickers[1]);
    assert_eq!(dangling[0].name, "Laptop");
    assert_eq!(
        store.custody_state(&stickers[1]).expect("state"),
        CustodyState::Assigned {
            owner: "Ayşe".to_string()
        }
    );

    // the reissued unit inherits the stale record's custody
    let again = mint(&mut store, 1);
    assert_eq!(again[0], stickers[1]);
    assert!(store.dangling_assignments().expect("dangling").is_empty());
    assert_eq!(owner_of(&store, &stickers[1]).as_deref(), Some("Ayşe"));
}

#[test]
fn dangling_record_still_transfers_after_type_deletion() {
    let mut store = setup(
        "dangling_record_still_transfers_after_type_deletion",
        &["Ayşe", "Mehmet"],
    );
    let stickers = mint(&mut store, 1);
    transfer(&mut store, &stickers[0], "Ayşe");

    store.delete_material("IT0001").expect("delete material");
    assert_eq!(store.dangling_assignments().expect("dangling").len(), 1);

    let outcome = transfer(&mut store, &stickers[0], "Mehmet");
    assert_eq!(outcome.previous_owner(), Some("Ayşe"));

    let items = store.owned_items("Mehmet").expect("owned");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Laptop");
    assert!(store.owned_items("Ayşe").expect("owned").is_empty());

    let dangling = store.dangling_assignments().expect("dangling");
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].owner, "Mehmet");
}

#[test]
fn custody_state_of_unknown_code() {
    let store = setup("custody_state_of_unknown_code", &[]);
    let err = store
        .custody_state("2025_IT0001_000001")
        .expect_err("never minted");
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(store.find_owner("2025_IT0001_000001").expect("find").is_none());
}

#[test]
fn failed_transfer_leaves_no_partial_state() {
    let mut store = setup("failed_transfer_leaves_no_partial_state", &["Ayşe", "Mehmet"]);
    let stickers = mint(&mut store, 1);
    transfer(&mut store, &stickers[0], "Ayşe");

    let err = store
        .transfer(TransferRequest {
            sticker_code: stickers[0].clone(),
            new_owner: "Ghost".to_string(),
            created_at_ms: T0,
        })
        .expect_err("unknown owner");
    assert!(matches!(err, StoreError::NotFound { .. }));

    let conn = Connection::open(store.db_path()).expect("open raw db");
    let records: i64 = conn
        .query_row("SELECT COUNT(*) FROM ownership", [], |row| row.get(0))
        .expect("count records");
    assert_eq!(records, 1);
    assert_eq!(owner_of(&store, &stickers[0]).as_deref(), Some("Ayşe"));
}
