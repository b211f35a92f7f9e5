//! End-to-end scenarios and engine properties over real data directories.

use crate::fixtures::{TestDataDir, User, USER_SEED};
use crate::generators::{user_ops_strategy, user_with_id_strategy, PropTestConfig};
use crate::golden::{assert_text_eq, render_user_table};
use crate::integration::IntegrationHarness;
use proptest::prelude::*;
use rowdb_core::CoreError;

#[test]
fn save_appends_row_and_advances_generator() {
    let dir = TestDataDir::seeded();
    let db = dir.open_users();

    db.save(&mut User::new("Bar", 40)).unwrap();

    assert_text_eq(
        &dir.table_file::<User>(),
        r#"{
  "idGenerator": 3,
  "rows": [
    {
      "id": 1,
      "username": "Foo",
      "age": 20
    },
    {
      "id": 2,
      "username": "Bar",
      "age": 40
    }
  ]
}"#,
    );
    db.destroy();
}

#[test]
fn find_reads_seeded_row() {
    let dir = TestDataDir::seeded();
    let db = dir.open_users();

    assert_eq!(db.find_all::<User>().unwrap().len(), 1);
    assert_eq!(
        db.find_one::<User>(1).unwrap().unwrap().to_string(),
        "User(id=1, username=Foo, age=20)"
    );
    assert!(db.find_one::<User>(2).unwrap().is_none());
}

#[test]
fn update_rewrites_row_in_place() {
    let dir = TestDataDir::seeded();
    let db = dir.open_users();

    let mut user = db.find_one::<User>(1).unwrap().unwrap();
    user.age = 24;
    db.update(&user).unwrap();

    assert_text_eq(
        &dir.table_file::<User>(),
        r#"{
  "idGenerator": 2,
  "rows": [
    {
      "id": 1,
      "username": "Foo",
      "age": 24
    }
  ]
}"#,
    );
}

#[test]
fn remove_empties_rows_and_keeps_generator() {
    let dir = TestDataDir::seeded();
    let db = dir.open_users();

    db.remove::<User>(1).unwrap();

    assert_text_eq(
        &dir.table_file::<User>(),
        r#"{
  "idGenerator": 2,
  "rows": []
}"#,
    );
}

#[test]
fn save_with_manual_id_is_rejected() {
    let dir = TestDataDir::seeded();
    let db = dir.open_users();

    let err = db.save(&mut User::with_id(2, "Foo", 30)).unwrap_err();

    assert!(matches!(err, CoreError::ManualIdentifierNotAllowed { id: 2, .. }));
    assert_eq!(
        err.to_string(),
        "row with manual id should not be added: 2, call replace instead"
    );
    assert_eq!(db.count::<User>().unwrap(), 1);
    assert_text_eq(&dir.table_file::<User>(), USER_SEED);
}

#[test]
fn removed_ids_are_never_reused() {
    let dir = TestDataDir::seeded();
    let db = dir.open_users();

    let a = db.save(&mut User::new("A", 1)).unwrap();
    db.remove::<User>(a).unwrap();
    let b = db.save(&mut User::new("B", 2)).unwrap();

    assert!(b > a);
    assert_text_eq(
        &dir.table_file::<User>(),
        &render_user_table(4, &[(1, "Foo", 20), (3, "B", 2)]),
    );
}

#[test]
fn missing_file_starts_at_one_and_is_created_on_first_write() {
    let dir = TestDataDir::empty();
    let db = dir.open_users();

    assert!(!dir.file_path("User.json").exists());
    assert_eq!(db.save(&mut User::new("First", 1)).unwrap(), 1);
    assert_text_eq(
        &dir.table_file::<User>(),
        &render_user_table(2, &[(1, "First", 1)]),
    );
}

#[test]
fn replace_then_reopen_keeps_generator_ahead() {
    let dir = TestDataDir::seeded();
    {
        let db = dir.open_users();
        db.replace(&User::with_id(9, "Nine", 9)).unwrap();
    }

    let db = dir.open_users();
    assert_eq!(db.database().id_generator("User").unwrap(), 10);
    assert_eq!(db.save(&mut User::new("Ten", 10)).unwrap(), 10);
}

#[test]
fn hand_edited_stale_generator_is_repaired_on_open() {
    let dir = TestDataDir::empty();
    dir.write_file(
        "User.json",
        &render_user_table(1, &[(1, "Foo", 20), (5, "Five", 5)]),
    );

    let db = dir.open_users();
    assert_eq!(db.save(&mut User::new("Next", 1)).unwrap(), 6);
}

#[test]
fn duplicate_ids_on_disk_fail_open() {
    let dir = TestDataDir::empty();
    dir.write_file(
        "User.json",
        &render_user_table(3, &[(1, "Foo", 20), (1, "Again", 21)]),
    );

    let result = rowdb_core::JsonDb::open(dir.path(), crate::fixtures::user_registry());
    assert!(matches!(result, Err(CoreError::DuplicateIdentifier { id: 1, .. })));
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn engine_matches_model(ops in user_ops_strategy(40)) {
        let dir = TestDataDir::seeded();
        let mut harness = IntegrationHarness::new(dir.open_users());

        for op in &ops {
            harness.apply(op);
            harness.verify();
        }

        let issued = harness.issued_ids();
        prop_assert!(issued.windows(2).all(|w| w[0] < w[1]), "ids not increasing: {issued:?}");
    }

    #[test]
    fn reopen_restores_identical_state(ops in user_ops_strategy(30)) {
        let dir = TestDataDir::seeded();
        let mut harness = IntegrationHarness::new(dir.open_users());
        for op in &ops {
            harness.apply(op);
        }
        let model = harness.model().to_vec();
        let generator = harness.db.database().id_generator("User").unwrap();
        drop(harness);
        let file_before = dir.table_file::<User>();

        let db = dir.open_users();
        prop_assert_eq!(db.find_all::<User>().unwrap(), model);
        prop_assert_eq!(db.database().id_generator("User").unwrap(), generator);

        db.remove::<User>(u64::MAX).unwrap();
        prop_assert_eq!(dir.table_file::<User>(), file_before);
    }

    #[test]
    fn remove_twice_is_idempotent(ops in user_ops_strategy(20), id in 0u64..30) {
        let dir = TestDataDir::seeded();
        let mut harness = IntegrationHarness::new(dir.open_users());
        for op in &ops {
            harness.apply(op);
        }

        harness.db.remove::<User>(id).unwrap();
        let once = dir.table_file::<User>();
        let removed_again = harness.db.remove::<User>(id).unwrap();

        prop_assert!(!removed_again);
        prop_assert_eq!(dir.table_file::<User>(), once);
    }

    #[test]
    fn manual_save_never_mutates(ops in user_ops_strategy(20), user in user_with_id_strategy(60)) {
        let dir = TestDataDir::seeded();
        let mut harness = IntegrationHarness::new(dir.open_users());
        for op in &ops {
            harness.apply(op);
        }
        let file_before = dir.table_file::<User>();

        harness.verify_manual_save_rejected(&user);
        harness.verify();
        prop_assert_eq!(dir.table_file::<User>(), file_before);
    }
}
