use super::*;
use crate::event::ServerEvent;
use tokio::sync::mpsc;

fn sender() -> mpsc::Sender<ServerEvent> {
    mpsc::channel(8).0
}

#[test]
fn add_preserves_join_order() {
    let mut registry = ConnectionRegistry::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();

    registry.add(a, "alice".into(), sender()).expect("add alice");
    registry.add(b, "bob".into(), sender()).expect("add bob");
    registry.add(c, "carol".into(), sender()).expect("add carol");

    assert_eq!(registry.snapshot_names(), vec!["alice", "bob", "carol"]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn add_duplicate_id_is_rejected() {
    let mut registry = ConnectionRegistry::new();
    let id = Uuid::new_v4();

    registry.add(id, "alice".into(), sender()).expect("first add");
    let err = registry.add(id, "impostor".into(), sender()).expect_err("duplicate must fail");

    assert_eq!(err.0, id);
    // The original registration is untouched.
    assert_eq!(registry.snapshot_names(), vec!["alice"]);
    assert_eq!(registry.name_of(id), Some("alice"));
}

#[test]
fn remove_is_idempotent() {
    let mut registry = ConnectionRegistry::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    registry.add(a, "alice".into(), sender()).expect("add alice");
    registry.add(b, "bob".into(), sender()).expect("add bob");

    assert_eq!(registry.remove(a), Some("alice".to_string()));
    assert_eq!(registry.remove(a), None);
    assert_eq!(registry.remove(Uuid::new_v4()), None);

    assert_eq!(registry.snapshot_names(), vec!["bob"]);
}

#[test]
fn remove_then_rejoin_moves_to_end_of_order() {
    let mut registry = ConnectionRegistry::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    registry.add(a, "alice".into(), sender()).expect("add alice");
    registry.add(b, "bob".into(), sender()).expect("add bob");

    registry.remove(a);
    registry.add(a, "alice".into(), sender()).expect("re-add alice");

    assert_eq!(registry.snapshot_names(), vec!["bob", "alice"]);
}

#[test]
fn all_except_excludes_only_the_given_connection() {
    let mut registry = ConnectionRegistry::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();
    registry.add(a, "alice".into(), sender()).expect("add alice");
    registry.add(b, "bob".into(), sender()).expect("add bob");
    registry.add(c, "carol".into(), sender()).expect("add carol");

    assert_eq!(registry.all_except(b).len(), 2);
    assert_eq!(registry.all().len(), 3);
    // Excluding an unknown id excludes nobody.
    assert_eq!(registry.all_except(Uuid::new_v4()).len(), 3);
}

#[test]
fn snapshot_is_a_copy() {
    let mut registry = ConnectionRegistry::new();
    let a = Uuid::new_v4();
    registry.add(a, "alice".into(), sender()).expect("add alice");

    let snapshot = registry.snapshot_names();
    registry.remove(a);

    assert_eq!(snapshot, vec!["alice"]);
    assert!(registry.is_empty());
}
