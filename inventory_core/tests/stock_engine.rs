mod common;
use common::{blank_engine, new_equipment};

use inventory_core::models::equipment::{Condition, EquipmentStatus};
use inventory_core::models::movement::MovementKind;

#[test]
fn add_creates_row_and_entry_movement() {
    let (_store, mut engine) = blank_engine();

    let resp = engine.add_equipment(new_equipment("NB-DELL-010", Condition::New, 5, 3000.0));
    assert!(resp.success, "{}", resp.message);
    assert_eq!(resp.new_quantity, Some(5));

    assert_eq!(engine.repo().len(), 1);
    let row = engine
        .repo()
        .find_by_code_and_condition("NB-DELL-010", Condition::New)
        .expect("row present");
    assert_eq!(row.quantity, 5);
    assert_eq!(row.status, EquipmentStatus::Available);

    assert_eq!(engine.ledger().len(), 1);
    let entry = &engine.ledger().entries()[0];
    assert_eq!(entry.kind, MovementKind::Entry);
    assert_eq!(entry.quantity, 5);
    assert_eq!(entry.equipment_id, row.id);
    assert_eq!(entry.counterparty, "Supplier: Dell Brasil");
    assert_eq!(entry.product_code, "NB-DELL-010");
}

#[test]
fn increase_updates_quantity_and_keeps_status_available() {
    let (_store, mut engine) = blank_engine();
    engine.add_equipment(new_equipment("NB-DELL-010", Condition::New, 5, 3000.0));
    let id = engine.repo().find_by_code("NB-DELL-010")[0].id;

    let resp = engine.increase_stock(id, 3, 2800.0, "Dell Brasil", None);
    assert!(resp.success, "{}", resp.message);
    assert_eq!(resp.new_quantity, Some(8));

    let row = engine.repo().find_by_id(id).unwrap();
    assert_eq!(row.quantity, 8);
    assert_eq!(row.status, EquipmentStatus::Available);
    // the new purchase price replaces the old one
    assert_eq!(row.unit_value, 2800.0);

    assert_eq!(engine.ledger().len(), 2);
    let entry = &engine.ledger().entries()[1];
    assert_eq!(entry.kind, MovementKind::Entry);
    assert_eq!(entry.quantity, 3);
}

#[test]
fn depleting_removal_sets_status_unavailable() {
    let (_store, mut engine) = blank_engine();
    engine.add_equipment(new_equipment("NB-DELL-010", Condition::New, 5, 3000.0));
    let id = engine.repo().find_by_code("NB-DELL-010")[0].id;
    engine.increase_stock(id, 3, 3000.0, "Dell Brasil", None);

    let resp = engine.remove_stock(id, 8, "Branch office", "quarterly refresh", None);
    assert!(resp.success, "{}", resp.message);
    assert_eq!(resp.new_quantity, Some(0));

    let row = engine.repo().find_by_id(id).unwrap();
    assert_eq!(row.quantity, 0);
    assert_eq!(row.status, EquipmentStatus::Unavailable);

    let exit = engine.ledger().entries().last().unwrap();
    assert_eq!(exit.kind, MovementKind::Exit);
    assert_eq!(exit.quantity, 8);
    assert_eq!(exit.counterparty, "Branch office");
    // notes carry code and condition for audit reads
    assert!(exit.notes.contains("NB-DELL-010"));
    assert!(exit.notes.contains("New"));
}

#[test]
fn removal_from_depleted_row_is_rejected_without_state_change() {
    let (_store, mut engine) = blank_engine();
    engine.add_equipment(new_equipment("NB-DELL-010", Condition::New, 5, 3000.0));
    let id = engine.repo().find_by_code("NB-DELL-010")[0].id;
    engine.remove_stock(id, 5, "Branch office", "", None);

    let ledger_before = engine.ledger().len();
    let resp = engine.remove_stock(id, 1, "Branch office", "", None);
    assert!(!resp.success);
    assert!(resp.message.contains("0 unit(s) available"), "{}", resp.message);

    let row = engine.repo().find_by_id(id).unwrap();
    assert_eq!(row.quantity, 0);
    assert_eq!(row.status, EquipmentStatus::Unavailable);
    assert_eq!(engine.ledger().len(), ledger_before);
}

#[test]
fn increase_resurrects_unavailable_row() {
    let (_store, mut engine) = blank_engine();
    engine.add_equipment(new_equipment("NB-DELL-010", Condition::New, 2, 3000.0));
    let id = engine.repo().find_by_code("NB-DELL-010")[0].id;
    engine.remove_stock(id, 2, "Branch office", "", None);
    assert_eq!(
        engine.repo().find_by_id(id).unwrap().status,
        EquipmentStatus::Unavailable
    );

    let resp = engine.increase_stock(id, 1, 3000.0, "Dell Brasil", None);
    assert!(resp.success);
    assert_eq!(
        engine.repo().find_by_id(id).unwrap().status,
        EquipmentStatus::Available
    );
}

#[test]
fn same_code_coexists_as_new_and_used() {
    let (_store, mut engine) = blank_engine();

    let resp = engine.add_equipment(new_equipment("MON-LG-020", Condition::New, 10, 800.0));
    assert!(resp.success, "{}", resp.message);
    let resp = engine.add_equipment(new_equipment("MON-LG-020", Condition::Used, 4, 560.0));
    assert!(resp.success, "{}", resp.message);

    assert_eq!(engine.repo().find_by_code("MON-LG-020").len(), 2);
    let agg = engine.repo().aggregate_by_code("MON-LG-020");
    assert_eq!(agg.qty_new, 10);
    assert_eq!(agg.qty_used, 4);
    assert_eq!(agg.qty_total, 14);
}

#[test]
fn duplicate_code_condition_pair_is_rejected_and_repo_unchanged() {
    let (_store, mut engine) = blank_engine();
    engine.add_equipment(new_equipment("MON-LG-020", Condition::New, 10, 800.0));

    let rows_before = engine.repo().len();
    let ledger_before = engine.ledger().len();

    let resp = engine.add_equipment(new_equipment("mon-lg-020", Condition::New, 3, 700.0));
    assert!(!resp.success);
    assert!(resp.message.contains("MON-LG-020"), "{}", resp.message);
    assert_eq!(engine.repo().len(), rows_before);
    assert_eq!(engine.ledger().len(), ledger_before);
}

#[test]
fn condition_hint_resolves_the_sibling_row() {
    let (_store, mut engine) = blank_engine();
    engine.add_equipment(new_equipment("MON-LG-020", Condition::New, 10, 800.0));
    engine.add_equipment(new_equipment("MON-LG-020", Condition::Used, 4, 560.0));
    let new_id = engine
        .repo()
        .find_by_code_and_condition("MON-LG-020", Condition::New)
        .unwrap()
        .id;

    // addressed by the New row's id, but the hint targets the Used sibling
    let resp = engine.remove_stock(new_id, 3, "Branch office", "", Some(Condition::Used));
    assert!(resp.success, "{}", resp.message);

    let used = engine
        .repo()
        .find_by_code_and_condition("MON-LG-020", Condition::Used)
        .unwrap();
    assert_eq!(used.quantity, 1);
    let new = engine
        .repo()
        .find_by_code_and_condition("MON-LG-020", Condition::New)
        .unwrap();
    assert_eq!(new.quantity, 10);

    let exit = engine.ledger().entries().last().unwrap();
    assert_eq!(exit.condition, Condition::Used);
    assert_eq!(exit.equipment_id, used.id);
}

#[test]
fn limit_exceeded_increase_is_rejected_with_limit_figure() {
    let (_store, mut engine) = blank_engine();
    engine.add_equipment(new_equipment("NB-DELL-010", Condition::New, 999, 3000.0));
    let id = engine.repo().find_by_code("NB-DELL-010")[0].id;

    let resp = engine.increase_stock(id, 2, 3000.0, "Dell Brasil", None);
    assert!(!resp.success);
    assert!(resp.message.contains("1000"), "{}", resp.message);
    assert_eq!(engine.repo().find_by_id(id).unwrap().quantity, 999);
}

#[test]
fn unknown_equipment_id_is_not_found() {
    let (_store, mut engine) = blank_engine();
    let resp = engine.increase_stock(42, 1, 10.0, "Acme", None);
    assert!(!resp.success);
    assert!(resp.message.contains("not found"), "{}", resp.message);

    let resp = engine.remove_stock(42, 1, "Somewhere", "", None);
    assert!(!resp.success);
    assert!(resp.message.contains("not found"), "{}", resp.message);
}

#[test]
fn validation_failures_list_every_field_problem() {
    let (_store, mut engine) = blank_engine();
    let mut bad = new_equipment("X", Condition::New, 0, 0.0);
    bad.name = "  ".into();
    let resp = engine.add_equipment(bad);
    assert!(!resp.success);
    assert!(resp.message.contains("name is required"));
    assert!(resp.message.contains("product code"));
    assert!(resp.message.contains("quantity"));
    assert!(resp.message.contains("unit value"));
    assert!(engine.repo().is_empty());
    assert!(engine.ledger().is_empty());
}

#[test]
fn ledger_is_append_only_across_operation_sequences() {
    let (_store, mut engine) = blank_engine();
    engine.add_equipment(new_equipment("NB-DELL-010", Condition::New, 5, 3000.0));
    let id = engine.repo().find_by_code("NB-DELL-010")[0].id;
    let first = engine.ledger().entries()[0].clone();

    let mut last_len = engine.ledger().len();
    engine.increase_stock(id, 3, 2800.0, "Dell Brasil", None);
    assert!(engine.ledger().len() >= last_len);
    last_len = engine.ledger().len();

    engine.remove_stock(id, 100, "Branch office", "", None); // rejected
    assert_eq!(engine.ledger().len(), last_len);

    engine.remove_stock(id, 8, "Branch office", "", None);
    assert!(engine.ledger().len() > last_len);

    // earlier entries never change after creation
    assert_eq!(engine.ledger().entries()[0], first);
}
