use std::sync::Arc;

use serde_json::json;
use stockbook_session::{ItemForm, Notice, NoticeKind, Session, SessionConfig, StockForm};
use stockbook_storage::{
    INVENTORY_KEY, InMemoryStore, KeyValueStore, TOTAL_LOSS_KEY, TOTAL_PROFIT_KEY,
};

fn open(store: Arc<InMemoryStore>) -> Session<Arc<InMemoryStore>> {
    stockbook_observability::init_for_tests();
    let (session, feedback) = Session::open(store, SessionConfig::default());
    assert!(feedback.notices.is_empty(), "unexpected load notices: {feedback:?}");
    session
}

fn with_widget() -> (Session<Arc<InMemoryStore>>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let mut session = open(store.clone());
    let fb = session.save_item(&ItemForm::new("A1", "Widget", "10", "5.00"), None);
    assert_eq!(fb.last(), Some(&Notice::success("Item added successfully!")));
    (session, store)
}

#[test]
fn adding_an_item_updates_metrics() {
    let (session, _) = with_widget();
    let metrics = session.metrics_summary();
    assert_eq!(metrics.unique_items, 1);
    assert_eq!(metrics.total_quantity, 10);
    assert_eq!(metrics.total_valuation, "₹50.00");
}

#[test]
fn profitable_then_losing_sale_then_depleting_damage() {
    let (mut session, store) = with_widget();

    session.modify_stock(&StockForm::sale("A1", "4", "8.00"));
    assert_eq!(session.ledger().find_item("A1").unwrap().quantity(), 6);
    assert_eq!(session.financial_summary().total_profit, "₹12.00");

    let fb = session.modify_stock(&StockForm::damage("A1", "6"));
    assert!(fb.changed);
    assert_eq!(
        fb.last(),
        Some(&Notice::info(
            "Widget quantity reached zero and was removed from inventory."
        ))
    );
    assert!(!session.ledger().contains("A1"));

    let summary = session.financial_summary();
    assert_eq!(summary.total_profit, "₹12.00");
    assert_eq!(summary.total_loss, "₹30.00");

    assert_eq!(store.get(INVENTORY_KEY).unwrap().as_deref(), Some("[]"));
    assert_eq!(store.get(TOTAL_PROFIT_KEY).unwrap().as_deref(), Some("12.00"));
    assert_eq!(store.get(TOTAL_LOSS_KEY).unwrap().as_deref(), Some("30.00"));
}

#[test]
fn sale_below_cost_is_booked_as_loss() {
    let (mut session, _) = with_widget();
    let fb = session.modify_stock(&StockForm::sale("A1", "4", "3.00"));
    assert_eq!(fb.last().map(|n| n.kind), Some(NoticeKind::Info));
    let summary = session.financial_summary();
    assert_eq!(summary.total_profit, "₹0.00");
    assert_eq!(summary.total_loss, "₹8.00");
}

#[test]
fn duplicate_add_leaves_one_item() {
    let (mut session, _) = with_widget();
    let fb = session.save_item(&ItemForm::new("A1", "Other", "1", "1"), None);
    assert!(!fb.changed);
    assert!(fb.has_errors());
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.ledger().find_item("A1").unwrap().name(), "Widget");
}

#[test]
fn oversized_sale_changes_nothing() {
    let (mut session, store) = with_widget();
    let before = store.get(INVENTORY_KEY).unwrap();

    let fb = session.modify_stock(&StockForm::sale("A1", "999", "1.00"));
    assert_eq!(
        fb.last(),
        Some(&Notice::error("Cannot change more than available quantity."))
    );
    assert_eq!(session.ledger().find_item("A1").unwrap().quantity(), 10);
    assert_eq!(session.financial_summary().total_loss, "₹0.00");
    assert_eq!(store.get(INVENTORY_KEY).unwrap(), before);
}

#[test]
fn quota_exhaustion_is_reported_but_not_fatal() {
    let store = Arc::new(InMemoryStore::with_quota(48));
    let mut session = open(store.clone());

    let fb = session.save_item(&ItemForm::new("A1", "Widget", "10", "5.00"), None);
    assert!(fb.changed);
    assert_eq!(
        fb.notices,
        vec![
            Notice::success("Item added successfully!"),
            Notice::error("Error saving data locally."),
        ]
    );
    assert!(session.ledger().contains("A1"));

    let fb = session.modify_stock(&StockForm::sale("A1", "1", "6"));
    assert!(fb.changed);
    assert_eq!(session.ledger().find_item("A1").unwrap().quantity(), 9);
}

#[test]
fn reopening_restores_state() {
    let (mut session, store) = with_widget();
    session.save_item(&ItemForm::new("B2", "Bolt", "4", "0.25"), None);
    session.modify_stock(&StockForm::sale("A1", "2", "7.50"));
    let expected = session.inventory_view("");
    let totals = session.financial_summary();
    drop(session);

    let reopened = open(store);
    assert_eq!(reopened.inventory_view(""), expected);
    assert_eq!(reopened.financial_summary(), totals);
}

#[test]
fn malformed_storage_falls_back_with_error_notice() {
    stockbook_observability::init_for_tests();
    let store = InMemoryStore::new();
    store.set(INVENTORY_KEY, "{not json").unwrap();
    store.set(TOTAL_PROFIT_KEY, "15.50").unwrap();

    let (session, feedback) = Session::open(&store, SessionConfig::default());
    assert_eq!(
        feedback.notices,
        vec![Notice::error("Error loading data from local storage.")]
    );
    assert!(session.ledger().is_empty());
    assert_eq!(session.financial_summary().total_profit, "₹15.50");
}

#[test]
fn file_store_survives_a_new_session() {
    stockbook_observability::init_for_tests();
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig {
        data_dir: Some(dir.path().to_path_buf()),
        currency_symbol: "$".to_string(),
    };

    let store = config.open_file_store().unwrap();
    let (mut session, feedback) = Session::open(store, config.clone());
    assert!(feedback.notices.is_empty());
    session.save_item(&ItemForm::new("A1", "Widget", "10", "5"), None);
    let fb = session.modify_stock(&StockForm::sale("A1", "4", "8"));
    assert_eq!(
        fb.last(),
        Some(&Notice::success("Sold 4 of Widget for $8.00 each. Profit: $12.00"))
    );
    drop(session);

    let store = config.open_file_store().unwrap();
    let (session, feedback) = Session::open(store, config);
    assert!(feedback.notices.is_empty());
    assert_eq!(session.ledger().find_item("A1").unwrap().quantity(), 6);
    assert_eq!(session.financial_summary().total_profit, "$12.00");
}

#[test]
fn view_models_serialize_for_a_renderer() {
    let (mut session, _) = with_widget();
    let fb = session.modify_stock(&StockForm::sale("A1", "1", "5"));

    assert_eq!(
        serde_json::to_value(&fb).unwrap(),
        json!({
            "changed": true,
            "notices": [{
                "kind": "success",
                "message": "Sold 1 of Widget for ₹5.00 each. Profit: ₹0.00"
            }]
        })
    );

    assert_eq!(
        serde_json::to_value(session.inventory_view("wid")).unwrap(),
        json!({
            "metrics": {
                "unique_items": 1,
                "total_quantity": 9,
                "total_valuation": "₹45.00"
            },
            "rows": [{
                "id": "A1",
                "name": "Widget",
                "quantity": 9,
                "cost_price": "₹5.00"
            }]
        })
    );
}
