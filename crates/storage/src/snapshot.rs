//! The persisted ledger layout and its codec.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::Money;
use stockbook_inventory::{Item, Ledger, ProfitAndLoss};

use crate::error::{LoadProblem, PersistError};
use crate::store::KeyValueStore;

/// JSON array of [`StoredItem`].
pub const INVENTORY_KEY: &str = "inventory";
/// Cumulative profit, two fractional digits.
pub const TOTAL_PROFIT_KEY: &str = "totalProfit";
/// Cumulative loss, two fractional digits.
pub const TOTAL_LOSS_KEY: &str = "totalLoss";

/// One element of the `inventory` array.
///
/// `price` is the unit cost price, written as a JSON number with every digit
/// of the decimal kept. Strings are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    pub price: Decimal,
}

impl From<&Item> for StoredItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id_typed().to_string(),
            name: item.name().to_string(),
            quantity: i64::try_from(item.quantity()).unwrap_or(i64::MAX),
            price: item.cost_price().amount(),
        }
    }
}

/// Result of loading: the ledger to use plus anything that was skipped.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub problems: Vec<LoadProblem>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Write all three keys. Stops at the first failure.
pub fn save_ledger<S>(store: &S, ledger: &Ledger) -> Result<(), PersistError>
where
    S: KeyValueStore + ?Sized,
{
    let records: Vec<StoredItem> = ledger.items().iter().map(StoredItem::from).collect();
    let inventory = serde_json::to_string(&records).map_err(|source| PersistError::Serialize {
        key: INVENTORY_KEY,
        source,
    })?;
    let totals = ledger.totals();

    let entries = [
        (INVENTORY_KEY, inventory),
        (TOTAL_PROFIT_KEY, totals.profit.to_fixed()),
        (TOTAL_LOSS_KEY, totals.loss.to_fixed()),
    ];
    for (key, value) in entries {
        store
            .set(key, &value)
            .map_err(|source| PersistError::Store { key, source })?;
    }

    tracing::debug!(items = records.len(), "ledger persisted");
    Ok(())
}

/// Read the ledger back. Never fails: each key falls back on its own (empty
/// set or zero) and every fallback that was not a plain absence is reported.
pub fn load_ledger<S>(store: &S) -> LoadReport
where
    S: KeyValueStore + ?Sized,
{
    let mut problems = Vec::new();

    let items = match read(store, INVENTORY_KEY, &mut problems) {
        Some(raw) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(records) => records
                .into_iter()
                .enumerate()
                .filter_map(|(index, record)| match decode_record(record) {
                    Ok(item) => Some(item),
                    Err(reason) => {
                        problems.push(LoadProblem::InvalidRecord { index, reason });
                        None
                    }
                })
                .collect(),
            Err(err) => {
                problems.push(LoadProblem::Malformed {
                    key: INVENTORY_KEY,
                    reason: err.to_string(),
                });
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let profit = read_amount(store, TOTAL_PROFIT_KEY, &mut problems);
    let loss = read_amount(store, TOTAL_LOSS_KEY, &mut problems);

    let (ledger, dropped) = Ledger::restore(items, ProfitAndLoss::new(profit, loss));
    problems.extend(dropped.into_iter().map(LoadProblem::DuplicateId));

    for problem in &problems {
        tracing::warn!(%problem, "ledger load fell back to defaults");
    }

    LoadReport { ledger, problems }
}

/// One array element. A mistyped field or a failed item rule rejects only
/// this record.
fn decode_record(record: serde_json::Value) -> Result<Item, String> {
    let stored: StoredItem = serde_json::from_value(record).map_err(|err| err.to_string())?;
    Item::from_input(&stored.id, &stored.name, stored.quantity, stored.price)
        .map_err(|err| err.to_string())
}

/// Fetch a key; absent or blank values count as missing.
fn read<S>(store: &S, key: &'static str, problems: &mut Vec<LoadProblem>) -> Option<String>
where
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => Some(raw),
        Ok(_) => None,
        Err(source) => {
            problems.push(LoadProblem::Unreadable { key, source });
            None
        }
    }
}

fn read_amount<S>(store: &S, key: &'static str, problems: &mut Vec<LoadProblem>) -> Money
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = read(store, key, problems) else {
        return Money::ZERO;
    };

    let parsed = Decimal::from_str(raw.trim())
        .map_err(|err| err.to_string())
        .and_then(|d| Money::new(d).map_err(|err| err.to_string()));

    match parsed {
        Ok(amount) => amount,
        Err(reason) => {
            problems.push(LoadProblem::Malformed { key, reason });
            Money::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::InMemoryStore;
    use proptest::prelude::*;
    use stockbook_inventory::TransactionReason;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_item("A1", "Widget", 10, dec("5.00")).unwrap();
        ledger.add_item("B2", "Bolt", 3, dec("0.35")).unwrap();
        ledger
            .apply_transaction("A1", 4, TransactionReason::Sale, Some(dec("8.00")))
            .unwrap();
        ledger
            .apply_transaction("B2", 1, TransactionReason::Damage, None)
            .unwrap();
        ledger
    }

    #[test]
    fn save_writes_the_three_keys() {
        let store = InMemoryStore::new();
        save_ledger(&store, &sample_ledger()).unwrap();

        let expected = concat!(
            r#"[{"id":"A1","name":"Widget","quantity":6,"price":5.00},"#,
            r#"{"id":"B2","name":"Bolt","quantity":2,"price":0.35}]"#,
        );
        assert_eq!(store.get(INVENTORY_KEY).unwrap().as_deref(), Some(expected));
        assert_eq!(store.get(TOTAL_PROFIT_KEY).unwrap().as_deref(), Some("12.00"));
        assert_eq!(store.get(TOTAL_LOSS_KEY).unwrap().as_deref(), Some("0.35"));
    }

    #[test]
    fn round_trip_restores_items_and_totals() {
        let store = InMemoryStore::new();
        let original = sample_ledger();
        save_ledger(&store, &original).unwrap();

        let report = load_ledger(&store);
        assert!(report.is_clean(), "{:?}", report.problems);
        assert_eq!(report.ledger.items(), original.items());
        assert_eq!(report.ledger.totals(), original.totals());
    }

    #[test]
    fn empty_store_loads_empty_ledger_silently() {
        let report = load_ledger(&InMemoryStore::new());
        assert!(report.is_clean());
        assert!(report.ledger.is_empty());
        assert_eq!(report.ledger.totals(), ProfitAndLoss::default());
    }

    #[test]
    fn malformed_entries_fall_back_independently() {
        let store = InMemoryStore::new();
        store.set(INVENTORY_KEY, "{not json").unwrap();
        store.set(TOTAL_PROFIT_KEY, "7.50").unwrap();
        store.set(TOTAL_LOSS_KEY, "NaN").unwrap();

        let report = load_ledger(&store);
        assert!(report.ledger.is_empty());
        assert_eq!(report.ledger.totals().profit, Money::parse("7.50").unwrap());
        assert_eq!(report.ledger.totals().loss, Money::ZERO);
        assert_eq!(report.problems.len(), 2);
        assert!(matches!(
            report.problems[0],
            LoadProblem::Malformed { key: INVENTORY_KEY, .. }
        ));
        assert!(matches!(
            report.problems[1],
            LoadProblem::Malformed { key: TOTAL_LOSS_KEY, .. }
        ));
    }

    #[test]
    fn negative_total_is_malformed() {
        let store = InMemoryStore::new();
        store.set(TOTAL_LOSS_KEY, "-3.00").unwrap();
        let report = load_ledger(&store);
        assert_eq!(report.ledger.totals().loss, Money::ZERO);
        assert_eq!(report.problems.len(), 1);
    }

    #[test]
    fn accepts_string_prices_and_drops_bad_records() {
        let store = InMemoryStore::new();
        store
            .set(
                INVENTORY_KEY,
                r#"[
                    {"id": "A1", "name": "Widget", "quantity": 2, "price": "1.25"},
                    {"id": "", "name": "Nameless", "quantity": 1, "price": 1},
                    {"id": "C3", "name": "Cog", "quantity": -4, "price": 1},
                    {"id": "A1", "name": "Again", "quantity": 1, "price": 1},
                    {"id": "D4", "name": "Dowel", "quantity": 5, "price": 0.1}
                ]"#,
            )
            .unwrap();

        let report = load_ledger(&store);
        let ids: Vec<_> = report.ledger.items().iter().map(|i| i.id_typed().as_str()).collect();
        assert_eq!(ids, vec!["A1", "D4"]);
        assert_eq!(report.ledger.find_item("A1").unwrap().cost_price().to_fixed(), "1.25");
        assert_eq!(
            report.ledger.find_item("D4").unwrap().cost_price(),
            Money::parse("0.1").unwrap()
        );
        assert_eq!(report.problems.len(), 3);
        assert!(matches!(report.problems[0], LoadProblem::InvalidRecord { index: 1, .. }));
        assert!(matches!(report.problems[1], LoadProblem::InvalidRecord { index: 2, .. }));
        assert!(matches!(report.problems[2], LoadProblem::DuplicateId(_)));
    }

    #[test]
    fn mistyped_record_does_not_sink_its_neighbours() {
        let store = InMemoryStore::new();
        store
            .set(
                INVENTORY_KEY,
                r#"[
                    {"id": "A1", "name": "Widget", "quantity": 2, "price": 1},
                    {"id": "B2", "name": "Bolt", "quantity": "3", "price": 1},
                    "not a record",
                    {"id": "C3", "name": "Cog", "quantity": 4, "price": "2.50"}
                ]"#,
            )
            .unwrap();

        let report = load_ledger(&store);
        let ids: Vec<_> = report.ledger.items().iter().map(|i| i.id_typed().as_str()).collect();
        assert_eq!(ids, vec!["A1", "C3"]);
        assert_eq!(report.problems.len(), 2);
        assert!(matches!(report.problems[0], LoadProblem::InvalidRecord { index: 1, .. }));
        assert!(matches!(report.problems[1], LoadProblem::InvalidRecord { index: 2, .. }));
    }

    #[test]
    fn prices_keep_every_digit_through_storage() {
        let mut ledger = Ledger::new();
        let prices = [
            dec("0.12345678901234567"),
            dec("12345678901234567.89"),
            Decimal::MAX,
            dec("2.50"),
        ];
        for (i, price) in prices.iter().enumerate() {
            ledger.add_item(&format!("P{i}"), "Priced", 1, *price).unwrap();
        }

        let store = InMemoryStore::new();
        save_ledger(&store, &ledger).unwrap();
        let raw = store.get(INVENTORY_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""price":79228162514264337593543950335"#), "{raw}");

        let report = load_ledger(&store);
        assert!(report.is_clean(), "{:?}", report.problems);
        assert_eq!(report.ledger.items(), ledger.items());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let store = InMemoryStore::new();
        store.set(INVENTORY_KEY, "").unwrap();
        store.set(TOTAL_PROFIT_KEY, "  ").unwrap();
        let report = load_ledger(&store);
        assert!(report.is_clean());
    }

    #[test]
    fn unavailable_store_reports_each_key() {
        let store = InMemoryStore::new();
        store.set_available(false);
        let report = load_ledger(&store);
        assert!(report.ledger.is_empty());
        assert_eq!(report.problems.len(), 3);
        assert!(report.problems.iter().all(|p| matches!(
            p,
            LoadProblem::Unreadable { source: StoreError::Unavailable, .. }
        )));
    }

    #[test]
    fn save_failure_is_reported_with_key() {
        let store = InMemoryStore::with_quota(8);
        let err = save_ledger(&store, &sample_ledger()).unwrap_err();
        match err {
            PersistError::Store { key, source: StoreError::QuotaExceeded { .. } } => {
                assert_eq!(key, INVENTORY_KEY)
            }
            other => panic!("Expected quota failure, got {other:?}"),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: save then load reproduces items exactly and totals to
        /// two decimals, for any scale and magnitude of cost price.
        #[test]
        fn save_load_round_trip(
            records in prop::collection::vec((1i64..500, any::<i64>(), 0u32..=28), 0..20),
            sales in prop::collection::vec((0usize..20, 1i64..5, 0i64..1_000_000), 0..20),
        ) {
            let mut ledger = Ledger::new();
            for (i, (qty, mantissa, scale)) in records.iter().enumerate() {
                let price = Decimal::new(*mantissa, *scale).abs();
                ledger
                    .add_item(&format!("ID-{i}"), &format!("Item {i}"), *qty, price)
                    .unwrap();
            }
            for (idx, qty, cents) in &sales {
                let _ = ledger.apply_transaction(
                    &format!("ID-{idx}"),
                    *qty,
                    TransactionReason::Sale,
                    Some(Decimal::new(*cents, 2)),
                );
            }

            let store = InMemoryStore::new();
            save_ledger(&store, &ledger).unwrap();
            let report = load_ledger(&store);

            prop_assert!(report.is_clean());
            prop_assert_eq!(report.ledger.items(), ledger.items());
            prop_assert_eq!(report.ledger.totals().profit, ledger.totals().profit.rounded());
            prop_assert_eq!(report.ledger.totals().loss, ledger.totals().loss.rounded());
        }
    }
}
