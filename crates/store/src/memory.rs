//! In-memory `TableStore` for tests. Mimics the hosted store's observable
//! behavior: auto-assigned integer ids, unique `code` per table, and
//! lexicographic ordering for string comparisons (ISO dates order correctly).

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::errors::StoreError;
use crate::filter::{Filter, Op};
use crate::TableStore;

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: Mutex<i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { tables: Mutex::new(HashMap::new()), next_id: Mutex::new(1) }
    }

    fn alloc_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    }

    fn matches(row: &Value, filter: &Filter) -> bool {
        let Some(cell) = row.get(&filter.column) else { return false };
        match filter.op {
            Op::Eq => values_equal(cell, &filter.value),
            Op::Neq => !values_equal(cell, &filter.value),
            Op::Gte => compare(cell, &filter.value).map_or(false, |o| o != std::cmp::Ordering::Less),
            Op::Lt => compare(cell, &filter.value).map_or(false, |o| o == std::cmp::Ordering::Less),
        }
    }

    fn matches_all(row: &Value, filters: &[Filter]) -> bool {
        filters.iter().all(|f| Self::matches(row, f))
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x == y;
    }
    a == b
}

fn compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        return Some(x.cmp(y));
    }
    None
}

#[async_trait::async_trait]
impl TableStore for MemoryStore {
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        if let Some(code) = row.get("code").and_then(Value::as_str) {
            let taken = rows
                .iter()
                .any(|r| r.get("code").and_then(Value::as_str) == Some(code));
            if taken {
                return Err(StoreError::Http {
                    status: 409,
                    message: format!(
                        "duplicate key value violates unique constraint \"{table}_code_key\""
                    ),
                });
            }
        }

        let mut stored = row;
        if let Some(obj) = stored.as_object_mut() {
            if !obj.contains_key("id") {
                obj.insert("id".into(), json!(self.alloc_id()));
            }
        }
        rows.push(stored.clone());
        Ok(vec![stored])
    }

    async fn select(&self, table: &str, _columns: &str, filters: &[Filter])
        -> Result<Vec<Value>, StoreError>
    {
        let tables = self.tables.lock().unwrap();
        let rows = tables.get(table).cloned().unwrap_or_default();
        Ok(rows.into_iter().filter(|r| Self::matches_all(r, filters)).collect())
    }

    async fn update(&self, table: &str, patch: Value, filters: &[Filter])
        -> Result<Vec<Value>, StoreError>
    {
        let patch = patch
            .as_object()
            .ok_or_else(|| StoreError::Decode("update patch must be a JSON object".into()))?
            .clone();
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let mut updated = Vec::new();
        for row in rows.iter_mut() {
            if Self::matches_all(row, filters) {
                if let Some(obj) = row.as_object_mut() {
                    for (k, v) in &patch {
                        obj.insert(k.clone(), v.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.insert("products", json!({"name": "Oil"})).await.unwrap();
        let b = store.insert("products", json!({"name": "Wax"})).await.unwrap();
        assert_eq!(a[0]["id"], json!(1));
        assert_eq!(b[0]["id"], json!(2));
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected_with_store_message() {
        let store = MemoryStore::new();
        store.insert("products", json!({"code": "P-1"})).await.unwrap();
        let err = store.insert("products", json!({"code": "P-1"})).await.unwrap_err();
        assert!(err.is_duplicate_code());
    }

    #[tokio::test]
    async fn date_range_filters_use_string_ordering() {
        let store = MemoryStore::new();
        store
            .insert("billing", json!({"payment_date": "2026-08-25T09:00:00+00:00"}))
            .await
            .unwrap();
        store
            .insert("billing", json!({"payment_date": "2026-08-26T09:00:00+00:00"}))
            .await
            .unwrap();
        let rows = store
            .select(
                "billing",
                "*",
                &[Filter::gte("payment_date", "2026-08-26"), Filter::lt("payment_date", "2026-08-27")],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn update_merges_patch_and_returns_rows() {
        let store = MemoryStore::new();
        store
            .insert("products", json!({"code": "P-1", "quantity": 5}))
            .await
            .unwrap();
        let rows = store
            .update("products", json!({"quantity": 3}), &[Filter::eq("code", "P-1")])
            .await
            .unwrap();
        assert_eq!(rows[0]["quantity"], json!(3));
        assert_eq!(rows[0]["code"], json!("P-1"));
    }
}
