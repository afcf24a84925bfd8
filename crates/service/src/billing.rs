use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use models::billing::{BillPayload, BillReceipt, LineItem};
use store::{Filter, StoreError, TableStore};

use crate::errors::ServiceError;

/// The bill submission sequence and customer listing.
///
/// Submission is a strictly sequential multi-table write with no rollback:
/// customer first, then the billing row, then per-item stock decrements.
/// A failure after the customer insert leaves that row in place; per-item
/// stock failures are logged and swallowed. That partial-failure behavior is
/// part of the API contract.
#[derive(Clone)]
pub struct BillingService {
    store: Arc<dyn TableStore>,
}

impl BillingService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub async fn submit_bill(&self, payload: BillPayload) -> Result<BillReceipt, ServiceError> {
        info!(items = payload.items.len(), "submit_bill started");

        let customer_rows = self.store.insert("customer", payload.customer_row()).await?;
        let Some(customer) = customer_rows.first() else {
            error!("customer insert returned no row");
            return Err(ServiceError::Validation("Failed to add customer".into()));
        };
        let customer_id = customer
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| ServiceError::Upstream("customer row missing id".into()))?;
        info!(customer_id, "customer inserted");

        let billing_rows = self
            .store
            .insert("billing", payload.billing_row(customer_id))
            .await?;
        let billing_id = billing_rows
            .first()
            .and_then(|r| r.get("id"))
            .and_then(Value::as_i64);
        info!(customer_id, ?billing_id, "billing row inserted");

        for (index, item) in payload.items.iter().enumerate() {
            if item.skips_stock_adjustment() {
                debug!(index, item_id = item.id, item_type = %item.item_type,
                    "skipping stock adjustment");
                continue;
            }
            if let Err(e) = self.reduce_quantity(item).await {
                error!(item_id = item.id, error = %e, "stock adjustment failed; continuing");
            }
        }

        Ok(BillReceipt {
            customer_id,
            billing_id,
            message:
                "Customer, billing data inserted and product quantities updated successfully."
                    .into(),
        })
    }

    /// Read-then-write decrement floored at zero. A missing product row is a
    /// warning, not an error.
    async fn reduce_quantity(&self, item: &LineItem) -> Result<(), StoreError> {
        let rows = self
            .store
            .select("products", "id, quantity", &[Filter::eq("id", item.id)])
            .await?;
        let Some(current) = rows
            .first()
            .and_then(|r| r.get("quantity"))
            .and_then(Value::as_i64)
        else {
            warn!(item_id = item.id, "product not found; skipping quantity reduction");
            return Ok(());
        };

        let new_quantity = (current - item.quantity).max(0);
        info!(item_id = item.id, current, new_quantity, "reducing product stock");
        self.store
            .update(
                "products",
                json!({ "quantity": new_quantity }),
                &[Filter::eq("id", item.id)],
            )
            .await?;
        Ok(())
    }

    /// Customers with a non-blank name, for `GET /api/get_customers`.
    pub async fn customers(&self) -> Result<Vec<Value>, ServiceError> {
        let rows = self
            .store
            .select("customer", "*", &[Filter::neq("name", "")])
            .await?;
        Ok(rows
            .into_iter()
            .filter(|r| {
                r.get("name")
                    .and_then(Value::as_str)
                    .map_or(false, |n| !n.trim().is_empty())
            })
            .collect())
    }
}
