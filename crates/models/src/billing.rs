use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Customer block inside a bill submission; field names follow the frontend
/// wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub mobile: String,
    #[serde(rename = "vehicleNumber")]
    pub vehicle_number: String,
    pub company: String,
}

/// One bill line, either a product or a service. Items arrive from the
/// frontend as loose objects, so every field defaults and unknown keys are
/// preserved through `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    /// Sentinel code for ad-hoc entries typed directly into the bill.
    pub const CUSTOM_CODE: &'static str = "CUSTOM";

    pub fn is_service(&self) -> bool {
        self.item_type == "service"
    }

    pub fn is_product(&self) -> bool {
        self.item_type == "product"
    }

    /// Services, ad-hoc entries (id 0) and custom-coded items have no
    /// product row behind them, so billing leaves stock alone.
    pub fn skips_stock_adjustment(&self) -> bool {
        self.is_service() || self.id == 0 || self.code == Self::CUSTOM_CODE
    }
}

/// Body of `POST /api/submit_bill`.
#[derive(Debug, Clone, Deserialize)]
pub struct BillPayload {
    pub date: DateTime<Utc>,
    pub customer: CustomerInfo,
    #[serde(default)]
    pub discount: f64,
    pub items: Vec<LineItem>,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    #[serde(rename = "subTotal")]
    pub sub_total: f64,
    pub total: f64,
}

impl BillPayload {
    /// Row for the `customer` table. The hosted schema spells the vehicle
    /// column `vehicel_no`.
    pub fn customer_row(&self) -> Value {
        json!({
            "name": self.customer.name,
            "mobile_no": self.customer.mobile,
            "vehicel_no": self.customer.vehicle_number,
            "company": self.customer.company,
            "payment": self.total,
            "payment_date": self.date.to_rfc3339(),
        })
    }

    /// Row for the `billing` table, embedding the item list verbatim.
    pub fn billing_row(&self, customer_id: i64) -> Value {
        json!({
            "customer_id": customer_id,
            "items": self.items,
            "payment_method": self.payment_method,
            "sub_total": self.sub_total,
            "total": self.total,
            "vehicle_no": self.customer.vehicle_number,
            "payment_date": self.date.to_rfc3339(),
        })
    }
}

/// Response of `POST /api/submit_bill`. `billing_id` stays null when the
/// billing insert returned no row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillReceipt {
    pub customer_id: i64,
    pub billing_id: Option<i64>,
    pub message: String,
}
