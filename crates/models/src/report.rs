use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::billing::LineItem;

/// Lenient view of a stored billing row; reports tolerate partial rows the
/// same way they tolerate loose items.
#[derive(Debug, Clone, Deserialize)]
pub struct BillRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub vehicle_no: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One bill in a report, with the embedded items split into product and
/// service subtotals.
#[derive(Debug, Clone, Serialize)]
pub struct BillDetail {
    pub id: Option<i64>,
    pub customer_id: Option<i64>,
    pub vehicle_no: Option<String>,
    pub payment_method: Option<String>,
    pub sub_total: f64,
    pub total: f64,
    pub payment_date: Option<String>,
    pub product_sales: f64,
    pub service_sales: f64,
    pub items: Vec<LineItem>,
}

impl From<BillRow> for BillDetail {
    fn from(row: BillRow) -> Self {
        let product_sales = row
            .items
            .iter()
            .filter(|i| i.is_product())
            .map(|i| i.total)
            .sum();
        let service_sales = row
            .items
            .iter()
            .filter(|i| i.is_service())
            .map(|i| i.total)
            .sum();
        Self {
            id: row.id,
            customer_id: row.customer_id,
            vehicle_no: row.vehicle_no,
            payment_method: row.payment_method,
            sub_total: row.sub_total,
            total: row.total,
            payment_date: row.payment_date,
            product_sales,
            service_sales,
            items: row.items,
        }
    }
}

/// Inclusive date range echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub report_type: String,
}

/// Response of `GET /api/get_report` and `GET /api/get_daily_report`
/// (the daily endpoint omits `dateRange`).
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    #[serde(rename = "totalSales")]
    pub total_sales: f64,
    #[serde(rename = "totalBills")]
    pub total_bills: usize,
    pub bills: Vec<BillDetail>,
    #[serde(rename = "dateRange", skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// Dashboard counts from `GET /api/get_summary_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryData {
    pub total_products: usize,
    pub total_services: usize,
    pub total_bills: usize,
    pub low_stock_count: usize,
}
