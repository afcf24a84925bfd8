use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Utc};
use tracing::warn;

use models::report::{BillDetail, BillRow, DateRange, ReportResponse, SummaryData};
use store::{Filter, TableStore};

use crate::errors::ServiceError;

/// Preset report windows selectable via the `report_type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for ReportKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ServiceError::Validation("Invalid report type".into())),
        }
    }
}

/// Half-open report window `[start, end_exclusive)`. `display_end` is the
/// inclusive end echoed back in `dateRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end_exclusive: NaiveDate,
    pub display_end: NaiveDate,
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// Window for a preset report kind, relative to `today`:
/// daily covers today, weekly runs from Monday of the current week, monthly
/// from the first of the month. All presets end after today.
pub fn window_for(kind: ReportKind, today: NaiveDate) -> Window {
    let start = match kind {
        ReportKind::Daily => today,
        ReportKind::Weekly => today
            .checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))
            .unwrap_or(today),
        ReportKind::Monthly => today.with_day(1).unwrap_or(today),
    };
    Window { start, end_exclusive: next_day(today), display_end: today }
}

/// Caller-supplied inclusive range, `%Y-%m-%d` on both ends. `dateRange.end`
/// still echoes today, for custom ranges as much as for presets.
pub fn custom_window(
    start_date: &str,
    end_date: &str,
    today: NaiveDate,
) -> Result<Window, ServiceError> {
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| ServiceError::Validation(format!("Invalid date: {s}")))
    };
    let start = parse(start_date)?;
    let end = parse(end_date)?;
    Ok(Window { start, end_exclusive: next_day(end), display_end: today })
}

/// Report aggregation and dashboard counts over the `billing` table.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn TableStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    async fn bills_in(&self, window: &Window) -> Result<Vec<BillDetail>, ServiceError> {
        let rows = self
            .store
            .select(
                "billing",
                "*",
                &[
                    Filter::gte("payment_date", window.start.to_string()),
                    Filter::lt("payment_date", window.end_exclusive.to_string()),
                ],
            )
            .await?;
        let mut bills = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<BillRow>(row) {
                Ok(bill) => bills.push(BillDetail::from(bill)),
                Err(e) => warn!(error = %e, "skipping undecodable billing row"),
            }
        }
        Ok(bills)
    }

    fn assemble(bills: Vec<BillDetail>, date_range: Option<DateRange>) -> ReportResponse {
        let total_sales = bills.iter().map(|b| b.total).sum();
        ReportResponse { total_sales, total_bills: bills.len(), bills, date_range }
    }

    /// `GET /api/get_daily_report`: today's bills, no `dateRange`.
    pub async fn daily_report(&self) -> Result<ReportResponse, ServiceError> {
        let window = window_for(ReportKind::Daily, Utc::now().date_naive());
        let bills = self.bills_in(&window).await?;
        Ok(Self::assemble(bills, None))
    }

    /// `GET /api/get_report`: preset or custom window, echoed in `dateRange`.
    pub async fn report(
        &self,
        report_type: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ReportResponse, ServiceError> {
        let today = Utc::now().date_naive();
        let window = match (start_date, end_date) {
            (Some(start), Some(end)) => custom_window(start, end, today)?,
            _ => window_for(report_type.parse()?, today),
        };
        let date_range = DateRange {
            start: window.start.to_string(),
            end: window.display_end.to_string(),
            report_type: report_type.to_string(),
        };
        let bills = self.bills_in(&window).await?;
        Ok(Self::assemble(bills, Some(date_range)))
    }

    /// `GET /api/get_summary_data`: four filtered counts, nothing more.
    pub async fn summary(&self) -> Result<SummaryData, ServiceError> {
        let today = Utc::now().date_naive();
        let tomorrow = next_day(today);

        let products = self.store.select("products", "id", &[]).await?;
        let services = self.store.select("services", "id", &[]).await?;
        let bills = self
            .store
            .select(
                "billing",
                "id",
                &[
                    Filter::gte("payment_date", today.to_string()),
                    Filter::lt("payment_date", tomorrow.to_string()),
                ],
            )
            .await?;
        let low_stock = self
            .store
            .select("products", "id", &[Filter::lt("quantity", 10)])
            .await?;

        Ok(SummaryData {
            total_products: products.len(),
            total_services: services.len(),
            total_bills: bills.len(),
            low_stock_count: low_stock.len(),
        })
    }
}
