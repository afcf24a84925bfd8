use std::sync::Arc;

use service::billing::BillingService;
use service::catalog::CatalogService;
use service::report::ReportService;
use store::TableStore;

/// Shared handler state: one service per concern, all over the same store.
#[derive(Clone)]
pub struct ServerState {
    pub catalog: CatalogService,
    pub billing: BillingService,
    pub reports: ReportService,
}

impl ServerState {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            catalog: CatalogService::new(Arc::clone(&store)),
            billing: BillingService::new(Arc::clone(&store)),
            reports: ReportService::new(store),
        }
    }
}
