//! Business services over the hosted table store: catalog CRUD, the bill
//! submission sequence, and report aggregation. Each service owns an
//! `Arc<dyn TableStore>` so handlers stay free of store details and tests
//! can run against `store::MemoryStore`.

pub mod billing;
pub mod catalog;
pub mod errors;
pub mod report;
