pub mod billing;
pub mod errors;
pub mod product;
pub mod report;
pub mod service;
