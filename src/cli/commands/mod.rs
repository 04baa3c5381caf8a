//! CLI command implementations

pub mod alerts;
pub mod category;
pub mod completions;
pub mod dashboard;
pub mod init;
pub mod log;
pub mod product;
pub mod report;
pub mod stock;
pub mod utils;
pub mod validate;
