//! Core module - fundamental types and utilities

pub mod activity;
pub mod alerts;
pub mod classify;
pub mod clock;
pub mod config;
pub mod entity;
pub mod identity;
pub mod journal;
pub mod pagination;
pub mod project;
pub mod report;
pub mod role;
pub mod shortid;
pub mod stats;
pub mod stock;
pub mod store;

pub use activity::{ActivityFilter, ActivityLogger, NewActivity};
pub use classify::{
    classify_expiration, classify_stock, rank_urgency, AlertKind, Classifiable, ExpirationStatus,
    ProductSnapshot, Ranked, StockStatus, ValidationError,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use entity::Entity;
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use journal::{Journal, JournalError};
pub use project::{Project, ProjectError};
pub use report::{ReportError, ReportFormat};
pub use role::{Action, PermissionError, Role};
pub use shortid::ShortIdIndex;
pub use stock::StockError;
pub use store::{ProductStore, StoreError, StoredProduct};
