//! Persistence-agnostic storage for reports and loos.
//!
//! Two narrow repository traits keep the engine decoupled from any
//! particular database: [`ReportStore`] is append-only, [`LooStore`] adds
//! an optimistic version check and a geohash-prefix scan. In-memory
//! implementations back the tests.

mod memory;
mod r#trait;
mod types;

pub use memory::{MemoryLooStore, MemoryReportStore};
pub use r#trait::{LooStore, ReportStore};
pub use types::StoreError;
