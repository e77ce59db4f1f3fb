//! Persisted data model: reports and canonical loos.
//!
//! A [`Report`] is a single submitter's claim about a facility, immutable
//! once created. A [`Loo`] is the canonical record derived from one or
//! more reports; nothing on it is directly user-editable.
//!
//! The serialized shape matches the registry's document schema:
//! GeoJSON `geometry` objects, camelCase property names, and `None`
//! omitted (absence means "unknown", never "false").

mod geojson;
mod loo;
mod properties;
mod report;

pub use loo::Loo;
pub use properties::LooProperties;
pub use report::{Report, ReportDraft};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geohash::GeohashError;

/// Per-report trust bounds and default.
pub const MIN_TRUST: i8 = -1;
pub const MAX_TRUST: i8 = 10;
pub const DEFAULT_TRUST: i8 = 5;

/// Identifier of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a [`Loo`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LooId(String);

impl LooId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LooId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejections raised before any write happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A report must be attributed to a person or organisation
    #[error("attribution to a person or organisation is required")]
    EmptyAttribution,

    /// Geometry out of range or non-finite
    #[error(transparent)]
    Geometry(#[from] GeohashError),

    /// Trust outside the declared range
    #[error("trust {0} is outside {MIN_TRUST}..={MAX_TRUST}")]
    TrustOutOfRange(i8),
}
