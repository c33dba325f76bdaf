//! dropwatch core
//!
//! Types shared by every dropwatch component.
//!
//! This crate provides:
//! - The canonical 36-field student feature schema and its value domains
//! - Feature vectors and the typed `StudentRecord` adapter
//! - Error types and result handling
//! - Display catalogs for category codes (rendering only)

pub mod catalog;
pub mod error;
pub mod record;
pub mod schema;
pub mod vector;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use record::StudentRecord;
pub use schema::{fields, FeatureSchema, FieldDomain, FieldSpec, FEATURE_COUNT};
pub use vector::{Feature, FeatureVector};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::record::StudentRecord;
    pub use crate::schema::{fields, FeatureSchema};
    pub use crate::vector::FeatureVector;
}
