//! Universal Wallet Address synthesis for identity records
//!
//! This crate turns raw identifying fields of an entity into a deterministic,
//! human-readable token (the UWA):
//!
//! - **Catalog**: The fixed vocabulary of identity components
//! - **Inclusion matrix**: Which components are mandatory per entity type,
//!   with organization overrides on top of the shipped defaults
//! - **Schemes**: Per-entity-type head/tail extraction rules
//! - **Synthesis**: Validation against a profile, then token derivation
//! - **Formatting**: Chunked display of raw tokens
//! - **Store**: Identity records with create, update, delete, filter and import
//!
//! # Key Components
//!
//! - [`ComponentCatalog`]: Ordered, read-only list of identity components
//! - [`InclusionMatrix`]: Builds and edits [`EntityTypeProfile`]s
//! - [`UwaSynthesizer`]: Validates field sets and derives tokens
//! - [`ChunkFormatter`]: Splits tokens into delimiter-joined groups
//! - [`RecordStore`]: Thread-safe record collection with lazy filtered views
//!
//! # Example
//!
//! ```ignore
//! use uwa_core::{EntityType, FieldName, InclusionMatrix, RawFieldSet, UwaSynthesizer};
//!
//! let profile = InclusionMatrix::standard().default_profile(EntityType::VirtualMachine);
//! let fields = RawFieldSet::new()
//!     .with(FieldName::InstanceUuid, "1c-49ca-47ae-bebe-4087c52abbf4")
//!     .with(FieldName::Environment, "PR")
//!     .with(FieldName::OsName, "centosl");
//!
//! let token = UwaSynthesizer::new().synthesize(EntityType::VirtualMachine, &fields, &profile)?;
//! println!("{}", uwa_core::format_token(&token));
//! ```

pub mod catalog;
pub mod config;
pub mod extract;
pub mod format;
pub mod import;
pub mod matrix;
pub mod schemes;
pub mod store;
pub mod synthesis;
pub mod types;

// Re-export main types
pub use catalog::{CatalogError, ComponentCatalog, ComponentCategory, IdentityComponent};
pub use config::{ConfigError, UwaConfig};
pub use extract::ExtractionRule;
pub use format::{format_token, ChunkFormatter};
pub use import::ImportRow;
pub use matrix::{EntityTypeProfile, InclusionMatrix, MatrixError, OrganizationOverrides, ProfileSet};
pub use schemes::{scheme_for, SchemeProvider, SchemeStep};
pub use store::{
    FilterField, PersistenceHook, RecordEvent, RecordFilter, RecordStore, RecordView, StoreError,
    TextMatch,
};
pub use synthesis::{SynthesisError, UwaSynthesizer, DEFAULT_PREFIX};
pub use types::*;
