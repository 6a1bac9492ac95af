//! # datagate
//!
//! A gateway library for structured data access against a remote SQL
//! execution engine. Callers describe what they want — simple CRUD, joined
//! and aggregated selects, batch mutations — and the gateway validates the
//! request, normalizes it into a canonical [`QueryDescriptor`], and forwards
//! it over HTTP to the engine that owns storage and SQL generation. This
//! layer never touches storage itself.
//!
//! The pipeline: [`QueryBuilder`] (or a hand-built descriptor) →
//! [relation expansion](crate::relation) when a related-table shorthand is
//! used → [`Gateway`] attaches the shared credential, issues exactly one
//! outbound call, and maps the outcome into the [`GatewayError`] taxonomy
//! and the caller-facing [`ApiResponse`] envelope.

pub mod batch;
pub mod builder;
pub mod config;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod relation;

mod catalog;

// Re-export key types
pub use batch::{BatchInsertRequest, BatchUpdateRequest, UpdateOperation};
pub use builder::QueryBuilder;
pub use config::EngineConfig;
pub use descriptor::{JoinSpec, JoinType, QueryDescriptor};
pub use envelope::ApiResponse;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, INTERNAL_TOKEN_HEADER};
pub use relation::{ManyToMany, OneToMany};

/// Convenience re-exports for callers.
pub mod prelude {
    pub use crate::batch::{
        BatchInsertRequest, BatchUpdateRequest, UpdateOperation, prepare_insert, prepare_update,
    };
    pub use crate::builder::QueryBuilder;
    pub use crate::config::EngineConfig;
    pub use crate::descriptor::{JoinSpec, JoinType, QueryDescriptor};
    pub use crate::envelope::ApiResponse;
    pub use crate::error::{GatewayError, Result};
    pub use crate::gateway::Gateway;
    pub use crate::relation::{
        ManyToMany, OneToMany, expand_many_to_many, expand_one_to_many,
    };
}
