//! Canonical query descriptor — the engine-agnostic representation of one
//! read query, serialized verbatim as the `/data/advanced-select` body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GatewayError, Result};

// =============================================================================
// Join types
// =============================================================================

/// The type of JOIN operation supported by the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
    #[default]
    Left,
    Right,
}

/// One join clause within a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    #[serde(rename = "type", default)]
    pub kind: JoinType,
    pub table: String,
    pub alias: String,
    /// Engine-native join condition, e.g. `"p.cliente_id = c.id"`.
    pub on: String,
}

impl JoinSpec {
    pub fn new(
        kind: JoinType,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            alias: alias.into(),
            on: on.into(),
        }
    }
}

// =============================================================================
// QueryDescriptor
// =============================================================================

/// Canonical representation of one data-access intent.
///
/// Built per request (by hand or via [`QueryBuilder`](crate::QueryBuilder)),
/// immutable once handed to the execution engine, discarded after the
/// response is returned. Sequences preserve declaration order; join order
/// on the wire is exactly the order joins were added.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryDescriptor {
    #[serde(default)]
    pub project_id: u64,
    #[serde(default)]
    pub instance_id: u64,
    #[serde(default)]
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Columns/expressions to project; empty means all columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinSpec>,
    /// Equality filters, combined with implicit AND.
    #[serde(rename = "where", default, skip_serializing_if = "Map::is_empty")]
    pub filters: Map<String, Value>,
    /// Engine-native boolean expression, ANDed with `filters` by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl QueryDescriptor {
    /// Creates a descriptor with the required identifying fields and
    /// builder defaults everywhere else.
    pub fn new(project_id: u64, instance_id: u64, table: impl Into<String>) -> Self {
        Self {
            project_id,
            instance_id,
            table: table.into(),
            ..Self::default()
        }
    }

    /// Checks the descriptor invariant: `project_id`, `instance_id` and
    /// `table` must be present before the descriptor crosses the gateway
    /// boundary.
    pub fn validate(&self) -> Result<()> {
        validate_target(self.project_id, self.instance_id, &self.table)
    }
}

/// Shared check for the identifying triple carried by every request shape.
pub(crate) fn validate_target(project_id: u64, instance_id: u64, table: &str) -> Result<()> {
    if project_id == 0 {
        return Err(GatewayError::validation("project_id is required"));
    }
    if instance_id == 0 {
        return Err(GatewayError::validation("instance_id is required"));
    }
    if table.is_empty() {
        return Err(GatewayError::validation("table is required"));
    }
    Ok(())
}
