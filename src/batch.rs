//! Batch-operation contracts.
//!
//! The gateway validates batch shape and dispatches the whole ordered
//! sequence as one logical request; whatever atomicity the engine offers is
//! the engine's business, and partial failures are not retried per item.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::descriptor::validate_target;
use crate::error::{GatewayError, Result};

/// A validated multi-row insert, sent as one `/data/batch-insert` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchInsertRequest {
    pub project_id: u64,
    pub instance_id: u64,
    pub table: String,
    /// Independent rows, in the exact order they were submitted.
    pub data: Vec<Value>,
}

/// One conditional update within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOperation {
    pub data: Map<String, Value>,
    /// Equality filters selecting the rows to update. Must be non-empty:
    /// this layer never permits an unconditional mass update.
    #[serde(rename = "where", default)]
    pub filters: Map<String, Value>,
}

/// A validated multi-operation update, sent as one `/data/batch-update` call.
///
/// Operation order is preserved end to end — it is the order the engine is
/// expected to apply them, since later operations may touch rows earlier
/// ones changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdateRequest {
    pub project_id: u64,
    pub instance_id: u64,
    pub table: String,
    pub updates: Vec<UpdateOperation>,
}

/// Validates a batch insert: identifying triple present, `items` non-empty,
/// every item a row object. Item order is returned unchanged.
pub fn prepare_insert(
    project_id: u64,
    instance_id: u64,
    table: impl Into<String>,
    items: Vec<Value>,
) -> Result<BatchInsertRequest> {
    let table = table.into();
    validate_target(project_id, instance_id, &table)?;

    if items.is_empty() {
        return Err(GatewayError::validation("data must be a non-empty array"));
    }
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            return Err(GatewayError::Validation(format!(
                "data[{index}] must be a row object"
            )));
        }
    }

    Ok(BatchInsertRequest {
        project_id,
        instance_id,
        table,
        data: items,
    })
}

/// Validates a batch update: identifying triple present, `operations`
/// non-empty, every operation carrying data and a non-empty `where`.
/// Operation order is returned unchanged.
pub fn prepare_update(
    project_id: u64,
    instance_id: u64,
    table: impl Into<String>,
    operations: Vec<UpdateOperation>,
) -> Result<BatchUpdateRequest> {
    let table = table.into();
    validate_target(project_id, instance_id, &table)?;

    if operations.is_empty() {
        return Err(GatewayError::validation(
            "updates must be a non-empty array",
        ));
    }
    for (index, operation) in operations.iter().enumerate() {
        if operation.data.is_empty() {
            return Err(GatewayError::Validation(format!(
                "updates[{index}].data must be non-empty"
            )));
        }
        if operation.filters.is_empty() {
            return Err(GatewayError::Validation(format!(
                "updates[{index}].where must be non-empty"
            )));
        }
    }

    Ok(BatchUpdateRequest {
        project_id,
        instance_id,
        table,
        updates: operations,
    })
}
