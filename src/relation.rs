//! Relation expansion — turns "table has many X" / "table relates to Y
//! through a pivot" shorthand into explicit join specifications.
//!
//! Expansion is pure data transformation over descriptor values: the base
//! descriptor is never mutated, and expander-added joins are always appended
//! after any joins the caller already declared.

use serde::{Deserialize, Serialize};

use crate::descriptor::{JoinSpec, JoinType, QueryDescriptor};
use crate::error::{GatewayError, Result};

/// Alias given to the main table by every expansion.
pub const MAIN_ALIAS: &str = "main";
/// Alias given to the related table in a one-to-many expansion.
pub const REL_ALIAS: &str = "rel";
/// Alias given to the pivot table in a many-to-many expansion.
pub const PIVOT_ALIAS: &str = "pivot";
/// Alias given to the target table in a many-to-many expansion.
pub const TARGET_ALIAS: &str = "target";

// =============================================================================
// Relation specs
// =============================================================================

/// One-to-many shorthand: each main row references one row of `table`
/// through `foreign_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneToMany {
    /// Related table to join.
    #[serde(default)]
    pub table: String,
    /// Column on the main table referencing `table`'s `id`.
    #[serde(default)]
    pub foreign_key: String,
    /// Related columns to project; defaults to all (`*`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<String>,
    /// Join type, LEFT unless overridden.
    #[serde(default)]
    pub join_type: JoinType,
}

impl OneToMany {
    pub fn new(table: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            foreign_key: foreign_key.into(),
            select: Vec::new(),
            join_type: JoinType::Left,
        }
    }

    /// Sets the related columns to project.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = columns.into_iter().map(Into::into).collect();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.table.is_empty() {
            return Err(GatewayError::validation("relation.table is required"));
        }
        if self.foreign_key.is_empty() {
            return Err(GatewayError::validation("relation.foreign_key is required"));
        }
        Ok(())
    }
}

/// Many-to-many shorthand: main rows relate to `target_table` rows through
/// `pivot_table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManyToMany {
    #[serde(default)]
    pub pivot_table: String,
    #[serde(default)]
    pub target_table: String,
    /// Pivot column referencing the main table's `id`.
    #[serde(default)]
    pub pivot_foreign_key: String,
    /// Pivot column referencing the target table's `id`.
    #[serde(default)]
    pub pivot_target_key: String,
}

impl ManyToMany {
    pub fn new(
        pivot_table: impl Into<String>,
        target_table: impl Into<String>,
        pivot_foreign_key: impl Into<String>,
        pivot_target_key: impl Into<String>,
    ) -> Self {
        Self {
            pivot_table: pivot_table.into(),
            target_table: target_table.into(),
            pivot_foreign_key: pivot_foreign_key.into(),
            pivot_target_key: pivot_target_key.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        for (value, field) in [
            (&self.pivot_table, "relation.pivot_table"),
            (&self.target_table, "relation.target_table"),
            (&self.pivot_foreign_key, "relation.pivot_foreign_key"),
            (&self.pivot_target_key, "relation.pivot_target_key"),
        ] {
            if value.is_empty() {
                return Err(GatewayError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Expansion
// =============================================================================

/// Expands a one-to-many spec onto `base`.
///
/// Produces a new descriptor with the main table aliased [`MAIN_ALIAS`], one
/// appended join of `spec.join_type` aliased [`REL_ALIAS`] on
/// `main.<foreign_key> = rel.id`, and the related columns projected with a
/// `rel_` prefix after the caller's own projection (or `main.*` when none
/// was declared).
pub fn expand_one_to_many(base: &QueryDescriptor, spec: &OneToMany) -> Result<QueryDescriptor> {
    spec.validate()?;

    let mut descriptor = base.clone();
    descriptor.alias = Some(MAIN_ALIAS.to_string());

    if descriptor.select.is_empty() {
        descriptor.select.push(format!("{MAIN_ALIAS}.*"));
    }
    let all_columns = ["*".to_string()];
    let columns: &[String] = if spec.select.is_empty() {
        &all_columns
    } else {
        &spec.select
    };
    for column in columns {
        descriptor
            .select
            .push(format!("{REL_ALIAS}.{column} as rel_{column}"));
    }

    descriptor.joins.push(JoinSpec::new(
        spec.join_type,
        spec.table.clone(),
        REL_ALIAS,
        format!("{MAIN_ALIAS}.{} = {REL_ALIAS}.id", spec.foreign_key),
    ));

    Ok(descriptor)
}

/// Expands a many-to-many spec onto `base`.
///
/// Produces a new descriptor with two appended LEFT joins in
/// pivot-then-target order, `group_by = "main.id"`, and aggregate
/// projections concatenating the target names and ids per main row.
pub fn expand_many_to_many(base: &QueryDescriptor, spec: &ManyToMany) -> Result<QueryDescriptor> {
    spec.validate()?;

    let mut descriptor = base.clone();
    descriptor.alias = Some(MAIN_ALIAS.to_string());

    if descriptor.select.is_empty() {
        descriptor.select.push(format!("{MAIN_ALIAS}.*"));
    }
    descriptor.select.push(format!(
        "GROUP_CONCAT({TARGET_ALIAS}.name SEPARATOR ', ') as related_names"
    ));
    descriptor
        .select
        .push(format!("GROUP_CONCAT({TARGET_ALIAS}.id) as related_ids"));

    descriptor.joins.push(JoinSpec::new(
        JoinType::Left,
        spec.pivot_table.clone(),
        PIVOT_ALIAS,
        format!("{MAIN_ALIAS}.id = {PIVOT_ALIAS}.{}", spec.pivot_foreign_key),
    ));
    descriptor.joins.push(JoinSpec::new(
        JoinType::Left,
        spec.target_table.clone(),
        TARGET_ALIAS,
        format!("{PIVOT_ALIAS}.{} = {TARGET_ALIAS}.id", spec.pivot_target_key),
    ));

    descriptor.group_by = Some(format!("{MAIN_ALIAS}.id"));

    Ok(descriptor)
}
