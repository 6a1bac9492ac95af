//! Fluent builder over one [`QueryDescriptor`] — pure accumulation, no I/O.

use serde_json::{Map, Value};

use crate::descriptor::{JoinSpec, JoinType, QueryDescriptor};
use crate::error::{GatewayError, Result};
use crate::gateway::Gateway;

/// Incremental, chainable accumulator over one [`QueryDescriptor`].
///
/// Every mutator consumes and returns the builder, so a finished descriptor
/// is obtained exactly once: [`build`](Self::build) (and
/// [`execute`](Self::execute)) take the builder by value and it cannot be
/// reused afterwards.
///
/// ```
/// use datagate::prelude::*;
///
/// let descriptor = QueryBuilder::new(1, 10, "orders")
///     .alias("o")
///     .select(["o.*", "c.name as customer_name"])
///     .left_join("customers", "c", "o.customer_id = c.id")
///     .where_eq("o.status", "active")
///     .order_by("o.created_at DESC")
///     .limit(50)
///     .build()
///     .unwrap();
/// assert_eq!(descriptor.joins.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    descriptor: QueryDescriptor,
}

impl QueryBuilder {
    /// Starts a builder for the given target triple.
    pub fn new(project_id: u64, instance_id: u64, table: impl Into<String>) -> Self {
        Self {
            descriptor: QueryDescriptor::new(project_id, instance_id, table),
        }
    }

    /// Replaces the projection list.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptor.select = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the main table alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.descriptor.alias = Some(alias.into());
        self
    }

    /// Appends a join clause. Join order on the wire is call order.
    pub fn join(
        mut self,
        kind: JoinType,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        self.descriptor
            .joins
            .push(JoinSpec::new(kind, table, alias, on));
        self
    }

    /// Appends an INNER join.
    pub fn inner_join(
        self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        self.join(JoinType::Inner, table, alias, on)
    }

    /// Appends a LEFT join.
    pub fn left_join(
        self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        self.join(JoinType::Left, table, alias, on)
    }

    /// Appends a RIGHT join.
    pub fn right_join(
        self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        self.join(JoinType::Right, table, alias, on)
    }

    /// Shallow-merges equality filters into the WHERE map. Keys already
    /// present are overwritten by the incoming set; sibling keys survive.
    pub fn merge_where(mut self, filters: Map<String, Value>) -> Self {
        for (column, value) in filters {
            self.descriptor.filters.insert(column, value);
        }
        self
    }

    /// Adds a single equality filter.
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.descriptor.filters.insert(column.into(), value.into());
        self
    }

    /// Sets the raw WHERE expression, passed to the engine verbatim and
    /// ANDed with the equality filters.
    pub fn where_raw(mut self, condition: impl Into<String>) -> Self {
        self.descriptor.where_raw = Some(condition.into());
        self
    }

    /// Sets ORDER BY (verbatim expression).
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.descriptor.order_by = Some(order.into());
        self
    }

    /// Sets GROUP BY (verbatim expression).
    pub fn group_by(mut self, group: impl Into<String>) -> Self {
        self.descriptor.group_by = Some(group.into());
        self
    }

    /// Sets HAVING (verbatim expression).
    pub fn having(mut self, condition: impl Into<String>) -> Self {
        self.descriptor.having = Some(condition.into());
        self
    }

    /// Sets LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.descriptor.limit = Some(limit);
        self
    }

    /// Sets OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.descriptor.offset = Some(offset);
        self
    }

    /// Pagination sugar: `limit = per_page`, `offset = (page - 1) * per_page`.
    ///
    /// `page` and `per_page` must both be at least 1.
    pub fn paginate(mut self, page: u64, per_page: u64) -> Result<Self> {
        if page < 1 {
            return Err(GatewayError::validation("page must be >= 1"));
        }
        if per_page < 1 {
            return Err(GatewayError::validation("per_page must be >= 1"));
        }
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| GatewayError::validation("page * per_page is out of range"))?;
        self.descriptor.limit = Some(per_page);
        self.descriptor.offset = Some(offset);
        Ok(self)
    }

    /// Validates and yields the finished descriptor, consuming the builder.
    pub fn build(self) -> Result<QueryDescriptor> {
        self.descriptor.validate()?;
        Ok(self.descriptor)
    }

    /// Builds the descriptor and forwards it to the execution engine via
    /// [`Gateway::advanced_select`].
    pub async fn execute(self, gateway: &Gateway) -> Result<Value> {
        let descriptor = self.build()?;
        gateway.advanced_select(&descriptor).await
    }
}
