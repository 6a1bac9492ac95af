//! Single entry/exit point to the remote execution engine.
//!
//! One client request maps to exactly one outbound HTTP call: no implicit
//! retries, no request coalescing. Transport and upstream failures are
//! converted to [`GatewayError`] at this boundary and never crash the
//! process.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::batch::{BatchInsertRequest, BatchUpdateRequest};
use crate::config::EngineConfig;
use crate::descriptor::{QueryDescriptor, validate_target};
use crate::envelope::unwrap_data;
use crate::error::{GatewayError, Result};
use crate::relation::{ManyToMany, OneToMany, expand_many_to_many, expand_one_to_many};

/// Header carrying the shared secret on every outbound call.
pub const INTERNAL_TOKEN_HEADER: &str = "X-Internal-Token";

/// Gateway to the execution engine.
///
/// Holds the read-only [`EngineConfig`] and a shared HTTP client; cloning is
/// cheap (`reqwest::Client` is internally reference-counted) and the value
/// is `Send + Sync`, so one instance serves all request handlers.
#[derive(Debug, Clone)]
pub struct Gateway {
    config: EngineConfig,
    http: reqwest::Client,
}

impl Gateway {
    /// Creates a gateway whose outbound calls are bounded by
    /// `config.timeout`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Transport)?;
        Ok(Self { config, http })
    }

    /// The configuration this gateway was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks a caller-supplied API key against the configured set.
    ///
    /// Runs before any descriptor is built; a missing or unknown key is
    /// rejected with [`GatewayError::Auth`].
    pub fn authorize(&self, key: Option<&str>) -> Result<()> {
        match key {
            Some(key) if self.config.api_keys.iter().any(|k| k == key) => Ok(()),
            _ => Err(GatewayError::Auth),
        }
    }

    // =========================================================================
    // Simple CRUD
    // =========================================================================

    /// Inserts a single row. `data` must be a row object.
    pub async fn insert(
        &self,
        project_id: u64,
        instance_id: u64,
        table: &str,
        data: Value,
    ) -> Result<Value> {
        validate_target(project_id, instance_id, table)?;
        if !data.is_object() {
            return Err(GatewayError::validation("data must be a row object"));
        }
        self.post(
            "/data/insert",
            &json!({
                "project_id": project_id,
                "instance_id": instance_id,
                "table": table,
                "data": data,
            }),
        )
        .await
    }

    /// Fetches rows matching the equality filters (all rows when empty).
    pub async fn get(
        &self,
        project_id: u64,
        instance_id: u64,
        table: &str,
        filters: Map<String, Value>,
    ) -> Result<Value> {
        validate_target(project_id, instance_id, table)?;
        self.post(
            "/data/get",
            &json!({
                "project_id": project_id,
                "instance_id": instance_id,
                "table": table,
                "filters": filters,
            }),
        )
        .await
    }

    /// Updates a single row by id.
    pub async fn update(
        &self,
        project_id: u64,
        instance_id: u64,
        table: &str,
        id: u64,
        data: Value,
    ) -> Result<Value> {
        validate_target(project_id, instance_id, table)?;
        if id == 0 {
            return Err(GatewayError::validation("id is required"));
        }
        if !data.is_object() {
            return Err(GatewayError::validation("data must be a row object"));
        }
        self.post(
            "/data/update",
            &json!({
                "project_id": project_id,
                "instance_id": instance_id,
                "table": table,
                "id": id,
                "data": data,
            }),
        )
        .await
    }

    /// Deletes a single row by id.
    pub async fn delete(
        &self,
        project_id: u64,
        instance_id: u64,
        table: &str,
        id: u64,
    ) -> Result<Value> {
        validate_target(project_id, instance_id, table)?;
        if id == 0 {
            return Err(GatewayError::validation("id is required"));
        }
        self.post(
            "/data/delete",
            &json!({
                "project_id": project_id,
                "instance_id": instance_id,
                "table": table,
                "id": id,
            }),
        )
        .await
    }

    // =========================================================================
    // Advanced queries
    // =========================================================================

    /// Forwards a full descriptor to `/data/advanced-select`.
    ///
    /// The descriptor is serialized as-is; the gateway never inspects or
    /// rewrites row contents.
    pub async fn advanced_select(&self, descriptor: &QueryDescriptor) -> Result<Value> {
        descriptor.validate()?;
        self.post("/data/advanced-select", descriptor).await
    }

    /// Expands a one-to-many relation onto `base` and executes it.
    pub async fn relation_one_to_many(
        &self,
        base: &QueryDescriptor,
        spec: &OneToMany,
    ) -> Result<Value> {
        let descriptor = expand_one_to_many(base, spec)?;
        self.advanced_select(&descriptor).await
    }

    /// Expands a many-to-many relation onto `base` and executes it.
    pub async fn relation_many_to_many(
        &self,
        base: &QueryDescriptor,
        spec: &ManyToMany,
    ) -> Result<Value> {
        let descriptor = expand_many_to_many(base, spec)?;
        self.advanced_select(&descriptor).await
    }

    // =========================================================================
    // Batch operations
    // =========================================================================

    /// Dispatches a prepared batch insert as one call carrying the full
    /// ordered item sequence.
    pub async fn batch_insert(&self, request: &BatchInsertRequest) -> Result<Value> {
        self.post("/data/batch-insert", request).await
    }

    /// Dispatches a prepared batch update as one call carrying the full
    /// ordered operation sequence.
    pub async fn batch_update(&self, request: &BatchUpdateRequest) -> Result<Value> {
        self.post("/data/batch-update", request).await
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let body = serde_json::to_value(body).map_err(|err| {
            GatewayError::Validation(format!("unserializable request body: {err}"))
        })?;
        self.request(Method::POST, path, Some(&body)).await
    }

    /// Issues one outbound call and maps the outcome:
    /// connect/timeout failure → [`GatewayError::Transport`], non-success
    /// status → [`GatewayError::Upstream`] with the body forwarded, success
    /// → payload with one level of `data` nesting unwrapped.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(%method, %url, "forwarding request to execution engine");

        let mut request = self
            .http
            .request(method, &url)
            .header(INTERNAL_TOKEN_HEADER, &self.config.internal_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            tracing::error!(%url, error = %err, "execution engine unreachable");
            GatewayError::Transport(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body, status.as_u16());
            tracing::warn!(%url, status = status.as_u16(), %message, "execution engine reported failure");
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let payload = response.json().await.map_err(|err| {
            tracing::error!(%url, error = %err, "malformed response from execution engine");
            GatewayError::Transport(err)
        })?;
        Ok(unwrap_data(payload))
    }
}

/// Extracts the upstream error message: the `message`/`error` field when the
/// body is a JSON envelope, the raw body otherwise.
fn upstream_message(body: &str, status: u16) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    if body.is_empty() {
        format!("execution engine returned status {status}")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_prefers_envelope_fields() {
        assert_eq!(
            upstream_message(r#"{"success":false,"message":"bad column"}"#, 500),
            "bad column"
        );
        assert_eq!(upstream_message("duplicate key", 409), "duplicate key");
        assert_eq!(
            upstream_message("", 502),
            "execution engine returned status 502"
        );
    }
}
