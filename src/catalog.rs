//! Pass-through CRUD against the engine's metadata endpoints (projects,
//! instances, schema). Conventional REST verbs, same credential header and
//! error mapping as the data path; the gateway adds no semantics of its own
//! here.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Method;
use serde_json::{Value, json};

use crate::error::{GatewayError, Result};
use crate::gateway::Gateway;

/// Characters escaped when a table name is embedded in a URL path or query.
const TABLE_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=');

fn validate_id(id: u64, field: &str) -> Result<()> {
    if id == 0 {
        return Err(GatewayError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn validate_table(table: &str, field: &str) -> Result<()> {
    if table.is_empty() {
        return Err(GatewayError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn encode_table(table: &str) -> String {
    utf8_percent_encode(table, TABLE_SEGMENT).to_string()
}

impl Gateway {
    // =========================================================================
    // Projects
    // =========================================================================

    pub async fn list_projects(&self) -> Result<Value> {
        self.request(Method::GET, "/projects", None).await
    }

    pub async fn create_project(&self, project: &Value) -> Result<Value> {
        self.request(Method::POST, "/projects", Some(project)).await
    }

    pub async fn update_project(&self, id: u64, project: &Value) -> Result<Value> {
        validate_id(id, "id")?;
        self.request(Method::PUT, &format!("/projects/{id}"), Some(project))
            .await
    }

    pub async fn delete_project(&self, id: u64) -> Result<Value> {
        validate_id(id, "id")?;
        self.request(Method::DELETE, &format!("/projects/{id}"), None)
            .await
    }

    // =========================================================================
    // Instances
    // =========================================================================

    pub async fn list_instances(&self, project_id: u64) -> Result<Value> {
        validate_id(project_id, "project_id")?;
        self.request(
            Method::GET,
            &format!("/instances?project_id={project_id}"),
            None,
        )
        .await
    }

    pub async fn create_instance(&self, instance: &Value) -> Result<Value> {
        self.request(Method::POST, "/instances", Some(instance))
            .await
    }

    pub async fn update_instance(&self, id: u64, instance: &Value) -> Result<Value> {
        validate_id(id, "id")?;
        self.request(Method::PUT, &format!("/instances/{id}"), Some(instance))
            .await
    }

    pub async fn delete_instance(&self, id: u64) -> Result<Value> {
        validate_id(id, "id")?;
        self.request(Method::DELETE, &format!("/instances/{id}"), None)
            .await
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// Creates a table, optionally with indexes.
    pub async fn create_table(
        &self,
        project_id: u64,
        table_name: &str,
        columns: &Value,
        indexes: Option<&Value>,
    ) -> Result<Value> {
        validate_id(project_id, "project_id")?;
        validate_table(table_name, "table_name")?;
        self.request(
            Method::POST,
            "/schema/table",
            Some(&json!({
                "project_id": project_id,
                "table_name": table_name,
                "columns": columns,
                "indexes": indexes.cloned().unwrap_or_else(|| json!([])),
            })),
        )
        .await
    }

    /// Lists tables; `detailed` includes columns and indexes.
    pub async fn list_tables(&self, project_id: u64, detailed: bool) -> Result<Value> {
        validate_id(project_id, "project_id")?;
        let mut path = format!("/schema/tables?project_id={project_id}");
        if detailed {
            path.push_str("&detailed=true");
        }
        self.request(Method::GET, &path, None).await
    }

    /// Full details (columns, indexes) of one table.
    pub async fn table_details(&self, project_id: u64, table: &str) -> Result<Value> {
        validate_id(project_id, "project_id")?;
        validate_table(table, "table")?;
        self.request(
            Method::GET,
            &format!(
                "/schema/table/details?project_id={project_id}&table={}",
                encode_table(table)
            ),
            None,
        )
        .await
    }

    pub async fn drop_table(&self, project_id: u64, table: &str) -> Result<Value> {
        validate_id(project_id, "project_id")?;
        validate_table(table, "table")?;
        self.request(
            Method::DELETE,
            &format!("/schema/table/{project_id}/{}", encode_table(table)),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_percent_encoded() {
        assert_eq!(encode_table("produtos"), "produtos");
        assert_eq!(encode_table("minha tabela"), "minha%20tabela");
        assert_eq!(encode_table("a/b"), "a%2Fb");
        assert_eq!(encode_table("a&b=c"), "a%26b%3Dc");
    }
}
