//! Scope Config Repository

use blueprint_core::domain::entity::{EntitySet, EntityTag};
use blueprint_core::domain::source::ScopeConfig;
use serde_json::{Map, Value};
use sqlx::PgPool;

/// Find scope configs of one plugin by id
pub async fn find_many(
    pool: &PgPool,
    plugin: &str,
    ids: &[u64],
) -> Result<Vec<ScopeConfig>, sqlx::Error> {
    let ids: Vec<i64> = ids.iter().filter_map(|id| i64::try_from(*id).ok()).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, ScopeConfigRow>(
        r#"
        SELECT id, name, entities, refdiff, deployment_pattern, production_pattern
        FROM scope_configs
        WHERE plugin = $1 AND id = ANY($2)
        ORDER BY id
        "#,
    )
    .bind(plugin)
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ScopeConfig::try_from).collect()
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ScopeConfigRow {
    id: i64,
    name: String,
    entities: Vec<String>,
    refdiff: Option<Value>,
    deployment_pattern: Option<String>,
    production_pattern: Option<String>,
}

impl TryFrom<ScopeConfigRow> for ScopeConfig {
    type Error = sqlx::Error;

    fn try_from(row: ScopeConfigRow) -> Result<Self, Self::Error> {
        let entities = row
            .entities
            .iter()
            .map(|tag| tag.parse::<EntityTag>())
            .collect::<Result<EntitySet, _>>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(ScopeConfig {
            id: row.id as u64,
            name: row.name,
            entities,
            refdiff: refdiff_block(row.refdiff),
            deployment_pattern: row.deployment_pattern,
            production_pattern: row.production_pattern,
        })
    }
}

/// Only a JSON object counts as a refdiff block
fn refdiff_block(value: Option<Value>) -> Option<Map<String, Value>> {
    match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(entities: &[&str]) -> ScopeConfigRow {
        ScopeConfigRow {
            id: 3,
            name: "default".to_string(),
            entities: entities.iter().map(|s| s.to_string()).collect(),
            refdiff: Some(json!({"tagsLimit": 10})),
            deployment_pattern: None,
            production_pattern: Some("prod".to_string()),
        }
    }

    #[test]
    fn test_row_conversion() {
        let config = ScopeConfig::try_from(row(&["CODE", "CODE_REVIEW"])).unwrap();
        assert_eq!(config.id, 3);
        assert!(config.entities.contains(EntityTag::CodeReview));
        assert_eq!(config.refdiff.unwrap()["tagsLimit"], 10);
        assert_eq!(config.production_pattern.as_deref(), Some("prod"));
    }

    #[test]
    fn test_unknown_entity_is_a_decode_error() {
        let result = ScopeConfig::try_from(row(&["CODE", "WIKI"]));
        assert!(matches!(result, Err(sqlx::Error::Decode(_))));
    }

    #[test]
    fn test_non_object_refdiff_is_ignored() {
        assert!(refdiff_block(Some(json!(null))).is_none());
        assert!(refdiff_block(Some(json!([1, 2]))).is_none());
        assert!(refdiff_block(None).is_none());
    }
}
