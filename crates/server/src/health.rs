use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use mathwhiz_core::SkillCatalog;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    catalog: Arc<SkillCatalog>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(catalog: Arc<SkillCatalog>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { catalog })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.catalog);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "mathwhiz-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(catalog: &SkillCatalog) -> HealthCheck {
    if catalog.facts.is_empty() || catalog.operators.is_empty() {
        return HealthCheck {
            status: "degraded",
            detail: format!(
                "catalog incomplete ({} facts, {} operator keywords)",
                catalog.facts.len(),
                catalog.operators.len()
            ),
        };
    }

    HealthCheck {
        status: "ready",
        detail: format!(
            "{} facts, {} operator keywords",
            catalog.facts.len(),
            catalog.operators.len()
        ),
    }
}
