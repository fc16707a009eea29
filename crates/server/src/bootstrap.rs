use std::sync::Arc;

use mathwhiz_core::{
    config::{AppConfig, ConfigError},
    SkillCatalog,
};
use mathwhiz_skill::SkillDispatcher;
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<SkillCatalog>,
    pub dispatcher: Arc<SkillDispatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Freezes the catalog and builds the dispatcher once; both are shared read-only afterwards.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Arc::new(config.catalog()?);
    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        fact_count = catalog.facts.len(),
        operator_keywords = catalog.operators.len(),
        "skill catalog frozen"
    );

    let dispatcher =
        Arc::new(SkillDispatcher::new(config.skill.application_id.clone(), Arc::clone(&catalog)));

    Ok(Application { config, catalog, dispatcher })
}
