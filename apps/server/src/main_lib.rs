use std::sync::Arc;

use crate::config::Config;
use ahorros_core::plans::{PlanService, PlanServiceTrait};
use ahorros_storage_sqlite::{db, PlanRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub plan_service: Arc<dyn PlanServiceTrait>,
}

/// Installs the global subscriber. `log` records from the library crates are
/// forwarded into it.
pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(pool.clone());

    let plan_repository = Arc::new(PlanRepository::new(pool, writer));
    let plan_service: Arc<dyn PlanServiceTrait> = Arc::new(PlanService::new(plan_repository));

    Ok(Arc::new(AppState { plan_service }))
}
