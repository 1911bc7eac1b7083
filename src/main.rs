use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, config_from_env, router};
use cardio_core::constants::DEFAULT_REST_ADDR;

/// Main entry point for the cardio expert system
///
/// Loads and validates the rule table, then serves the REST API on port 3000 (configurable
/// via CARDIO_REST_ADDR). A malformed rule table stops startup.
///
/// # Environment Variables
/// - `CARDIO_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CARDIO_RULES_FILE`: YAML rule table replacing the built-in rules
/// - `CARDIO_CATALOG`: questionnaire catalog, `questionnaire` (default) or `rules`
/// - `CARDIO_MAX_PASSES`: matcher pass limit override
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cardio_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("cardio_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("CARDIO_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = config_from_env()?;
    tracing::info!(
        rules = ?cfg.rule_source(),
        catalog = ?cfg.catalog_mode(),
        "resolved configuration"
    );
    let state = AppState::from_config(&cfg)?;

    tracing::info!("++ Starting cardio REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
