use courses_service::config::Config;
use courses_service::services::init_metrics;
use courses_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::load()?;

    init_tracing(&config.service_name, &config.observability)?;
    init_metrics()?;

    tracing::info!(service = %config.service_name, "Starting service");

    let app = Application::build(config).await?;
    app.run_until_stopped().await
}
