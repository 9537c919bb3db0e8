use mua_api::startup::Application;
use mua_api::{configuration::get_configuration, telemetry::*};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("mua-api".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let host = configuration.application.host.clone();
    let application = Application::build(configuration).await?;
    tracing::info!(%host, port = application.port(), "Serving subscription and contact endpoints");

    application.run_until_stopped().await?;
    Ok(())
}
