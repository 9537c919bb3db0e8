use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    dev::Server,
    web::{self, Data},
};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::configuration::{MailingListSettings, Settings};
use crate::mailer::{Mailer, SmtpMailer};
use crate::mailing_list_client::MailingListClient;
use crate::routes::{contact, contact_payload_error, ping, subscribe, subscribe_payload_error};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let mailer = SmtpMailer::from_settings(&configuration.smtp)?;
        Self::build_with_mailer(configuration, Arc::new(mailer)).await
    }

    /// Same as [`Application::build`] but delivers contact emails through `mailer`.
    pub async fn build_with_mailer(
        configuration: Settings,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, anyhow::Error> {
        let mailing_list_client = get_mailing_list_client(&configuration.mailing_list)?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind to {address}"))?;
        let port = listener.local_addr()?.port();
        let server = run(listener, mailing_list_client, mailer)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_mailing_list_client(
    settings: &MailingListSettings,
) -> Result<MailingListClient, anyhow::Error> {
    let group_id = settings
        .group_id()
        .context("The mailing list group id must be numeric")?;
    let client = MailingListClient::new(
        settings.base_url.clone(),
        settings.api_key.clone(),
        group_id,
        settings.timeout(),
    )?;
    Ok(client)
}

pub fn run(
    listener: TcpListener,
    mailing_list_client: MailingListClient,
    mailer: Arc<dyn Mailer>,
) -> Result<Server, std::io::Error> {
    let mailing_list_client = Data::new(mailing_list_client);
    let mailer: Data<dyn Mailer> = Data::from(mailer);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/ping", web::get().to(ping))
            .service(
                web::resource("/subscribe")
                    .app_data(web::JsonConfig::default().error_handler(subscribe_payload_error))
                    .route(web::post().to(subscribe)),
            )
            .service(
                web::resource("/contact")
                    .app_data(web::JsonConfig::default().error_handler(contact_payload_error))
                    .route(web::post().to(contact)),
            )
            .app_data(mailing_list_client.clone())
            .app_data(mailer.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
