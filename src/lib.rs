pub mod configuration;
pub mod domain;
pub mod mailer;
pub mod mailing_list_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
