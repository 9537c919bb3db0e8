use std::fmt::Debug;

use actix_web::{
    HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode, web,
};
use tracing::field::display;

use crate::domain::{CONTACT_SUBJECT, ContactForm, ContactMessage};
use crate::mailer::Mailer;

use super::error_chain_fmt;

#[tracing::instrument(
    name = "Forward contact form",
    skip(form, mailer),
    fields(contact_name = tracing::field::Empty, contact_email = tracing::field::Empty)
)]
pub async fn contact(
    web::Json(form): web::Json<ContactForm>,
    mailer: web::Data<dyn Mailer>,
) -> Result<HttpResponse, ContactError> {
    let message: ContactMessage = form.try_into().map_err(|_| ContactError::MissingFields)?;
    tracing::Span::current()
        .record("contact_name", display(message.name()))
        .record("contact_email", display(message.email()));

    mailer
        .send(CONTACT_SUBJECT, &message.text_body())
        .await
        .map_err(ContactError::SendFailed)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "message": "Email sent" })))
}

/// Any body that cannot be read as a contact form counts as missing fields.
pub fn contact_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::info!(error = %err, "Rejected unreadable contact form");
    ContactError::MissingFields.into()
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("Missing fields")]
    MissingFields,
    #[error("Failed to send the contact email")]
    SendFailed(#[source] anyhow::Error),
}

impl Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::SendFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            Self::MissingFields => self.to_string(),
            Self::SendFailed(e) => format!("{e:#}"),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": error }))
    }
}
