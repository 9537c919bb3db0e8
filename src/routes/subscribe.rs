use std::fmt::Debug;

use actix_web::{
    HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode, web,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::SubscriberEmail;
use crate::mailing_list_client::MailingListClient;

use super::error_chain_fmt;

#[derive(Deserialize)]
pub struct SubscriptionBody {
    email: String,
}

/// One entry of the `details` list returned with a 422.
#[derive(Serialize, Debug)]
pub struct FieldError {
    loc: Vec<String>,
    msg: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl FieldError {
    fn new(loc: &str, msg: impl ToString, kind: &'static str) -> Self {
        Self {
            loc: vec![loc.to_string()],
            msg: msg.to_string(),
            kind,
        }
    }
}

#[tracing::instrument(
    name = "Subscribe email to the mailing list",
    skip(body, client),
    fields(subscriber_email = %body.email)
)]
pub async fn subscribe(
    body: web::Json<SubscriptionBody>,
    client: web::Data<MailingListClient>,
) -> Result<HttpResponse, SubscribeError> {
    let email = SubscriberEmail::parse(&body.email)
        .map_err(|e| SubscribeError::InvalidInput(vec![FieldError::new("email", e, "value_error")]))?;

    let response = client
        .create_subscriber(&email)
        .await
        .context("Failed to reach the mailing list provider")?;

    if response.is_created() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Suscripción exitosa" })));
    }

    tracing::warn!(
        provider_status = response.status,
        provider_body = %response.body,
        "Mailing list provider rejected the subscription"
    );
    let status = StatusCode::from_u16(response.status)
        .context("Mailing list provider answered with an invalid status code")?;
    Err(SubscribeError::Rejected {
        status,
        details: response.body,
    })
}

/// Turns unreadable `/subscribe` bodies into the same 422 as a bad address.
pub fn subscribe_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    SubscribeError::InvalidInput(vec![payload_field_error(&err)]).into()
}

fn payload_field_error(err: &JsonPayloadError) -> FieldError {
    match err {
        JsonPayloadError::Deserialize(e) if e.is_data() => {
            let msg = e.to_string();
            if msg.starts_with("missing field `email`") {
                FieldError::new("email", "Field required", "missing")
            } else if msg.contains("expected a string") {
                FieldError::new("email", "Input should be a valid string", "string_type")
            } else {
                FieldError::new("body", msg, "value_error")
            }
        }
        _ => FieldError::new("body", err, "json_invalid"),
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Invalid input")]
    InvalidInput(Vec<FieldError>),
    #[error("Error al suscribirse")]
    Rejected {
        status: StatusCode,
        details: serde_json::Value,
    },
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::InvalidInput(details) => {
                serde_json::json!({ "error": self.to_string(), "details": details })
            }
            Self::Rejected { details, .. } => {
                serde_json::json!({ "error": self.to_string(), "details": details })
            }
            Self::UnexpectedError(e) => serde_json::json!({ "error": format!("{e:#}") }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
