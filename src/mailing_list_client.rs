use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::domain::SubscriberEmail;

pub struct MailingListClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    group_id: Option<u64>,
}

/// What the provider answered, status included. Non-2xx statuses are not
/// errors at this level.
#[derive(Debug)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ProviderResponse {
    pub fn is_created(&self) -> bool {
        matches!(self.status, 200 | 201)
    }
}

#[derive(Serialize)]
struct CreateSubscriberRequest<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<[u64; 1]>,
}

impl MailingListClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        group_id: Option<u64>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            api_key,
            group_id,
        })
    }

    #[tracing::instrument(
        name = "Create subscriber at mailing list provider",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    pub async fn create_subscriber(
        &self,
        email: &SubscriberEmail,
    ) -> Result<ProviderResponse, reqwest::Error> {
        let url = format!("{}/api/subscribers", self.base_url);
        let request_body = CreateSubscriberRequest {
            email: email.as_ref(),
            groups: self.group_id.map(|id| [id]),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        tracing::info!(provider_status = status, "Mailing list provider responded");
        Ok(ProviderResponse { status, body })
    }
}
