//! Social identity provider HTTP client.

use async_trait::async_trait;
use reqwest::Client;

use callboard_core::UserId;

use crate::error::ClientError;
use crate::provider::IdentityProvider;
use crate::types::{IdentityEnvelope, UserIdentity};
use crate::ClientOptions;

/// Default API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "5.131";

/// Social identity provider API client.
#[derive(Debug, Clone)]
pub struct SocialIdentityClient {
    client: Client,
    base_url: String,
    access_token: String,
    api_version: String,
}

impl SocialIdentityClient {
    /// Create a new identity provider client.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or token is empty or the HTTP client cannot
    /// be built.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let access_token = access_token.into();

        if base_url.is_empty() {
            return Err(ClientError::Configuration("identity API URL is empty".into()));
        }
        if access_token.is_empty() {
            return Err(ClientError::Configuration(
                "identity access token is empty".into(),
            ));
        }

        Ok(Self {
            client: options.build_http_client()?,
            base_url,
            access_token,
            api_version: api_version.into(),
        })
    }

    /// Fetch profiles, surfacing every failure.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx responses, and provider error envelopes.
    pub async fn try_get_profiles(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserIdentity>, ClientError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/method/users.get", self.base_url);
        let ids = user_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("user_ids", ids.as_str()),
                ("fields", "photo_100"),
                ("access_token", self.access_token.as_str()),
                ("v", self.api_version.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let payload: serde_json::Value = response.json().await?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                payload,
            });
        }

        let envelope: IdentityEnvelope = serde_json::from_value(payload.clone())?;
        match (envelope.response, envelope.error) {
            (_, Some(error)) => {
                tracing::debug!(error = %error.error_msg, "Identity provider returned an error");
                Err(ClientError::UnexpectedResponse { payload })
            }
            (Some(profiles), None) => Ok(profiles),
            (None, None) => Err(ClientError::UnexpectedResponse { payload }),
        }
    }
}

#[async_trait]
impl IdentityProvider for SocialIdentityClient {
    async fn get_profiles(&self, user_ids: &[UserId]) -> Vec<UserIdentity> {
        match self.try_get_profiles(user_ids).await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!(error = %e, count = user_ids.len(), "Identity lookup failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> SocialIdentityClient {
        SocialIdentityClient::new(
            server.uri(),
            "token",
            DEFAULT_API_VERSION,
            ClientOptions::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn batches_ids_into_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/method/users.get"))
            .and(query_param("user_ids", "1,2"))
            .and(query_param("fields", "photo_100"))
            .and(query_param("access_token", "token"))
            .and(query_param("v", "5.131"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": [
                    {"id": 1, "first_name": "Ivan", "last_name": "Petrov", "photo_100": "a.jpg"},
                    {"id": 2, "first_name": "Olga", "last_name": "Smirnova"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let profiles = client(&server)
            .get_profiles(&[UserId::new(1), UserId::new(2)])
            .await;
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].display_name(), "Ivan Petrov");
        assert_eq!(profiles[1].id, UserId::new(2));
    }

    #[tokio::test]
    async fn provider_error_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/method/users.get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"error_code": 5, "error_msg": "User authorization failed"}
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(client.get_profiles(&[UserId::new(1)]).await.is_empty());
        assert!(matches!(
            client.try_get_profiles(&[UserId::new(1)]).await,
            Err(ClientError::UnexpectedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn http_failure_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({})))
            .mount(&server)
            .await;

        assert!(client(&server).get_profiles(&[UserId::new(1)]).await.is_empty());
    }

    #[tokio::test]
    async fn no_ids_means_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
            .expect(0)
            .mount(&server)
            .await;

        assert!(client(&server).get_profiles(&[]).await.is_empty());
    }
}
