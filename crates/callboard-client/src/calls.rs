//! Call provider HTTP client.

use async_trait::async_trait;
use reqwest::Client;

use callboard_core::{CallId, CallRequest};

use crate::error::ClientError;
use crate::provider::CallProvider;
use crate::types::{CallDetail, CallPlacement, CancelCall, PlaceCallForm, RemoveCallForm};
use crate::ClientOptions;

/// Call provider API client.
///
/// Every request carries the account's public key. Writes are form-encoded,
/// reads use query parameters.
#[derive(Debug, Clone)]
pub struct CallApiClient {
    client: Client,
    base_url: String,
    public_key: String,
}

impl CallApiClient {
    /// Create a new call provider client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root (e.g., `"https://calls.example.com/api/v1"`)
    /// * `public_key` - account public key
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or key is empty or the HTTP client cannot
    /// be built.
    pub fn new(
        base_url: impl Into<String>,
        public_key: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let public_key = public_key.into();

        if base_url.is_empty() {
            return Err(ClientError::Configuration("call API URL is empty".into()));
        }
        if public_key.is_empty() {
            return Err(ClientError::Configuration(
                "call API public key is empty".into(),
            ));
        }

        Ok(Self {
            client: options.build_http_client()?,
            base_url,
            public_key,
        })
    }

    /// Turn a response into JSON, mapping non-2xx statuses to [`ClientError::Api`].
    async fn handle_response(response: reqwest::Response) -> Result<serde_json::Value, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        let payload = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));

        if status.is_success() {
            Ok(payload)
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                payload,
            })
        }
    }
}

#[async_trait]
impl CallProvider for CallApiClient {
    async fn place_call(&self, request: &CallRequest) -> Result<CallPlacement, ClientError> {
        let url = format!("{}/phones/call/", self.base_url);
        let form = PlaceCallForm {
            public_key: &self.public_key,
            phone: &request.phone,
            campaign_id: &request.campaign_id,
            max_call_time: request.max_call_seconds,
            text: &request.script,
        };

        tracing::debug!(
            user_id = %request.user_id,
            campaign_id = %request.campaign_id,
            max_call_time = request.max_call_seconds,
            "Placing call"
        );

        let response = self.client.post(&url).form(&form).send().await?;
        let payload = Self::handle_response(response).await?;

        match payload.get("call_id").and_then(CallId::from_json) {
            Some(call_id) => Ok(CallPlacement { call_id, payload }),
            None => Err(ClientError::MissingCallId { payload }),
        }
    }

    async fn fetch_call_detail(&self, call_id: &CallId) -> Result<CallDetail, ClientError> {
        let url = format!("{}/phones/call_by_id/", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("public_key", self.public_key.as_str()),
                ("call_id", call_id.as_str()),
                ("expand", "1"),
            ])
            .send()
            .await?;
        let payload = Self::handle_response(response).await?;

        let Some(call_info) = payload.as_array().and_then(|calls| calls.first()).cloned() else {
            return Err(ClientError::UnexpectedResponse { payload });
        };

        let record_url = call_info
            .get("recorded_audio")
            .and_then(serde_json::Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(CallDetail {
            call_info,
            record_url,
        })
    }

    async fn cancel_call(&self, cancel: &CancelCall) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/phones/remove_call/", self.base_url);
        let form = RemoveCallForm {
            public_key: &self.public_key,
            call_id: &cancel.call_id,
            phone: &cancel.phone,
            campaign_id: &cancel.campaign_id,
        };

        tracing::debug!(call_id = %cancel.call_id, "Cancelling call");

        let response = self.client.post(&url).form(&form).send().await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callboard_core::UserId;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CallRequest {
        CallRequest {
            user_id: UserId::new(42),
            phone: "79990000000".to_string(),
            campaign_id: "555".to_string(),
            max_call_seconds: 120,
            script: "Hello".to_string(),
            category: "girls".to_string(),
        }
    }

    async fn client(server: &MockServer) -> CallApiClient {
        CallApiClient::new(server.uri(), "pk-test", ClientOptions::default()).unwrap()
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client =
            CallApiClient::new("http://localhost:8080/", "pk", ClientOptions::default()).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn empty_key_is_rejected() {
        let result = CallApiClient::new("http://localhost:8080", "", ClientOptions::default());
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[tokio::test]
    async fn place_call_sends_form_and_returns_call_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/phones/call/"))
            .and(body_string_contains("public_key=pk-test"))
            .and(body_string_contains("phone=79990000000"))
            .and(body_string_contains("max_call_time=120"))
            .and(body_string_contains("text=Hello"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"call_id": 987, "status": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let placement = client(&server).await.place_call(&request()).await.unwrap();
        assert_eq!(placement.call_id, CallId::new("987"));
        assert_eq!(placement.payload["status"], "ok");
    }

    #[tokio::test]
    async fn place_call_without_call_id_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/phones/call/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
            .mount(&server)
            .await;

        let err = client(&server).await.place_call(&request()).await.unwrap_err();
        match err {
            ClientError::MissingCallId { payload } => assert_eq!(payload["status"], "queued"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn place_call_surfaces_provider_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/phones/call/"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "bad key"})))
            .mount(&server)
            .await;

        let err = client(&server).await.place_call(&request()).await.unwrap_err();
        match err {
            ClientError::Api { status, payload } => {
                assert_eq!(status, 403);
                assert_eq!(payload["detail"], "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_as_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/phones/call/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway down"))
            .mount(&server)
            .await;

        let err = client(&server).await.place_call(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { status: 500, payload } if payload == json!("gateway down")
        ));
    }

    #[tokio::test]
    async fn fetch_call_detail_takes_first_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/phones/call_by_id/"))
            .and(query_param("public_key", "pk-test"))
            .and(query_param("call_id", "987"))
            .and(query_param("expand", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"call_id": 987, "recorded_audio": "https://rec.example.com/987.mp3"},
                {"call_id": 988}
            ])))
            .mount(&server)
            .await;

        let detail = client(&server)
            .await
            .fetch_call_detail(&CallId::new("987"))
            .await
            .unwrap();
        assert_eq!(
            detail.record_url.as_deref(),
            Some("https://rec.example.com/987.mp3")
        );
        assert_eq!(detail.call_info["call_id"], 987);
    }

    #[tokio::test]
    async fn fetch_call_detail_rejects_objects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/phones/call_by_id/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .fetch_call_detail(&CallId::new("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse { .. }));
    }

    #[tokio::test]
    async fn cancel_call_returns_acknowledgement() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/phones/remove_call/"))
            .and(body_string_contains("call_id=987"))
            .and(body_string_contains("campaign_id=555"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "removed"})))
            .mount(&server)
            .await;

        let ack = client(&server)
            .await
            .cancel_call(&CancelCall {
                call_id: "987".into(),
                phone: "79990000000".into(),
                campaign_id: "555".into(),
            })
            .await
            .unwrap();
        assert_eq!(ack["status"], "removed");
    }
}
