//! HTTP client for the property-document backend.
//!
//! Wraps the REST endpoints (auth, properties, documents, permissions,
//! plans, alerts) using [`reqwest`] with bearer-token authentication.

use std::collections::BTreeMap;

use propdocs_core::models::{
    Alert, CreatePropertyInput, Document, Property, PropertyPermission, ShareInput, User,
};
use propdocs_core::plans::SubscriptionPlanDto;
use propdocs_core::types::EntityId;
use propdocs_core::upload::{ConfirmUpload, UploadRequest, UploadTicket};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::backend::PropertyBackend;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Response from `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct FieldsBody<'a> {
    fields: &'a BTreeMap<String, String>,
}

/// HTTP client for one backend deployment.
#[derive(Debug, Clone)]
pub struct PropDocsApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PropDocsApi {
    /// Build a client from configuration, applying the request timeout.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone(), config.token.clone()))
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: String, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Replace the bearer token, e.g. after [`login`](Self::login).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Sends `POST /auth/login`. The returned token is not stored; call
    /// [`with_token`](Self::with_token) to use it.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        tracing::debug!(email, "Logging in");
        let response = self
            .client
            .post(self.url("auth/login"))
            .json(&LoginBody { email, password })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`ClientError::Api`] containing the status
    /// and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Backend returned an error status");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> ClientResult<()> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

impl PropertyBackend for PropDocsApi {
    async fn current_user(&self) -> ClientResult<User> {
        let response = self.request(Method::GET, "users/me").send().await?;
        Self::parse_response(response).await
    }

    async fn current_subscription(&self) -> ClientResult<Option<SubscriptionPlanDto>> {
        let response = self
            .request(Method::GET, "subscriptions/current")
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND
            || response.status() == StatusCode::NO_CONTENT
        {
            return Ok(None);
        }
        Self::parse_response(response).await
    }

    async fn list_plans(&self) -> ClientResult<Vec<SubscriptionPlanDto>> {
        let response = self.request(Method::GET, "subscription-plans").send().await?;
        Self::parse_response(response).await
    }

    async fn list_properties(&self) -> ClientResult<Vec<Property>> {
        let response = self.request(Method::GET, "properties").send().await?;
        Self::parse_response(response).await
    }

    async fn get_property(&self, id: EntityId) -> ClientResult<Property> {
        let response = self
            .request(Method::GET, &format!("properties/{id}"))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn create_property(&self, input: &CreatePropertyInput) -> ClientResult<Property> {
        let response = self
            .request(Method::POST, "properties")
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn request_upload_url(
        &self,
        property_id: EntityId,
        request: &UploadRequest,
    ) -> ClientResult<UploadTicket> {
        let response = self
            .request(
                Method::POST,
                &format!("properties/{property_id}/documents/upload-url"),
            )
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Signed URLs carry their own credentials, so no bearer header is sent.
    async fn upload_bytes(
        &self,
        ticket: &UploadTicket,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<()> {
        let response = self
            .client
            .put(&ticket.upload_url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn confirm_upload(&self, confirm: &ConfirmUpload) -> ClientResult<Document> {
        let response = self
            .request(
                Method::POST,
                &format!("properties/{}/documents/confirm", confirm.property_id),
            )
            .json(confirm)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update_document_fields(
        &self,
        document_id: EntityId,
        fields: &BTreeMap<String, String>,
    ) -> ClientResult<Document> {
        let response = self
            .request(Method::PATCH, &format!("documents/{document_id}/ai-fields"))
            .json(&FieldsBody { fields })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete_document(&self, document_id: EntityId) -> ClientResult<()> {
        let response = self
            .request(Method::DELETE, &format!("documents/{document_id}"))
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn share_property(
        &self,
        property_id: EntityId,
        input: &ShareInput,
    ) -> ClientResult<PropertyPermission> {
        let response = self
            .request(Method::POST, &format!("properties/{property_id}/permissions"))
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn revoke_permission(
        &self,
        property_id: EntityId,
        permission_id: EntityId,
    ) -> ClientResult<()> {
        let response = self
            .request(
                Method::DELETE,
                &format!("properties/{property_id}/permissions/{permission_id}"),
            )
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn list_alerts(&self) -> ClientResult<Vec<Alert>> {
        let response = self.request(Method::GET, "alerts").send().await?;
        Self::parse_response(response).await
    }
}
