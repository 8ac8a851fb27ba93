//! HTTP layer: URL building, auth header, JSON send/parse, storage form POST.
//!
//! REST status codes are never interpreted here: whatever JSON the API
//! answers with is handed back. The storage upload status is returned to the
//! caller as-is.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Whether a request carries the bearer header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Bearer,
    Anonymous,
}

/// HTTP backend (holds reqwest client, endpoints, auth header).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) endpoint: String,
    pub(crate) storage_url: String,
    pub(crate) auth_header: HeaderValue,
}

impl HttpBackend {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// GET `path` with optional query pairs and parse the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        auth: Auth,
    ) -> ClientResult<T> {
        let url = self.url(path);
        debug!(method = "GET", url = %url, "sending request");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(self.authorize(request, auth), &url).await
    }

    /// Send `body` as JSON with `method` and parse the JSON answer.
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(method = %method, url = %url, "sending request");

        let mut request = self.client.request(method, &url).json(body);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(self.authorize(request, Auth::Bearer), &url).await
    }

    /// POST a multipart form to the storage endpoint. Returns the status only.
    pub(crate) async fn post_storage_form(&self, form: Form) -> ClientResult<StatusCode> {
        debug!(url = %self.storage_url, "uploading to object storage");

        let response = self
            .client
            .post(&self.storage_url)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        debug!(status = status.as_u16(), "object storage responded");
        Ok(status)
    }

    fn authorize(&self, request: RequestBuilder, auth: Auth) -> RequestBuilder {
        match auth {
            Auth::Bearer => request.header(AUTHORIZATION, self.auth_header.clone()),
            Auth::Anonymous => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "response received");

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            let snippet: String = String::from_utf8_lossy(&body).chars().take(200).collect();
            ClientError::InvalidResponse {
                url: url.to_string(),
                message: format!("HTTP {}: {} (body: {})", status.as_u16(), e, snippet),
            }
        })
    }
}
