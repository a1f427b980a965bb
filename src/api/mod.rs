//! Client for the customer REST backend.
//!
//! Screens depend on [`CustomerApi`] only; [`HttpCustomerClient`] is the
//! production implementation. Every failure is logged and translated into a
//! single [`ApiError`] kind per operation. Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, error};

use crate::config::Config;
use crate::domain::Customer;
use crate::errors::ApiError;

const CUSTOMER_RESOURCE: &str = "customer";

#[async_trait]
pub trait CustomerApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Customer>, ApiError>;

    /// Not-found and transport failures are reported the same way.
    async fn get(&self, id: &str) -> Result<Customer, ApiError>;

    /// Creates a record and returns it as stored, including its new id.
    async fn create(&self, customer: &Customer) -> Result<Customer, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpCustomerClient {
    base_url: Url,
    http: Client,
}

impl HttpCustomerClient {
    /// Builds a client for `base_url`. Without a timeout a request may wait
    /// indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ApiError::ClientBuild(err.to_string()))?;
        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/customer` or `{base}/customer/{id}` with `id` encoded as a
    /// single path segment.
    fn endpoint(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(CUSTOMER_RESOURCE);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|_| ApiError::InvalidBaseUrl(raw.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

#[async_trait]
impl CustomerApi for HttpCustomerClient {
    async fn list(&self) -> Result<Vec<Customer>, ApiError> {
        let url = self.endpoint(None);
        debug!(%url, "fetching customers");
        let response = self.http.get(url).send().await.map_err(|err| {
            error!(error = %err, "error fetching customers");
            ApiError::ListFailed
        })?;
        if !response.status().is_success() {
            error!(status = %response.status(), "error fetching customers");
            return Err(ApiError::ListFailed);
        }
        response.json::<Vec<Customer>>().await.map_err(|err| {
            error!(error = %err, "error decoding customer list");
            ApiError::ListFailed
        })
    }

    async fn get(&self, id: &str) -> Result<Customer, ApiError> {
        let failed = || ApiError::FetchFailed { id: id.to_string() };
        let url = self.endpoint(Some(id));
        debug!(%url, "fetching customer");
        let response = self.http.get(url).send().await.map_err(|err| {
            error!(id, error = %err, "error fetching customer");
            failed()
        })?;
        if !response.status().is_success() {
            error!(id, status = %response.status(), "error fetching customer");
            return Err(failed());
        }
        response.json::<Customer>().await.map_err(|err| {
            error!(id, error = %err, "error decoding customer");
            failed()
        })
    }

    async fn create(&self, customer: &Customer) -> Result<Customer, ApiError> {
        let url = self.endpoint(None);
        debug!(%url, "creating customer");
        let response = self
            .http
            .post(url)
            .json(customer)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "error creating customer");
                ApiError::CreateFailed {
                    status_text: err.to_string(),
                }
            })?;
        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            error!(%status, "error creating customer");
            return Err(ApiError::CreateFailed {
                status_text: status_text(status),
            });
        }
        response.json::<Customer>().await.map_err(|err| {
            error!(error = %err, "error decoding created customer");
            ApiError::CreateFailed {
                status_text: err.to_string(),
            }
        })
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_built_under_base_path() {
        let client = HttpCustomerClient::new("http://localhost:8080/api", None).unwrap();
        assert_eq!(
            client.endpoint(None).as_str(),
            "http://localhost:8080/api/customer"
        );
        let trailing = HttpCustomerClient::new("http://localhost:8080/api/", None).unwrap();
        assert_eq!(
            trailing.endpoint(Some("42")).as_str(),
            "http://localhost:8080/api/customer/42"
        );
    }

    #[test]
    fn ids_are_encoded_as_one_segment() {
        let client = HttpCustomerClient::new("http://localhost/api", None).unwrap();
        assert_eq!(
            client.endpoint(Some("a/b c")).as_str(),
            "http://localhost/api/customer/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpCustomerClient::new("not a url", None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            HttpCustomerClient::new("mailto:someone@example.com", None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn status_text_uses_reason_phrase() {
        assert_eq!(status_text(StatusCode::BAD_REQUEST), "Bad Request");
    }
}
