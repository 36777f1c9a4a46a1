//! BrasilAPI CNPJ client
//!
//! Fetches the record for the fixed identifier from the public registry API.

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use super::Company;

/// The identifier this viewer looks up
pub const CNPJ: &str = "30721151000108";

/// Base URL for BrasilAPI
const REGISTRY_BASE_URL: &str = "https://brasilapi.com.br";

/// Errors that can occur when fetching the company record
#[derive(Debug, Error)]
pub enum FetchError {
    /// The registry answered with a non-success status
    #[error("Erro ao buscar o CNPJ (HTTP {0})")]
    Status(StatusCode),

    /// The request never completed
    #[error("Erro ao buscar o CNPJ: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not a company record
    #[error("Erro ao interpretar a resposta: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the CNPJ endpoint
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient {
    /// Create a new RegistryClient pointing at BrasilAPI
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: REGISTRY_BASE_URL.to_string(),
        }
    }

    /// Create a new RegistryClient with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Path of the record for the fixed identifier
    pub fn record_path() -> String {
        format!("/api/cnpj/v1/{}", CNPJ)
    }

    /// Full URL of the record for the fixed identifier
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            Self::record_path()
        )
    }

    /// Fetch the company record
    ///
    /// # Returns
    /// * `Ok(Company)` - The parsed record
    /// * `Err(FetchError)` - On a non-success status, a network failure or an
    ///   unparseable body
    pub async fn fetch(&self) -> Result<Company, FetchError> {
        let url = self.endpoint();
        debug!(%url, "requesting company record");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let text = response.text().await?;
        let company: Company = serde_json::from_str(&text)?;
        debug!(cnpj = ?company.cnpj, "company record received");

        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_endpoint_uses_fixed_identifier() {
        let client = RegistryClient::new();
        assert_eq!(
            client.endpoint(),
            "https://brasilapi.com.br/api/cnpj/v1/30721151000108"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = RegistryClient::with_base_url("http://localhost:1234/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/api/cnpj/v1/30721151000108"
        );
    }

    #[tokio::test]
    async fn test_fetch_parses_success_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(RegistryClient::record_path());
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "razao_social": "ACME LTDA",
                        "cnpj": "30721151000108",
                        "uf": "SP"
                    }));
            })
            .await;

        let client = RegistryClient::with_base_url(server.base_url());
        let company = client.fetch().await.expect("Fetch should succeed");

        mock.assert_async().await;
        assert_eq!(company.razao_social.as_deref(), Some("ACME LTDA"));
        assert_eq!(company.uf.as_deref(), Some("SP"));
    }

    #[tokio::test]
    async fn test_fetch_fails_on_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(RegistryClient::record_path());
                then.status(500);
            })
            .await;

        let client = RegistryClient::with_base_url(server.base_url());
        let err = client.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.to_string().contains("Erro"));
    }

    #[tokio::test]
    async fn test_fetch_fails_on_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(RegistryClient::record_path());
                then.status(200).body("not json");
            })
            .await;

        let client = RegistryClient::with_base_url(server.base_url());
        let err = client.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }
}
