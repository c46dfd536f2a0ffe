//! Native HTTP client using reqwest

use super::{HttpError, HttpResponse};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::RequestFailed {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    /// GET `url` with an optional bearer token.
    ///
    /// 401 and 429 map to dedicated errors; any other status is returned to
    /// the caller.
    pub async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, HttpError> {
        let mut request = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| HttpError::RequestFailed {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();

        match status {
            401 => return Err(HttpError::Unauthorized),
            429 => return Err(HttpError::RateLimited),
            _ => {}
        }

        let body = response.text().await.map_err(|e| HttpError::ParseError {
            message: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }

    pub async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        let url = Url::parse_with_params(url, params).map_err(|_| HttpError::InvalidUrl {
            url: url.to_string(),
        })?;

        self.get(url.as_str(), bearer).await
    }
}
