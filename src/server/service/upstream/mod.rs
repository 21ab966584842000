//! Clients for the internal HTTP services and the Google Docs API.
//!
//! Every internal service is plain JSON over HTTP behind a base URL taken from the
//! environment. Non-2xx responses are turned into errors with `error_for_status` and
//! propagated; callers decide whether to log or answer the user.

pub mod accounts;
pub mod destiny;
pub mod feed;
pub mod google_docs;
pub mod settings;

#[cfg(test)]
mod test;

use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::server::error::AppError;

/// JSON client bound to one upstream base URL.
#[derive(Clone)]
pub struct UpstreamClient {
    http_client: reqwest::Client,
    base: Url,
}

impl UpstreamClient {
    pub fn new(http_client: reqwest::Client, base: Url) -> Self {
        Self { http_client, base }
    }

    /// Builds an endpoint URL by appending percent-encoded path segments to the base.
    ///
    /// Segments are encoded individually, so user input such as `Guardian#1234` never
    /// changes the URL structure.
    ///
    /// # Returns
    /// - `Ok(Url)` - Endpoint URL
    /// - `Err(AppError::InternalError)` - Base URL cannot carry a path
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InternalError(format!("Upstream URL {} cannot be a base", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request and decodes the JSON response.
    ///
    /// # Arguments
    /// - `segments` - Path segments appended to the base URL
    ///
    /// # Returns
    /// - `Ok(T)` - Decoded response body
    /// - `Err(AppError::ReqwestErr)` - Network failure, non-2xx status or undecodable body
    pub async fn get<T>(&self, segments: &[&str]) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    /// Sends a JSON POST request and decodes the JSON response.
    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        tracing::debug!("POST {}", url);

        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    /// Sends a JSON POST request, ignoring the response body.
    pub async fn post_empty<B>(&self, segments: &[&str], body: &B) -> Result<(), AppError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        tracing::debug!("POST {}", url);

        self.http_client
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
