use url::Url;

use crate::server::{error::AppError, model::google_doc::Document};

const GOOGLE_DOCS_API: &str = "https://docs.googleapis.com/v1/documents/";

/// Read-only client for the Google Docs API, authenticated with an API key.
pub struct GoogleDocsClient {
    http_client: reqwest::Client,
    api_key: String,
    base: Url,
}

impl GoogleDocsClient {
    pub fn new(http_client: reqwest::Client, api_key: String) -> Result<Self, AppError> {
        let base = Url::parse(GOOGLE_DOCS_API).map_err(|e| {
            AppError::InternalError(format!("Invalid Google Docs API URL: {}", e))
        })?;
        Ok(Self::with_base(http_client, api_key, base))
    }

    /// Creates a client against another Docs API root, such as a local stand-in.
    pub fn with_base(http_client: reqwest::Client, api_key: String, base: Url) -> Self {
        Self {
            http_client,
            api_key,
            base,
        }
    }

    /// Fetches a document with its body and inline objects.
    ///
    /// # Arguments
    /// - `document_id` - Id from the document's share URL
    ///
    /// # Returns
    /// - `Ok(Document)` - Parsed document resource
    /// - `Err(AppError::ReqwestErr)` - Request failed, returned non-2xx or was not a document
    pub async fn fetch(&self, document_id: &str) -> Result<Document, AppError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InternalError("Google Docs URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(document_id);

        tracing::debug!("Fetching Google Doc {}", document_id);

        let document = self
            .http_client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Document>()
            .await?;

        Ok(document)
    }
}
