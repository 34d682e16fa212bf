// Collection endpoints
//
// `{base}/api/{collection}` list / create and `{base}/api/{collection}/{id}`
// update, plus the explicit draft → published action.

use std::time::Duration;

use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::CmsClient;
use crate::envelope::Page;
use crate::error::Error;

/// Pause before each retry, multiplied by the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Per-call tuning for list requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Overrides the client-wide timeout for this call.
    pub timeout: Option<Duration>,
    /// Extra attempts after a transient failure.
    pub retries: u32,
}

impl CmsClient {
    /// List every record of a collection.
    ///
    /// `GET /api/{collection}`
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        token: &SecretString,
    ) -> Result<Page<T>, Error> {
        self.list_with(collection, token, ListOptions::default())
            .await
    }

    /// List a collection with a custom timeout and retry budget.
    pub async fn list_with<T: DeserializeOwned>(
        &self,
        collection: &str,
        token: &SecretString,
        options: ListOptions,
    ) -> Result<Page<T>, Error> {
        let url = self.api_url(collection)?;
        let timeout = options.timeout.unwrap_or(self.timeout());
        let mut attempt = 0;
        loop {
            let builder = self
                .request(Method::GET, url.clone(), token)
                .timeout(timeout);

            match self.send_within(builder, timeout).await {
                Ok((envelope, _)) => return envelope.into_page(),
                Err(e) if e.is_transient() && attempt < options.retries => {
                    attempt += 1;
                    warn!(collection, attempt, error = %e, "list failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Create a record. The body is sent as `{ "data": record }`.
    ///
    /// `POST /api/{collection}`
    pub async fn create<T, B>(
        &self,
        collection: &str,
        record: &B,
        token: &SecretString,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.api_url(collection)?;
        debug!(collection, "creating record");
        let builder = Self::with_data(self.request(Method::POST, url, token), record);
        let (envelope, body) = self.send(builder).await?;
        envelope.into_record(&body)
    }

    /// Update a record in place. The body is sent as `{ "data": patch }`.
    ///
    /// `PUT /api/{collection}/{id}`
    pub async fn update<T, B>(
        &self,
        collection: &str,
        id: i64,
        patch: &B,
        token: &SecretString,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.api_url(&format!("{collection}/{id}"))?;
        debug!(collection, id, "updating record");
        let builder = Self::with_data(self.request(Method::PUT, url, token), patch);
        let (envelope, body) = self.send(builder).await?;
        envelope.into_record(&body)
    }

    /// Publish a draft record.
    ///
    /// `POST /api/{collection}/{id}/actions/publish`
    pub async fn publish(&self, collection: &str, id: i64, token: &SecretString) -> Result<(), Error> {
        let url = self.api_url(&format!("{collection}/{id}/actions/publish"))?;
        debug!(collection, id, "publishing record");
        self.send_unit(self.request(Method::POST, url, token)).await
    }
}
