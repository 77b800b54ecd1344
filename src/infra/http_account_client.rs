use crate::{
    domain::{Account, AccountClient},
    infra::ServiceResolver,
};
use error_ext::BoxError;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};

/// Logical name under which the account service is registered.
const ACCOUNT_SERVICE: &str = "account-service";

/// Account service client issuing one GET request per lookup against whatever
/// address the resolver currently returns for `account-service`. No retries,
/// no caching; all failures surface to the caller.
#[derive(Debug, Clone)]
pub struct HttpAccountClient<R> {
    client: Client,
    resolver: R,
}

impl<R> HttpAccountClient<R>
where
    R: ServiceResolver,
{
    pub fn new(client: Client, resolver: R) -> Self {
        Self { client, resolver }
    }
}

impl<R> AccountClient for HttpAccountClient<R>
where
    R: ServiceResolver,
{
    type Error = AccountClientError;

    #[instrument(skip(self))]
    async fn accounts_by_customer(&self, customer_id: i64) -> Result<Vec<Account>, Self::Error> {
        let base_url = self
            .resolver
            .resolve(ACCOUNT_SERVICE)
            .await
            .map_err(|error| AccountClientError::Resolve {
                service: ACCOUNT_SERVICE,
                source: error.into(),
            })?;

        let url = format!("{base_url}/accounts/customer/{customer_id}");
        debug!(url, "requesting accounts");

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|error| AccountClientError::Transport {
                    url: url.clone(),
                    source: error,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AccountClientError::Status { status });
        }

        let accounts = response
            .json::<Vec<Account>>()
            .await
            .map_err(|error| AccountClientError::Deserialize { url, source: error })?;

        debug!(count = accounts.len(), "received accounts");
        Ok(accounts)
    }
}

#[derive(Debug, Error)]
pub enum AccountClientError {
    #[error("cannot resolve service {service}")]
    Resolve {
        service: &'static str,
        source: BoxError,
    },

    #[error("cannot send request to {url}")]
    Transport { url: String, source: reqwest::Error },

    #[error("account service responded with status {status}")]
    Status { status: StatusCode },

    #[error("cannot deserialize account service response from {url}")]
    Deserialize { url: String, source: reqwest::Error },
}
