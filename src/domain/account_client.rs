use crate::domain::Account;
use std::error::Error as StdError;

/// Lookup of the accounts belonging to a customer, served by the remote
/// account service.
#[trait_variant::make(Send)]
pub trait AccountClient
where
    Self: Clone + Send + Sync + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    async fn accounts_by_customer(&self, customer_id: i64) -> Result<Vec<Account>, Self::Error>;
}
