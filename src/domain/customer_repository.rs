use crate::domain::Customer;
use futures::Stream;
use std::error::Error as StdError;

#[trait_variant::make(Send)]
pub trait CustomerRepository
where
    Self: Clone + Send + Sync + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    async fn customers(
        &self,
    ) -> Result<impl Stream<Item = Result<Customer, Self::Error>> + Send, Self::Error>;

    async fn customer_by_id(&self, id: i64) -> Result<Option<Customer>, Self::Error>;

    async fn customer_by_pesel(&self, pesel: &str) -> Result<Option<Customer>, Self::Error>;
}
