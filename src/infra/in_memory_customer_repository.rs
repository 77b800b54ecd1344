use crate::domain::{Customer, CustomerRepository};
use futures::{stream, Stream};
use std::{convert::Infallible, sync::Arc};
use tracing::instrument;

/// Customer store holding a fixed set of customers in memory; this service
/// has no persistence.
#[derive(Debug, Clone)]
pub struct InMemoryCustomerRepository {
    customers: Arc<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self {
            customers: Arc::new(customers),
        }
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    type Error = Infallible;

    #[instrument(skip(self))]
    async fn customers(
        &self,
    ) -> Result<impl Stream<Item = Result<Customer, Self::Error>> + Send, Self::Error> {
        let customers = self.customers.iter().cloned().map(Ok).collect::<Vec<_>>();
        Ok(stream::iter(customers))
    }

    #[instrument(skip(self))]
    async fn customer_by_id(&self, id: i64) -> Result<Option<Customer>, Self::Error> {
        let customer = self.customers.iter().find(|c| c.id == id).cloned();
        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn customer_by_pesel(&self, pesel: &str) -> Result<Option<Customer>, Self::Error> {
        let customer = self.customers.iter().find(|c| c.pesel == pesel).cloned();
        Ok(customer)
    }
}
