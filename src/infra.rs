mod http_account_client;
mod in_memory_customer_repository;
mod service_resolver;

pub use http_account_client::*;
pub use in_memory_customer_repository::*;
pub use service_resolver::*;
