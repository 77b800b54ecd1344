mod account;
mod account_client;
mod customer;
mod customer_repository;

pub use account::*;
pub use account_client::*;
pub use customer::*;
pub use customer_repository::*;
