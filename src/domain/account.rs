use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account record owned by the account service; passed through as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: i64,
    pub number: String,
    pub balance: i64,
}
