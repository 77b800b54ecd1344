use crate::{
    api::AppState,
    domain::{Account, AccountClient, Customer, CustomerRepository, CustomerType},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use error_ext::StdErrorExt;
use futures::TryStreamExt;
use std::error::Error as StdError;
use tracing::{error, warn};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(components(schemas(Customer, CustomerType, Account)))]
pub struct ApiDoc;

pub fn app<R, A>() -> Router<AppState<R, A>>
where
    R: CustomerRepository,
    A: AccountClient,
{
    Router::new()
        .route("/customers", get(customers::<R, A>))
        .route("/customers/:id", get(customer_by_id::<R, A>))
        .route("/customers/pesel/:pesel", get(customer_by_pesel::<R, A>))
}

/// All customers, without their accounts.
async fn customers<R, A>(
    State(app_state): State<AppState<R, A>>,
) -> Result<Json<Vec<Customer>>, ApiError>
where
    R: CustomerRepository,
    A: AccountClient,
{
    let customers = app_state
        .customer_repository
        .customers()
        .await
        .map_err(internal_error)?
        .try_collect::<Vec<_>>()
        .await
        .map_err(internal_error)?;

    Ok(Json(customers))
}

/// One customer by ID, with its accounts fetched from the account service.
async fn customer_by_id<R, A>(
    State(app_state): State<AppState<R, A>>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError>
where
    R: CustomerRepository,
    A: AccountClient,
{
    let customer = app_state
        .customer_repository
        .customer_by_id(id)
        .await
        .map_err(internal_error)?;
    let Some(mut customer) = customer else {
        return Err(ApiError::NotFound);
    };

    customer.accounts = app_state
        .account_client
        .accounts_by_customer(id)
        .await
        .map_err(upstream_error)?;

    Ok(Json(customer))
}

/// One customer by PESEL, without its accounts.
async fn customer_by_pesel<R, A>(
    State(app_state): State<AppState<R, A>>,
    Path(pesel): Path<String>,
) -> Result<Json<Customer>, ApiError>
where
    R: CustomerRepository,
    A: AccountClient,
{
    let customer = app_state
        .customer_repository
        .customer_by_pesel(&pesel)
        .await
        .map_err(internal_error)?;

    customer.map(Json).ok_or(ApiError::NotFound)
}

#[derive(Debug, Clone, Copy)]
enum ApiError {
    NotFound,
    Internal,
    Upstream,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream => StatusCode::BAD_GATEWAY,
        };
        status.into_response()
    }
}

fn internal_error<E>(error: E) -> ApiError
where
    E: StdError,
{
    error!(error = error.as_chain(), "cannot handle request");
    ApiError::Internal
}

fn upstream_error<E>(error: E) -> ApiError
where
    E: StdError,
{
    warn!(error = error.as_chain(), "cannot get accounts");
    ApiError::Upstream
}

#[cfg(test)]
mod tests {
    use crate::{
        api::AppState,
        domain::{Account, AccountClient, Customer, CustomerType},
        infra::InMemoryCustomerRepository,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use error_ext::BoxError;
    use thiserror::Error;
    use tower::ServiceExt;

    #[derive(Debug, Clone)]
    enum TestAccountClient {
        Accounts(Vec<Account>),
        Failing,
    }

    #[derive(Debug, Error)]
    #[error("account service unavailable")]
    struct TestAccountClientError;

    impl AccountClient for TestAccountClient {
        type Error = TestAccountClientError;

        async fn accounts_by_customer(
            &self,
            _customer_id: i64,
        ) -> Result<Vec<Account>, Self::Error> {
            match self {
                TestAccountClient::Accounts(accounts) => Ok(accounts.clone()),
                TestAccountClient::Failing => Err(TestAccountClientError),
            }
        }
    }

    fn customer_base() -> Vec<Customer> {
        vec![
            Customer {
                id: 1,
                pesel: "12345".to_string(),
                name: "Jan Kowalski".to_string(),
                customer_type: CustomerType::Individual,
                accounts: Vec::new(),
            },
            Customer {
                id: 2,
                pesel: "12346".to_string(),
                name: "Anna Nowak".to_string(),
                customer_type: CustomerType::Individual,
                accounts: Vec::new(),
            },
            Customer {
                id: 3,
                pesel: "12347".to_string(),
                name: "Solid Software".to_string(),
                customer_type: CustomerType::Company,
                accounts: Vec::new(),
            },
        ]
    }

    fn app(account_client: TestAccountClient) -> Router {
        super::app().with_state(AppState {
            customer_repository: InMemoryCustomerRepository::new(customer_base()),
            account_client,
        })
    }

    #[tokio::test]
    async fn test_customers() -> Result<(), BoxError> {
        let app = app(TestAccountClient::Accounts(vec![Account {
            id: 1,
            number: "1234567890".to_string(),
            balance: 4800,
        }]));

        let response = app
            .oneshot(Request::builder().uri("/customers").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert!(String::from_utf8_lossy(&body).contains(r#""type":"INDIVIDUAL""#));

        let customers = serde_json::from_slice::<Vec<Customer>>(&body)?;
        assert_eq!(customers, customer_base());

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_by_id() -> Result<(), BoxError> {
        let accounts = vec![
            Account {
                id: 1,
                number: "1234567890".to_string(),
                balance: 4800,
            },
            Account {
                id: 2,
                number: "1234567891".to_string(),
                balance: 120,
            },
        ];
        let app = app(TestAccountClient::Accounts(accounts.clone()));

        let response = app
            .oneshot(Request::builder().uri("/customers/1").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let customer = serde_json::from_slice::<Customer>(&body)?;
        assert_eq!(customer.id, 1);
        assert_eq!(customer.accounts, accounts);

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_by_id_not_found() -> Result<(), BoxError> {
        let app = app(TestAccountClient::Accounts(Vec::new()));

        let response = app
            .oneshot(Request::builder().uri("/customers/99").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_by_id_upstream_error() -> Result<(), BoxError> {
        let app = app(TestAccountClient::Failing);

        let response = app
            .oneshot(Request::builder().uri("/customers/1").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_by_pesel() -> Result<(), BoxError> {
        let app = app(TestAccountClient::Accounts(Vec::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/customers/pesel/12347")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let customer = serde_json::from_slice::<Customer>(&body)?;
        assert_eq!(customer.id, 3);
        assert_eq!(customer.customer_type, CustomerType::Company);
        assert!(customer.accounts.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_by_pesel_not_found() -> Result<(), BoxError> {
        let app = app(TestAccountClient::Accounts(Vec::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/customers/pesel/99999")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }
}
