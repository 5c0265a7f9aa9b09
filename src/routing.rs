//! Application router configuration for the HTML pages and the remote procedures.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    AppState, endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    rpc::{
        add_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
    transaction::{
        create_transaction_endpoint, get_new_transaction_page, get_transactions_page,
        validate_transaction_field_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
        .route(
            endpoints::VALIDATE_TRANSACTION_FIELD,
            post(validate_transaction_field_endpoint),
        );

    // Credentialed requests require the allowed origin to match the request origin.
    let rpc_routes = Router::new()
        .route(endpoints::RPC_GET_TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::RPC_GET_TRANSACTION, get(get_transaction_endpoint))
        .route(endpoints::RPC_ADD_TRANSACTION, post(add_transaction_endpoint))
        .route(
            endpoints::RPC_UPDATE_TRANSACTION,
            post(update_transaction_endpoint),
        )
        .route(
            endpoints::RPC_DELETE_TRANSACTION,
            post(delete_transaction_endpoint),
        )
        .layer(CorsLayer::very_permissive());

    page_routes
        .merge(rpc_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_transactions() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::TRANSACTIONS_VIEW);
    }
}
