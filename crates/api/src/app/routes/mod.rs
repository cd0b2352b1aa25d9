use axum::{routing::get, Router};

pub mod invoices;
pub mod stock;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/stock", stock::router())
        .nest("/invoices", invoices::router())
}
