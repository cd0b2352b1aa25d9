use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use stockdesk_core::InvoiceId;
use stockdesk_invoicing::{may_edit_locked, save_invoice, InvoiceRepository, InvoiceView};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/:id", get(get_invoice).post(save))
}

fn parse_id(id: &str) -> Result<InvoiceId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid invoice id"))
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.invoices.get(id) {
        Some(invoice) => {
            let view = InvoiceView::new(&invoice, may_edit_locked(principal.principal()));
            (StatusCode::OK, Json(view)).into_response()
        }
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub async fn save(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::SaveInvoiceRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let request = match body.into_save_request() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match save_invoice(
        &services.invoices,
        &services.numbers,
        services.invoice_settings,
        principal.principal(),
        id,
        request,
        Utc::now(),
    ) {
        Ok((invoice, _events)) => {
            let view = InvoiceView::new(&invoice, may_edit_locked(principal.principal()));
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
