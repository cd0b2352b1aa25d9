use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use stockdesk_auth::{authorize_any, Permission};
use stockdesk_inventory::{ensure_selectable, RowCollector};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/sku/autocomplete", get(autocomplete))
        .route("/form", get(get_form))
        .route("/form/rows", post(add_row))
        .route("/form/rows/:position", delete(remove_row))
        .route("/transactions", post(submit_transaction))
        .route("/levels", get(stock_level))
}

fn require_stock_editor(principal: &PrincipalContext) -> Result<(), axum::response::Response> {
    authorize_any(principal.principal(), &Permission::STOCK_EDITORS)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}

pub async fn autocomplete(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::AutocompleteQuery>,
) -> impl IntoResponse {
    let q = query.q.unwrap_or_default();
    Json(services.form.suggest_skus(&q, services.autocomplete_limit))
}

pub async fn get_form(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> impl IntoResponse {
    let rows = services.sessions.snapshot(principal.user_id());
    Json(services.form.view(principal.principal(), &rows))
}

pub async fn add_row(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::AddRowRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_stock_editor(&principal) {
        return resp;
    }

    let added = services.sessions.with_session(principal.user_id(), |rows| {
        let position = rows.add_row(body.sku, body.quantity);
        (position, rows.rows().to_vec())
    });

    match added {
        Some((position, rows)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "position": position, "rows": rows })),
        )
            .into_response(),
        None => errors::store_unavailable(),
    }
}

pub async fn remove_row(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(position): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_stock_editor(&principal) {
        return resp;
    }

    let position: usize = match position.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid row position"),
    };

    let removed = services.sessions.with_session(principal.user_id(), |rows| {
        rows.remove_row(position).map(|_| rows.rows().to_vec())
    });

    match removed {
        Some(Some(rows)) => (StatusCode::OK, Json(serde_json::json!({ "rows": rows }))).into_response(),
        Some(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such row"),
        None => errors::store_unavailable(),
    }
}

pub async fn submit_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::SubmitTransactionRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_stock_editor(&principal) {
        return resp;
    }

    let (lines, request) = body.into_parts();

    let submitted = services.sessions.with_session(principal.user_id(), |rows| {
        if let Some(lines) = lines {
            *rows = RowCollector::from_lines(lines.into_iter().map(|l| (l.sku, l.quantity)));
        }
        services
            .form
            .submit_rows(principal.principal(), rows, request)
            .map(|report| (report, rows.rows().to_vec()))
    });

    match submitted {
        Some(Ok((report, rows))) => {
            (StatusCode::OK, Json(dto::report_to_response(&report, rows))).into_response()
        }
        Some(Err(e)) => errors::domain_error_to_response(e),
        None => errors::store_unavailable(),
    }
}

pub async fn stock_level(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::StockLevelQuery>,
) -> axum::response::Response {
    let options = services.form.location_options(principal.principal());
    if let Err(e) = ensure_selectable(&options, query.location) {
        return errors::domain_error_to_response(e);
    }

    match services
        .form
        .stock_level(&query.sku, query.location, query.zone.as_deref())
    {
        Ok(quantity) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "sku": query.sku,
                "location": query.location,
                "zone": query.zone,
                "quantity": quantity,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
