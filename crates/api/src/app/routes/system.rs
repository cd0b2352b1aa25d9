use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    let mut permissions: Vec<&str> = principal
        .principal()
        .permissions()
        .map(|p| p.as_str())
        .collect();
    permissions.sort_unstable();

    Json(serde_json::json!({
        "user_id": principal.user_id().to_string(),
        "permissions": permissions,
    }))
}
