use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json, Response},
    Form,
};
use semiconductor_models::PartInfo;
use semiconductor_utils::{ErrorResponse, PartLookupError};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{metrics, AppState};

/// Error returned by the HTTP boundary itself. Lookup failures never reach it.
#[derive(Debug)]
pub struct ApiError(pub PartLookupError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct PartRequest {
    pub part: String,
}

/// `PartRequest` from either a JSON or a form-encoded body.
pub struct PartForm(pub PartRequest);

#[async_trait]
impl<S> FromRequest<S> for PartForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(body) = Json::<PartRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError(PartLookupError::validation("body", e.body_text())))?;
            Ok(Self(body))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(body) = Form::<PartRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError(PartLookupError::validation("body", e.body_text())))?;
            Ok(Self(body))
        } else {
            Err(ApiError(PartLookupError::validation(
                "content-type",
                "expected application/json or application/x-www-form-urlencoded",
            )))
        }
    }
}

/// Look up the part named in the request body. The part number is passed to
/// the vendor as sent; a blank one simply finds nothing.
///
/// POST /api/digikey/
pub async fn fetch_digikey_part(
    State(state): State<AppState>,
    PartForm(request): PartForm,
) -> Json<PartInfo> {
    Json(state.adapter.fetch_part_info(&request.part).await)
}

/// Look up the part named in the path.
///
/// GET /api/v1/parts/:part_number
pub async fn get_part(
    State(state): State<AppState>,
    Path(part_number): Path<String>,
) -> Json<PartInfo> {
    Json(state.adapter.fetch_part_info(&part_number).await)
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "part-lookup",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics_handler() -> String {
    metrics::render()
}
