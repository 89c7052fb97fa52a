//! Shared response envelope types for API handlers.
//!
//! Resource endpoints answer with a `{ "data": ... }` envelope. The dashboard
//! layout endpoints keep their own flat shape (`{ "layout_config": ... }`).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: groups }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ... }` acknowledgement for actions without a payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
