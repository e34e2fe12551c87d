use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpResponse, Result};

use super::error_handler::is_json;
use crate::utils::response::Envelope;

/// Unknown routes get an enveloped 404. A 404 a handler produced itself
/// (post not found, ...) is already JSON and is left alone.
pub fn not_found<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    if is_json(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let new_response = HttpResponse::build(StatusCode::NOT_FOUND).json(Envelope::<()>::failure(
        StatusCode::NOT_FOUND,
        "Route does not exist",
        "NOT_FOUND_ERROR",
    ));
    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, new_response.map_into_right_body());

    Ok(ErrorHandlerResponse::Response(res))
}
