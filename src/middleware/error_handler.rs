use actix_web::dev::ServiceResponse;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::{StatusCode, header};
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{Error, HttpRequest, HttpResponse, Result};

use crate::utils::error::CustomError;
use crate::utils::response::Envelope;

pub(crate) fn is_json<B>(res: &ServiceResponse<B>) -> bool {
    res.response()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn error_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "VALIDATION_ERROR",
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED_ERROR",
        StatusCode::FORBIDDEN => "FORBIDDEN_ERROR",
        StatusCode::NOT_FOUND => "NOT_FOUND_ERROR",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
        _ => "REQUEST_ERROR",
    }
}

fn rewrap<B>(res: ServiceResponse<B>, message: String) -> Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let body = HttpResponse::build(status).json(Envelope::<()>::failure(
        status,
        message,
        error_code(status),
    ));
    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, body.map_into_right_body());

    Ok(ErrorHandlerResponse::Response(res))
}

/// Wraps framework errors (auth rejections, method mismatches, panics turned
/// into 500s) in the JSON envelope. Handler errors are already JSON and pass
/// through untouched.
pub fn handle_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    if is_json(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    let message = match res.response().error() {
        Some(err) if !status.is_server_error() => err.to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    rewrap(res, message)
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    CustomError::ValidationError(format!("Invalid request body: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    CustomError::ValidationError(format!("Invalid path: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    CustomError::ValidationError(format!("Invalid query string: {}", err)).into()
}
