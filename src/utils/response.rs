use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// Body shape shared by every endpoint, successful or not.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Envelope {
            status: status.as_u16().to_string(),
            success: true,
            message: message.into(),
            data,
            error: None,
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>, error: &'static str) -> Self {
        Envelope {
            status: status.as_u16().to_string(),
            success: false,
            message: message.into(),
            data: None,
            error: Some(error),
        }
    }
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::success(StatusCode::OK, message, Some(data)))
}

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::success(StatusCode::CREATED, message, Some(data)))
}

pub fn ok_message(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::<()>::success(StatusCode::OK, message, None))
}
