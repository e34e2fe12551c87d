use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, Route, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use actix_web_httpauth::middleware::HttpAuthentication;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};

use crate::config::AppConfig;
use crate::user::model::Role;
use crate::user::service::UserService;
use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    pub exp: usize,
}

/// The caller, as resolved by [`verify_token`]. Role comes from the stored
/// user rather than the token so demotions apply immediately.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: ObjectId,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), CustomError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CustomError::ForbiddenError(
                "Only admin can do this operation".to_string(),
            ))
        }
    }

    pub fn require_self_or_admin(&self, user_id: &ObjectId) -> Result<(), CustomError> {
        if self.id == *user_id || self.is_admin() {
            Ok(())
        } else {
            Err(CustomError::ForbiddenError(
                "You can only manage your own account".to_string(),
            ))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = CustomError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| {
                    CustomError::UnauthorizedError(
                        "This operation requires you to login".to_string(),
                    )
                }),
        )
    }
}

/// Bearer validator: decode the JWT, reload the user it names and attach
/// an [`AuthenticatedUser`] to the request.
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let config = req.app_data::<web::Data<AppConfig>>().cloned();
    let users = req.app_data::<web::Data<UserService>>().cloned();
    let (config, users) = match (config, users) {
        (Some(config), Some(users)) => (config, users),
        _ => {
            log::error!("Auth middleware is missing its AppConfig or UserService");
            return Err((
                CustomError::InternalServerError("Authentication is unavailable".into()).into(),
                req,
            ));
        }
    };

    let claims = match decode_token(credentials.token(), &config.jwt_secret) {
        Ok(claims) => claims,
        Err(err) => return Err((err.into(), req)),
    };

    let user_id = match ObjectId::parse_str(&claims.id) {
        Ok(id) => id,
        Err(_) => {
            return Err((
                CustomError::UnauthorizedError("Invalid token".to_string()).into(),
                req,
            ));
        }
    };

    match users.find_by_id(&user_id).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(AuthenticatedUser {
                id: user.id,
                role: user.role,
            });
            Ok(req)
        }
        Ok(None) => Err((
            CustomError::UnauthorizedError("Token has expired. Please, login again".to_string())
                .into(),
            req,
        )),
        Err(err) => Err((err.into(), req)),
    }
}

/// Put a single route behind bearer authentication.
pub fn authenticated(route: Route) -> Route {
    route.wrap(HttpAuthentication::bearer(verify_token))
}

pub fn create_token(
    user_id: &ObjectId,
    role: Role,
    secret: &str,
    expires_in_hours: i64,
) -> Result<String, CustomError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(expires_in_hours))
        .ok_or_else(|| CustomError::InternalServerError("Token generation failed".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        id: user_id.to_hex(),
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| CustomError::InternalServerError("Token generation failed".to_string()))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, CustomError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| CustomError::UnauthorizedError("Invalid token".to_string()))
}
