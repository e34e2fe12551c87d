use actix_web::{HttpResponse, web};

use crate::middleware::auth::AuthenticatedUser;
use crate::user::model::{ChangeRoleRequest, CreateUserRequest, LoginRequest, UpdateUserRequest};
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;
use crate::utils::response;

pub async fn register_user(
    user_service: web::Data<UserService>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, CustomError> {
    let payload = user_service.register(body.into_inner()).await?;
    Ok(response::created("User created successfully", payload))
}

pub async fn login_user(
    user_service: web::Data<UserService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, CustomError> {
    let payload = user_service.login(body.into_inner()).await?;
    Ok(response::ok("Login successful", payload))
}

pub async fn get_all_users(
    user_service: web::Data<UserService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let users = user_service.list_users().await?;
    Ok(response::ok("Users fetched successfully", users))
}

pub async fn get_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user_id = parse_object_id(&user_id, "user")?;
    let user = user_service.get_user(&user_id).await?;
    Ok(response::ok("User fetched successfully", user))
}

pub async fn update_user(
    user_service: web::Data<UserService>,
    caller: AuthenticatedUser,
    user_id: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = parse_object_id(&user_id, "user")?;
    caller.require_self_or_admin(&user_id)?;

    let user = user_service.update_user(&user_id, body.into_inner()).await?;
    Ok(response::ok("User updated successfully", user))
}

pub async fn change_role(
    user_service: web::Data<UserService>,
    caller: AuthenticatedUser,
    user_id: web::Path<String>,
    body: web::Json<ChangeRoleRequest>,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let user_id = parse_object_id(&user_id, "user")?;
    let role = body
        .role
        .as_deref()
        .ok_or_else(|| CustomError::ValidationError("Role is required".to_string()))?;

    let user = user_service.change_role(&user_id, role).await?;
    Ok(response::ok("User role updated successfully", user))
}

pub async fn delete_user(
    user_service: web::Data<UserService>,
    caller: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user_id = parse_object_id(&user_id, "user")?;
    caller.require_self_or_admin(&user_id)?;

    let report = user_service.delete_user(&user_id).await?;
    Ok(response::ok("User deleted successfully", report))
}
