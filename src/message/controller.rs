use actix_web::{HttpResponse, web};

use crate::message::model::CreateMessageRequest;
use crate::message::service::MessageService;
use crate::middleware::auth::AuthenticatedUser;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;
use crate::utils::response;

pub async fn create_message(
    message_service: web::Data<MessageService>,
    body: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse, CustomError> {
    let message = message_service.add_message(body.into_inner()).await?;
    Ok(response::created("Message sent successfully", message))
}

pub async fn get_all_messages(
    message_service: web::Data<MessageService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let messages = message_service.list_messages().await?;
    Ok(response::ok("Messages fetched successfully", messages))
}

pub async fn delete_message(
    message_service: web::Data<MessageService>,
    caller: AuthenticatedUser,
    message_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let message_id = parse_object_id(&message_id, "message")?;
    message_service.delete_message(&message_id).await?;
    Ok(response::ok_message("Message deleted successfully"))
}
