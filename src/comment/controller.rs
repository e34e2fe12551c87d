use actix_web::{HttpResponse, web};

use crate::comment::model::{CreateCommentRequest, CreateReplyRequest};
use crate::comment::service::CommentService;
use crate::middleware::auth::AuthenticatedUser;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;
use crate::utils::response;

/// POST /comments/add/{post_id}
pub async fn create_comment(
    comment_service: web::Data<CommentService>,
    caller: AuthenticatedUser,
    post_id: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&post_id, "post")?;
    let comment = comment_service
        .add_comment(&post_id, caller.id, body.into_inner())
        .await?;
    Ok(response::created("Comment created successfully", comment))
}

pub async fn get_all_comments(
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let comments = comment_service.list_comments().await?;
    Ok(response::ok("Comments retrieved successfully", comments))
}

pub async fn get_comment(
    comment_service: web::Data<CommentService>,
    comment_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = parse_object_id(&comment_id, "comment")?;
    let comment = comment_service.get_comment(&comment_id).await?;
    Ok(response::ok("Comment retrieved successfully", comment))
}

pub async fn delete_comment(
    comment_service: web::Data<CommentService>,
    caller: AuthenticatedUser,
    comment_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let comment_id = parse_object_id(&comment_id, "comment")?;
    comment_service.delete_comment(&comment_id).await?;
    Ok(response::ok_message("Comment deleted successfully"))
}

/// POST /replies/add/{comment_id}
pub async fn create_reply(
    comment_service: web::Data<CommentService>,
    caller: AuthenticatedUser,
    comment_id: web::Path<String>,
    body: web::Json<CreateReplyRequest>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = parse_object_id(&comment_id, "comment")?;
    let reply = comment_service
        .add_reply(&comment_id, caller.id, body.into_inner())
        .await?;
    Ok(response::created("Reply created successfully", reply))
}

pub async fn get_all_replies(
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let replies = comment_service.list_replies().await?;
    Ok(response::ok("Replies retrieved successfully", replies))
}

pub async fn get_reply(
    comment_service: web::Data<CommentService>,
    reply_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let reply_id = parse_object_id(&reply_id, "reply")?;
    let reply = comment_service.get_reply(&reply_id).await?;
    Ok(response::ok("Reply retrieved successfully", reply))
}

pub async fn delete_reply(
    comment_service: web::Data<CommentService>,
    caller: AuthenticatedUser,
    reply_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let reply_id = parse_object_id(&reply_id, "reply")?;
    comment_service.delete_reply(&reply_id).await?;
    Ok(response::ok_message("Reply deleted successfully"))
}
