use actix_web::{HttpResponse, web};

use crate::middleware::auth::AuthenticatedUser;
use crate::reaction::model::ReactionKind;
use crate::reaction::service::ReactionService;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;
use crate::utils::response;

async fn toggle(
    reaction_service: web::Data<ReactionService>,
    caller: AuthenticatedUser,
    post_id: web::Path<String>,
    kind: ReactionKind,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&post_id, "post")?;
    let outcome = reaction_service
        .toggle_reaction(&post_id, &caller.id, kind)
        .await?;
    Ok(response::ok(outcome.message.clone(), outcome))
}

pub async fn like_post(
    reaction_service: web::Data<ReactionService>,
    caller: AuthenticatedUser,
    post_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    toggle(reaction_service, caller, post_id, ReactionKind::Like).await
}

pub async fn dislike_post(
    reaction_service: web::Data<ReactionService>,
    caller: AuthenticatedUser,
    post_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    toggle(reaction_service, caller, post_id, ReactionKind::Dislike).await
}
