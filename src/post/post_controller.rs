use actix_web::{HttpResponse, web};

use crate::middleware::auth::AuthenticatedUser;
use crate::post::post_model::{CreatePostRequest, PostQuery, UpdatePostRequest};
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;
use crate::utils::response;

pub async fn create_post(
    post_service: web::Data<PostService>,
    caller: AuthenticatedUser,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let post = post_service.create_post(caller.id, body.into_inner()).await?;
    Ok(response::created("Post created successfully", post))
}

pub async fn get_all_posts(
    post_service: web::Data<PostService>,
    query: web::Query<PostQuery>,
) -> Result<HttpResponse, CustomError> {
    let posts = post_service.list_posts(query.category.as_deref()).await?;
    Ok(response::ok("Posts fetched successfully", posts))
}

pub async fn get_post(
    post_service: web::Data<PostService>,
    post_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&post_id, "post")?;
    let post = post_service.get_post(&post_id).await?;
    Ok(response::ok("Post fetched successfully", post))
}

pub async fn get_posts_by_category(
    post_service: web::Data<PostService>,
    category: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let posts = post_service.posts_by_category(&category).await?;
    Ok(response::ok("Posts fetched successfully", posts))
}

pub async fn update_post(
    post_service: web::Data<PostService>,
    caller: AuthenticatedUser,
    post_id: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let post_id = parse_object_id(&post_id, "post")?;
    let post = post_service.update_post(&post_id, body.into_inner()).await?;
    Ok(response::ok("Post updated successfully", post))
}

pub async fn delete_post(
    post_service: web::Data<PostService>,
    caller: AuthenticatedUser,
    post_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    caller.require_admin()?;
    let post_id = parse_object_id(&post_id, "post")?;
    let report = post_service.delete_post(&post_id).await?;
    Ok(response::ok("Post deleted successfully", report))
}

pub async fn get_categories(post_service: web::Data<PostService>) -> HttpResponse {
    response::ok("Categories fetched successfully", post_service.categories())
}
