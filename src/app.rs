use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};
use std::sync::Arc;

use crate::cascade::service::CascadeService;
use crate::comment::service::CommentService;
use crate::config::AppConfig;
use crate::database::Repositories;
use crate::message::service::MessageService;
use crate::middleware::error_handler::{
    json_error_handler, path_error_handler, query_error_handler,
};
use crate::post::post_service::PostService;
use crate::quote::service::QuoteService;
use crate::reaction::service::ReactionService;
use crate::user::service::UserService;
use crate::utils::response::Envelope;

/// Every service the routes need, wired once from the repositories and
/// cloned into each worker.
#[derive(Clone)]
pub struct AppServices {
    pub config: web::Data<AppConfig>,
    pub users: web::Data<UserService>,
    pub posts: web::Data<PostService>,
    pub reactions: web::Data<ReactionService>,
    pub comments: web::Data<CommentService>,
    pub quotes: web::Data<QuoteService>,
    pub messages: web::Data<MessageService>,
}

impl AppServices {
    pub fn new(repos: Repositories, config: &AppConfig) -> Self {
        let cascade = Arc::new(CascadeService::new(repos.cascade.clone()));

        AppServices {
            config: web::Data::new(config.clone()),
            users: web::Data::new(UserService::new(
                repos.users.clone(),
                cascade.clone(),
                config,
            )),
            posts: web::Data::new(PostService::new(
                repos.posts.clone(),
                repos.comments.clone(),
                repos.reactions.clone(),
                cascade,
            )),
            reactions: web::Data::new(ReactionService::new(
                repos.reactions.clone(),
                repos.posts.clone(),
            )),
            comments: web::Data::new(CommentService::new(
                repos.comments.clone(),
                repos.posts.clone(),
            )),
            quotes: web::Data::new(QuoteService::new(repos.quotes.clone())),
            messages: web::Data::new(MessageService::new(repos.messages)),
        }
    }

    /// Shared state plus extractor configs that turn malformed input into
    /// enveloped validation errors.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.users.clone())
            .app_data(self.posts.clone())
            .app_data(self.reactions.clone())
            .app_data(self.comments.clone())
            .app_data(self.quotes.clone())
            .app_data(self.messages.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler));
    }
}

#[get("/")]
pub async fn welcome(config: web::Data<AppConfig>) -> impl Responder {
    HttpResponse::Ok().json(Envelope::success(
        StatusCode::OK,
        "Welcome to the blog API",
        Some(serde_json::json!({ "service": config.service_name })),
    ))
}
