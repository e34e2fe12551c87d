use super::controller::{dislike_post, like_post};
use crate::middleware::auth::authenticated;
use actix_web::web;

/// Mounted inside the `/posts` scope.
pub fn reaction_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/like/{post_id}", authenticated(web::post().to(like_post)))
        .route("/dislike/{post_id}", authenticated(web::post().to(dislike_post)));
}
