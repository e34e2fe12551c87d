use crate::comment::index::comment_routes;
use crate::message::index::message_routes;
use crate::post::post_index::post_routes;
use crate::quote::index::quote_routes;
use crate::user::index::user_routes;
use actix_web::web;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(post_routes);
    cfg.configure(comment_routes);
    cfg.configure(quote_routes);
    cfg.configure(message_routes);
    // user routes capture `/{id}`, keep them last
    cfg.configure(user_routes);
}
