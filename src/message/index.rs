use super::controller::{create_message, delete_message, get_all_messages};
use crate::middleware::auth::authenticated;
use actix_web::web;

pub fn message_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/messages")
            .route("/add", web::post().to(create_message))
            .route("/get/all", authenticated(web::get().to(get_all_messages)))
            .route("/delete/{id}", authenticated(web::delete().to(delete_message))),
    );
}
