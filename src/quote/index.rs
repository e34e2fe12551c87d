use super::controller::{create_quote, delete_quote, get_all_quotes, get_quote, update_quote};
use crate::middleware::auth::authenticated;
use actix_web::web;

pub fn quote_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotes")
            .route("/add", authenticated(web::post().to(create_quote)))
            .route("/get/all", web::get().to(get_all_quotes))
            .route("/single/{id}", web::get().to(get_quote))
            .route("/update/{id}", authenticated(web::put().to(update_quote)))
            .route("/delete/{id}", authenticated(web::delete().to(delete_quote))),
    );
}
