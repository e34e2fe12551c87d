use super::post_controller::{
    create_post, delete_post, get_all_posts, get_categories, get_post, get_posts_by_category,
    update_post,
};
use crate::middleware::auth::authenticated;
use crate::reaction::index::reaction_routes;
use actix_web::web;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .configure(reaction_routes)
            .route("/add", authenticated(web::post().to(create_post)))
            .route("/get/all", web::get().to(get_all_posts))
            .route("/single/post/{id}", web::get().to(get_post))
            .route("/category/{category}", web::get().to(get_posts_by_category))
            .route("/update/{id}", authenticated(web::put().to(update_post)))
            .route("/delete/{id}", authenticated(web::delete().to(delete_post))),
    )
    .route("/categories", web::get().to(get_categories));
}
