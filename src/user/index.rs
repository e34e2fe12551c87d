use super::controller::{
    change_role, delete_user, get_all_users, get_user, login_user, register_user, update_user,
};
use crate::middleware::auth::authenticated;
use actix_web::web;

/// Registered last: `/{id}` would otherwise shadow the other top-level paths.
pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(register_user))
        .route("/login", web::post().to(login_user))
        .route("/", authenticated(web::get().to(get_all_users)))
        .route("/{id}", web::get().to(get_user))
        .route("/{id}", authenticated(web::put().to(update_user)))
        .route("/{id}", authenticated(web::delete().to(delete_user)))
        .route("/{id}/role", authenticated(web::put().to(change_role)));
}
