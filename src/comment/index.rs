use super::controller::{
    create_comment, create_reply, delete_comment, delete_reply, get_all_comments,
    get_all_replies, get_comment, get_reply,
};
use crate::middleware::auth::authenticated;
use actix_web::web;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .route("/add/{post_id}", authenticated(web::post().to(create_comment)))
            .route("/all", web::get().to(get_all_comments))
            .route("/single/{comment_id}", web::get().to(get_comment))
            .route("/delete/{comment_id}", authenticated(web::delete().to(delete_comment))),
    )
    .service(
        web::scope("/replies")
            .route("/add/{comment_id}", authenticated(web::post().to(create_reply)))
            .route("/all", web::get().to(get_all_replies))
            .route("/single/{reply_id}", web::get().to(get_reply))
            .route("/delete/{reply_id}", authenticated(web::delete().to(delete_reply))),
    );
}
