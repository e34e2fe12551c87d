use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::{App, test, web};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde_json::{Value, json};

use blog_api::app::{AppServices, welcome};
use blog_api::config::AppConfig;
use blog_api::database::{MemoryStore, Repositories};
use blog_api::middleware::auth::create_token;
use blog_api::middleware::error_handler::handle_error;
use blog_api::middleware::not_found::not_found;
use blog_api::router::index::routes;
use blog_api::user::model::{Role, User};
use blog_api::user::repository::UserRepository;
use blog_api::utils::hashing::hash_password;

const SECRET: &str = "integration-secret";

macro_rules! blog_app {
    ($services:expr) => {
        App::new()
            .configure(|cfg| $services.configure(cfg))
            .service(web::scope("/api").configure(routes))
            .service(welcome)
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, not_found)
                    .default_handler(handle_error),
            )
    };
}

fn setup() -> (MemoryStore, AppServices) {
    let store = MemoryStore::new();
    let services = AppServices::new(
        Repositories::memory(store.clone()),
        &AppConfig::for_memory(SECRET),
    );
    (store, services)
}

async fn seed_admin(store: &MemoryStore) -> String {
    let now = Utc::now();
    let admin = User {
        id: ObjectId::new(),
        first_name: "Ada".into(),
        last_name: "Admin".into(),
        email: format!("admin-{}@example.com", ObjectId::new()),
        password: hash_password("adminpass1", 4).unwrap(),
        profile: None,
        role: Role::Admin,
        created_at: now,
        updated_at: now,
    };
    UserRepository::insert(store, &admin).await.unwrap();
    create_token(&admin.id, Role::Admin, SECRET, 1).unwrap()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn welcome_names_the_service() {
    let (_, services) = setup();
    let app = test::init_service(blog_app!(services)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "200");
    assert_eq!(body["data"]["service"], "blog-api");
}

#[actix_web::test]
async fn like_dislike_sequence_updates_counts() {
    let (store, services) = setup();
    let admin = seed_admin(&store).await;
    let app = test::init_service(blog_app!(services)).await;

    // signup returns a token for the new reader
    let req = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(json!({
            "first_name": "Tobi",
            "last_name": "Reader",
            "email": "tobi@example.com",
            "password": "readmore42"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let reader = body["data"]["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/posts/add")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "title": "On kindness",
            "content": "Small acts add up.",
            "category": "KINDNESS & COMPASSION"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    let expectations = [
        ("like", "Your like added", 1, 0),
        ("dislike", "Your dislike added", 0, 1),
        ("dislike", "Your dislike removed", 0, 0),
    ];
    for (kind, message, likes, dislikes) in expectations {
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/{}", kind, post_id))
            .insert_header(bearer(&reader))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], message);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/single/post/{}", post_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["counts"]["likes"], likes);
        assert_eq!(body["data"]["counts"]["dislikes"], dislikes);
    }
}

#[actix_web::test]
async fn reacting_to_a_missing_post_is_not_found() {
    let (store, services) = setup();
    let token = seed_admin(&store).await;
    let app = test::init_service(blog_app!(services)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/like/{}", ObjectId::new()))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Post not found");
}

#[actix_web::test]
async fn reacting_requires_a_token() {
    let (_, services) = setup();
    let app = test::init_service(blog_app!(services)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/like/{}", ObjectId::new()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_post_delete_cascades() {
    let (store, services) = setup();
    let admin = seed_admin(&store).await;
    let app = test::init_service(blog_app!(services)).await;

    let req = test::TestRequest::post()
        .uri("/api/posts/add")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "title": "Doomed",
            "content": "Soon gone.",
            "category": "VLOG"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/comments/add/{}", post_id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "body": "first" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let comment_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/replies/add/{}", comment_id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "message": "reply" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/like/{}", post_id))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/delete/{}", post_id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["post_deleted"], true);
    assert_eq!(body["data"]["comments"], 1);
    assert_eq!(body["data"]["replies"], 1);
    assert_eq!(body["data"]["reactions"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/single/post/{}", post_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/single/{}", comment_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // a replayed delete finds nothing left
    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/delete/{}", post_id))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn readers_cannot_manage_posts() {
    let (_, services) = setup();
    let app = test::init_service(blog_app!(services)).await;

    let req = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(json!({
            "first_name": "Kemi",
            "last_name": "Reader",
            "email": "kemi@example.com",
            "password": "readmore42"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/delete/{}", ObjectId::new()))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "FORBIDDEN_ERROR");
}

#[actix_web::test]
async fn users_delete_only_themselves() {
    let (_, services) = setup();
    let app = test::init_service(blog_app!(services)).await;

    let mut accounts = Vec::new();
    for email in ["one@example.com", "two@example.com"] {
        let req = test::TestRequest::post()
            .uri("/api/signup")
            .set_json(json!({
                "first_name": "Sam",
                "last_name": "User",
                "email": email,
                "password": "password12"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        accounts.push((
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
            body["data"]["token"].as_str().unwrap().to_string(),
        ));
    }
    let (first_id, first_token) = &accounts[0];
    let (second_id, _) = &accounts[1];

    let req = test::TestRequest::delete()
        .uri(&format!("/api/{}", second_id))
        .insert_header(bearer(first_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/{}", first_id))
        .insert_header(bearer(first_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user_deleted"], true);

    // the token outlives the account but no longer authenticates
    let req = test::TestRequest::put()
        .uri(&format!("/api/{}", first_id))
        .insert_header(bearer(first_token))
        .set_json(json!({ "first_name": "Ghost" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/{}", first_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_input_is_a_validation_error() {
    let (_, services) = setup();
    let app = test::init_service(blog_app!(services)).await;

    let req = test::TestRequest::post()
        .uri("/api/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let req = test::TestRequest::get()
        .uri("/api/posts/single/post/not-an-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_routes_get_an_enveloped_404() {
    let (_, services) = setup();
    let app = test::init_service(blog_app!(services)).await;

    let req = test::TestRequest::get().uri("/api/posts/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Route does not exist");
    assert_eq!(body["status"], "404");
}

#[actix_web::test]
async fn contact_messages_are_admin_only_to_read() {
    let (store, services) = setup();
    let admin = seed_admin(&store).await;
    let app = test::init_service(blog_app!(services)).await;

    let req = test::TestRequest::post()
        .uri("/api/messages/add")
        .set_json(json!({
            "names": "Visitor",
            "email": "visitor@example.com",
            "subject": "Hi",
            "message": "Great blog"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/messages/get/all")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
