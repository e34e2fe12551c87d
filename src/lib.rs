pub mod app;
pub mod cascade;
pub mod comment;
pub mod config;
pub mod database;
pub mod message;
pub mod middleware;
pub mod post;
pub mod quote;
pub mod reaction;
pub mod router;
pub mod user;
pub mod utils;
