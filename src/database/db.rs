use log::info;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use std::error::Error;

use crate::config::AppConfig;

pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";
pub const REPLIES: &str = "replies";
pub const REACTIONS: &str = "reactions";
pub const QUOTES: &str = "quotes";
pub const MESSAGES: &str = "messages";

/// Connect, ping, and make sure the indexes the services rely on exist.
pub async fn connect_to_mongo(config: &AppConfig) -> Result<Database, Box<dyn Error>> {
    let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
    client_options.app_name = Some(config.service_name.clone());

    let client = Client::with_options(client_options)?;

    // Ping the server to see if you can connect to the cluster
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    info!("Connected successfully to MongoDB");

    let db = client.database(&config.mongodb_database);
    ensure_indexes(&db).await?;
    Ok(db)
}

async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // One reaction per (post, user), whatever its kind: a like and a dislike
    // for the same pair can never both be stored.
    create_index(db, REACTIONS, doc! { "post_id": 1, "user_id": 1 }, true).await?;
    create_index(db, REACTIONS, doc! { "post_id": 1, "kind": 1 }, false).await?;
    create_index(db, REACTIONS, doc! { "user_id": 1 }, false).await?;

    create_index(db, USERS, doc! { "email": 1 }, true).await?;
    create_index(db, POSTS, doc! { "title": 1 }, true).await?;
    create_index(db, POSTS, doc! { "author_id": 1 }, false).await?;
    create_index(db, COMMENTS, doc! { "post_id": 1 }, false).await?;
    create_index(db, COMMENTS, doc! { "author_id": 1 }, false).await?;
    create_index(db, REPLIES, doc! { "comment_id": 1 }, false).await?;
    create_index(db, REPLIES, doc! { "author_id": 1 }, false).await?;
    create_index(db, QUOTES, doc! { "user_id": 1 }, false).await?;

    info!("MongoDB indexes are in place");
    Ok(())
}

async fn create_index(
    db: &Database,
    collection: &str,
    keys: Document,
    unique: bool,
) -> Result<(), mongodb::error::Error> {
    let model = IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(unique).build())
        .build();

    db.collection::<Document>(collection)
        .create_index(model)
        .await?;
    Ok(())
}
