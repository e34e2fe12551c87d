pub mod db;
pub mod memory;

use mongodb::Database;
use std::sync::Arc;

use crate::cascade::repository::{CascadeRepository, MongoCascadeRepository};
use crate::comment::repository::{CommentRepository, MongoCommentRepository};
use crate::message::repository::{MessageRepository, MongoMessageRepository};
use crate::post::post_repository::{MongoPostRepository, PostRepository};
use crate::quote::repository::{MongoQuoteRepository, QuoteRepository};
use crate::reaction::repository::{MongoReactionRepository, ReactionRepository};
use crate::user::repository::{MongoUserRepository, UserRepository};

pub use db::connect_to_mongo;
pub use memory::MemoryStore;

/// Storage handles injected into the services. Built once per process from
/// whichever engine is configured.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub reactions: Arc<dyn ReactionRepository>,
    pub quotes: Arc<dyn QuoteRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub cascade: Arc<dyn CascadeRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Repositories {
            users: Arc::new(MongoUserRepository::new(db)),
            posts: Arc::new(MongoPostRepository::new(db)),
            comments: Arc::new(MongoCommentRepository::new(db)),
            reactions: Arc::new(MongoReactionRepository::new(db)),
            quotes: Arc::new(MongoQuoteRepository::new(db)),
            messages: Arc::new(MongoMessageRepository::new(db)),
            cascade: Arc::new(MongoCascadeRepository::new(db)),
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Repositories {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            reactions: store.clone(),
            quotes: store.clone(),
            messages: store.clone(),
            cascade: store,
        }
    }
}
