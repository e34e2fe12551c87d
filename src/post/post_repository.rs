use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use crate::database::db::POSTS;
use crate::post::post_model::{Category, Post};
use crate::utils::error::{CustomError, is_duplicate_key};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<(), CustomError>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;
    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, CustomError>;
    /// Newest first, optionally restricted to one category.
    async fn list(&self, category: Option<Category>) -> Result<Vec<Post>, CustomError>;
    /// Bump the view counter and return the updated post.
    async fn increment_views(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;
    async fn replace(&self, post: &Post) -> Result<bool, CustomError>;
}

pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    pub fn new(db: &Database) -> Self {
        MongoPostRepository {
            collection: db.collection::<Post>(POSTS),
        }
    }
}

fn title_taken() -> CustomError {
    CustomError::ConflictError("Post title already exists".to_string())
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), CustomError> {
        self.collection.insert_one(post).await.map_err(|e| {
            if is_duplicate_key(&e) {
                title_taken()
            } else {
                CustomError::from_storage("Failed to create post", e)
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch post", e))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, CustomError> {
        self.collection
            .find_one(doc! { "title": title })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch post", e))
    }

    async fn list(&self, category: Option<Category>) -> Result<Vec<Post>, CustomError> {
        let filter = match category {
            Some(category) => doc! { "category": category.label() },
            None => doc! {},
        };

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch posts", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::from_storage("Failed to collect posts", e))
    }

    async fn increment_views(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "views": 1 } })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch post", e))
    }

    async fn replace(&self, post: &Post) -> Result<bool, CustomError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": post.id }, post)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    title_taken()
                } else {
                    CustomError::from_storage("Failed to update post", e)
                }
            })?;

        Ok(result.matched_count > 0)
    }
}
