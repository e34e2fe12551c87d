use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::database::db::MESSAGES;
use crate::message::model::Message;
use crate::utils::error::CustomError;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: &Message) -> Result<(), CustomError>;
    async fn list(&self) -> Result<Vec<Message>, CustomError>;
    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoMessageRepository {
    collection: Collection<Message>,
}

impl MongoMessageRepository {
    pub fn new(db: &Database) -> Self {
        MongoMessageRepository {
            collection: db.collection::<Message>(MESSAGES),
        }
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), CustomError> {
        self.collection
            .insert_one(message)
            .await
            .map_err(|e| CustomError::from_storage("Failed to send message", e))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Message>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| CustomError::from_storage("Failed to retrieve messages", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::from_storage("Failed to retrieve messages", e))
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to delete message", e))?;
        Ok(result.deleted_count > 0)
    }
}
