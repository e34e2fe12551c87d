use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::database::db::QUOTES;
use crate::quote::model::Quote;
use crate::utils::error::CustomError;

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn insert(&self, quote: &Quote) -> Result<(), CustomError>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Quote>, CustomError>;
    async fn list(&self) -> Result<Vec<Quote>, CustomError>;
    async fn replace(&self, quote: &Quote) -> Result<bool, CustomError>;
    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoQuoteRepository {
    collection: Collection<Quote>,
}

impl MongoQuoteRepository {
    pub fn new(db: &Database) -> Self {
        MongoQuoteRepository {
            collection: db.collection::<Quote>(QUOTES),
        }
    }
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    async fn insert(&self, quote: &Quote) -> Result<(), CustomError> {
        self.collection
            .insert_one(quote)
            .await
            .map_err(|e| CustomError::from_storage("Failed to add quote", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Quote>, CustomError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch quote", e))
    }

    async fn list(&self) -> Result<Vec<Quote>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch quotes", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::from_storage("Failed to collect quotes", e))
    }

    async fn replace(&self, quote: &Quote) -> Result<bool, CustomError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": quote.id }, quote)
            .await
            .map_err(|e| CustomError::from_storage("Failed to update quote", e))?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to delete quote", e))?;
        Ok(result.deleted_count > 0)
    }
}
