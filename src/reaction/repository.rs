use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::database::db::REACTIONS;
use crate::reaction::model::{Reaction, ReactionKind};
use crate::utils::error::{CustomError, is_duplicate_key};

/// Persistent likes and dislikes.
///
/// Implementations must reject a second reaction for the same
/// (post, user) pair, whatever its kind, with
/// [`CustomError::DuplicateReaction`]. That constraint is what keeps two
/// racing toggles from leaving both a like and a dislike behind.
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    async fn find(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<Reaction>, CustomError>;

    /// Delete the pair's reaction if it has the given kind. Returns whether
    /// anything was removed.
    async fn remove(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
        kind: ReactionKind,
    ) -> Result<bool, CustomError>;

    async fn insert(&self, reaction: &Reaction) -> Result<(), CustomError>;

    async fn count(&self, post_id: &ObjectId, kind: ReactionKind) -> Result<u64, CustomError>;
}

pub struct MongoReactionRepository {
    collection: Collection<Reaction>,
}

impl MongoReactionRepository {
    pub fn new(db: &Database) -> Self {
        MongoReactionRepository {
            collection: db.collection::<Reaction>(REACTIONS),
        }
    }
}

#[async_trait]
impl ReactionRepository for MongoReactionRepository {
    async fn find(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<Reaction>, CustomError> {
        self.collection
            .find_one(doc! { "post_id": post_id, "user_id": user_id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch reaction", e))
    }

    async fn remove(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
        kind: ReactionKind,
    ) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! {
                "post_id": post_id,
                "user_id": user_id,
                "kind": kind.as_str(),
            })
            .await
            .map_err(|e| CustomError::from_storage("Failed to remove reaction", e))?;

        Ok(result.deleted_count > 0)
    }

    async fn insert(&self, reaction: &Reaction) -> Result<(), CustomError> {
        self.collection.insert_one(reaction).await.map_err(|e| {
            if is_duplicate_key(&e) {
                CustomError::DuplicateReaction
            } else {
                CustomError::from_storage("Failed to record reaction", e)
            }
        })?;
        Ok(())
    }

    async fn count(&self, post_id: &ObjectId, kind: ReactionKind) -> Result<u64, CustomError> {
        self.collection
            .count_documents(doc! { "post_id": post_id, "kind": kind.as_str() })
            .await
            .map_err(|e| CustomError::from_storage("Failed to count reactions", e))
    }
}
