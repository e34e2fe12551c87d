use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::comment::model::{Comment, Reply};
use crate::database::db::{COMMENTS, REPLIES};
use crate::utils::error::CustomError;

/// Comments and the replies hanging off them.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert_comment(&self, comment: &Comment) -> Result<(), CustomError>;
    async fn find_comment(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError>;
    async fn list_comments(&self) -> Result<Vec<Comment>, CustomError>;
    async fn comments_for_post(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError>;
    async fn count_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError>;
    async fn delete_comment(&self, id: &ObjectId) -> Result<bool, CustomError>;

    async fn insert_reply(&self, reply: &Reply) -> Result<(), CustomError>;
    async fn find_reply(&self, id: &ObjectId) -> Result<Option<Reply>, CustomError>;
    async fn list_replies(&self) -> Result<Vec<Reply>, CustomError>;
    async fn replies_for_comment(&self, comment_id: &ObjectId) -> Result<Vec<Reply>, CustomError>;
    async fn delete_reply(&self, id: &ObjectId) -> Result<bool, CustomError>;
    async fn delete_replies_for_comment(&self, comment_id: &ObjectId) -> Result<u64, CustomError>;
}

pub struct MongoCommentRepository {
    comments: Collection<Comment>,
    replies: Collection<Reply>,
}

impl MongoCommentRepository {
    pub fn new(db: &Database) -> Self {
        MongoCommentRepository {
            comments: db.collection::<Comment>(COMMENTS),
            replies: db.collection::<Reply>(REPLIES),
        }
    }

    async fn find_comments(&self, filter: Document) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .comments
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch comments", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::from_storage("Failed to collect comments", e))
    }

    async fn find_replies(&self, filter: Document) -> Result<Vec<Reply>, CustomError> {
        let cursor = self
            .replies
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch replies", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::from_storage("Failed to collect replies", e))
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    async fn insert_comment(&self, comment: &Comment) -> Result<(), CustomError> {
        self.comments
            .insert_one(comment)
            .await
            .map_err(|e| CustomError::from_storage("Failed to add comment", e))?;
        Ok(())
    }

    async fn find_comment(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError> {
        self.comments
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch comment", e))
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, CustomError> {
        self.find_comments(doc! {}).await
    }

    async fn comments_for_post(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        self.find_comments(doc! { "post_id": post_id }).await
    }

    async fn count_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError> {
        self.comments
            .count_documents(doc! { "post_id": post_id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to count comments", e))
    }

    async fn delete_comment(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .comments
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to delete comment", e))?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_reply(&self, reply: &Reply) -> Result<(), CustomError> {
        self.replies
            .insert_one(reply)
            .await
            .map_err(|e| CustomError::from_storage("Failed to add reply", e))?;
        Ok(())
    }

    async fn find_reply(&self, id: &ObjectId) -> Result<Option<Reply>, CustomError> {
        self.replies
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch reply", e))
    }

    async fn list_replies(&self) -> Result<Vec<Reply>, CustomError> {
        self.find_replies(doc! {}).await
    }

    async fn replies_for_comment(&self, comment_id: &ObjectId) -> Result<Vec<Reply>, CustomError> {
        self.find_replies(doc! { "comment_id": comment_id }).await
    }

    async fn delete_reply(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .replies
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to delete reply", e))?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_replies_for_comment(&self, comment_id: &ObjectId) -> Result<u64, CustomError> {
        let result = self
            .replies
            .delete_many(doc! { "comment_id": comment_id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to delete replies", e))?;
        Ok(result.deleted_count)
    }
}
