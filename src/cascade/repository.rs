use async_trait::async_trait;
use mongodb::bson::{Bson, Document, doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::database::db::{COMMENTS, POSTS, QUOTES, REACTIONS, REPLIES, USERS};
use crate::utils::error::CustomError;

/// The individual delete steps a cascade is built from.
///
/// Every delete is a filter-based `delete_many`/`delete_one`, so replaying
/// a step that already ran removes nothing and succeeds.
#[async_trait]
pub trait CascadeRepository: Send + Sync {
    async fn comment_ids_for_post(&self, post_id: &ObjectId) -> Result<Vec<ObjectId>, CustomError>;
    async fn comment_ids_by_author(&self, user_id: &ObjectId)
    -> Result<Vec<ObjectId>, CustomError>;
    async fn post_ids_by_author(&self, user_id: &ObjectId) -> Result<Vec<ObjectId>, CustomError>;

    async fn delete_replies_for_comments(&self, comment_ids: &[ObjectId])
    -> Result<u64, CustomError>;
    async fn delete_comments_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError>;
    async fn delete_reactions_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError>;
    async fn delete_post(&self, post_id: &ObjectId) -> Result<bool, CustomError>;

    async fn delete_replies_by_author(&self, user_id: &ObjectId) -> Result<u64, CustomError>;
    async fn delete_comments_by_author(&self, user_id: &ObjectId) -> Result<u64, CustomError>;
    async fn delete_reactions_by_user(&self, user_id: &ObjectId) -> Result<u64, CustomError>;
    async fn delete_quotes_by_user(&self, user_id: &ObjectId) -> Result<u64, CustomError>;
    async fn delete_user(&self, user_id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoCascadeRepository {
    users: Collection<Document>,
    posts: Collection<Document>,
    comments: Collection<Document>,
    replies: Collection<Document>,
    reactions: Collection<Document>,
    quotes: Collection<Document>,
}

impl MongoCascadeRepository {
    pub fn new(db: &Database) -> Self {
        MongoCascadeRepository {
            users: db.collection(USERS),
            posts: db.collection(POSTS),
            comments: db.collection(COMMENTS),
            replies: db.collection(REPLIES),
            reactions: db.collection(REACTIONS),
            quotes: db.collection(QUOTES),
        }
    }
}

async fn ids_matching(
    collection: &Collection<Document>,
    filter: Document,
    context: &str,
) -> Result<Vec<ObjectId>, CustomError> {
    let values = collection
        .distinct("_id", filter)
        .await
        .map_err(|e| CustomError::from_storage(context, e))?;

    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Bson::ObjectId(id) => Some(id),
            _ => None,
        })
        .collect())
}

async fn delete_matching(
    collection: &Collection<Document>,
    filter: Document,
    context: &str,
) -> Result<u64, CustomError> {
    let result = collection
        .delete_many(filter)
        .await
        .map_err(|e| CustomError::from_storage(context, e))?;
    Ok(result.deleted_count)
}

#[async_trait]
impl CascadeRepository for MongoCascadeRepository {
    async fn comment_ids_for_post(&self, post_id: &ObjectId) -> Result<Vec<ObjectId>, CustomError> {
        ids_matching(
            &self.comments,
            doc! { "post_id": post_id },
            "Failed to look up comments",
        )
        .await
    }

    async fn comment_ids_by_author(
        &self,
        user_id: &ObjectId,
    ) -> Result<Vec<ObjectId>, CustomError> {
        ids_matching(
            &self.comments,
            doc! { "author_id": user_id },
            "Failed to look up comments",
        )
        .await
    }

    async fn post_ids_by_author(&self, user_id: &ObjectId) -> Result<Vec<ObjectId>, CustomError> {
        ids_matching(
            &self.posts,
            doc! { "author_id": user_id },
            "Failed to look up posts",
        )
        .await
    }

    async fn delete_replies_for_comments(
        &self,
        comment_ids: &[ObjectId],
    ) -> Result<u64, CustomError> {
        if comment_ids.is_empty() {
            return Ok(0);
        }
        delete_matching(
            &self.replies,
            doc! { "comment_id": { "$in": comment_ids.to_vec() } },
            "Failed to delete replies",
        )
        .await
    }

    async fn delete_comments_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError> {
        delete_matching(
            &self.comments,
            doc! { "post_id": post_id },
            "Failed to delete comments",
        )
        .await
    }

    async fn delete_reactions_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError> {
        delete_matching(
            &self.reactions,
            doc! { "post_id": post_id },
            "Failed to delete reactions",
        )
        .await
    }

    async fn delete_post(&self, post_id: &ObjectId) -> Result<bool, CustomError> {
        let deleted =
            delete_matching(&self.posts, doc! { "_id": post_id }, "Failed to delete post").await?;
        Ok(deleted > 0)
    }

    async fn delete_replies_by_author(&self, user_id: &ObjectId) -> Result<u64, CustomError> {
        delete_matching(
            &self.replies,
            doc! { "author_id": user_id },
            "Failed to delete replies",
        )
        .await
    }

    async fn delete_comments_by_author(&self, user_id: &ObjectId) -> Result<u64, CustomError> {
        delete_matching(
            &self.comments,
            doc! { "author_id": user_id },
            "Failed to delete comments",
        )
        .await
    }

    async fn delete_reactions_by_user(&self, user_id: &ObjectId) -> Result<u64, CustomError> {
        delete_matching(
            &self.reactions,
            doc! { "user_id": user_id },
            "Failed to delete reactions",
        )
        .await
    }

    async fn delete_quotes_by_user(&self, user_id: &ObjectId) -> Result<u64, CustomError> {
        delete_matching(
            &self.quotes,
            doc! { "user_id": user_id },
            "Failed to delete quotes",
        )
        .await
    }

    async fn delete_user(&self, user_id: &ObjectId) -> Result<bool, CustomError> {
        let deleted =
            delete_matching(&self.users, doc! { "_id": user_id }, "Failed to delete user").await?;
        Ok(deleted > 0)
    }
}
