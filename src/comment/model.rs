use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub post_id: ObjectId,
    pub author_id: ObjectId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reply {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub comment_id: ObjectId,
    pub author_id: ObjectId,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReplyView {
    pub id: String,
    pub comment_id: String,
    pub author_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reply> for ReplyView {
    fn from(reply: Reply) -> Self {
        ReplyView {
            id: reply.id.to_hex(),
            comment_id: reply.comment_id.to_hex(),
            author_id: reply.author_id.to_hex(),
            message: reply.message,
            created_at: reply.created_at,
            updated_at: reply.updated_at,
        }
    }
}

/// A comment with its replies attached.
#[derive(Debug, Serialize)]
pub struct CommentThread {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub body: String,
    pub replies: Vec<ReplyView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentThread {
    pub fn new(comment: Comment, replies: Vec<Reply>) -> Self {
        CommentThread {
            id: comment.id.to_hex(),
            post_id: comment.post_id.to_hex(),
            author_id: comment.author_id.to_hex(),
            body: comment.body,
            replies: replies.into_iter().map(ReplyView::from).collect(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub body: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateReplyRequest {
    pub message: Option<String>,
}
