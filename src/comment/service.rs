use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::comment::model::{
    Comment, CommentThread, CreateCommentRequest, CreateReplyRequest, Reply, ReplyView,
};
use crate::comment::repository::CommentRepository;
use crate::post::post_repository::PostRepository;
use crate::utils::error::CustomError;
use crate::utils::helpers::required;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

fn comment_not_found() -> CustomError {
    CustomError::NotFoundError("Comment not found".to_string())
}

fn reply_not_found() -> CustomError {
    CustomError::NotFoundError("Reply not found".to_string())
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        CommentService { comments, posts }
    }

    async fn thread(&self, comment: Comment) -> Result<CommentThread, CustomError> {
        let replies = self.comments.replies_for_comment(&comment.id).await?;
        Ok(CommentThread::new(comment, replies))
    }

    pub async fn add_comment(
        &self,
        post_id: &ObjectId,
        author_id: ObjectId,
        request: CreateCommentRequest,
    ) -> Result<CommentThread, CustomError> {
        let body = required(&request.body)
            .ok_or_else(|| CustomError::ValidationError("Comment body is required".to_string()))?;

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(CustomError::NotFoundError("Post not found".to_string()));
        }

        let now = Utc::now();
        let comment = Comment {
            id: ObjectId::new(),
            post_id: *post_id,
            author_id,
            body,
            created_at: now,
            updated_at: now,
        };
        self.comments.insert_comment(&comment).await?;

        // A post cascade may have swept the post since the existence check.
        if self.posts.find_by_id(post_id).await?.is_none() {
            self.comments.delete_comment(&comment.id).await?;
            return Err(CustomError::NotFoundError("Post not found".to_string()));
        }
        info!("Comment {} added to post {}", comment.id, post_id);

        Ok(CommentThread::new(comment, Vec::new()))
    }

    pub async fn list_comments(&self) -> Result<Vec<CommentThread>, CustomError> {
        let mut threads = Vec::new();
        for comment in self.comments.list_comments().await? {
            threads.push(self.thread(comment).await?);
        }
        Ok(threads)
    }

    pub async fn get_comment(&self, id: &ObjectId) -> Result<CommentThread, CustomError> {
        let comment = self
            .comments
            .find_comment(id)
            .await?
            .ok_or_else(comment_not_found)?;
        self.thread(comment).await
    }

    /// Replies go first so a failure never leaves replies under a missing
    /// comment.
    pub async fn delete_comment(&self, id: &ObjectId) -> Result<u64, CustomError> {
        if self.comments.find_comment(id).await?.is_none() {
            return Err(comment_not_found());
        }
        let replies = self.comments.delete_replies_for_comment(id).await?;
        if !self.comments.delete_comment(id).await? {
            return Err(comment_not_found());
        }
        info!("Comment {} deleted with {} replies", id, replies);
        Ok(replies)
    }

    pub async fn add_reply(
        &self,
        comment_id: &ObjectId,
        author_id: ObjectId,
        request: CreateReplyRequest,
    ) -> Result<ReplyView, CustomError> {
        let message = required(&request.message)
            .ok_or_else(|| CustomError::ValidationError("Reply message is required".to_string()))?;

        if self.comments.find_comment(comment_id).await?.is_none() {
            return Err(comment_not_found());
        }

        let now = Utc::now();
        let reply = Reply {
            id: ObjectId::new(),
            comment_id: *comment_id,
            author_id,
            message,
            created_at: now,
            updated_at: now,
        };
        self.comments.insert_reply(&reply).await?;

        if self.comments.find_comment(comment_id).await?.is_none() {
            self.comments.delete_reply(&reply.id).await?;
            return Err(comment_not_found());
        }

        Ok(reply.into())
    }

    pub async fn list_replies(&self) -> Result<Vec<ReplyView>, CustomError> {
        Ok(self
            .comments
            .list_replies()
            .await?
            .into_iter()
            .map(ReplyView::from)
            .collect())
    }

    pub async fn get_reply(&self, id: &ObjectId) -> Result<ReplyView, CustomError> {
        self.comments
            .find_reply(id)
            .await?
            .map(ReplyView::from)
            .ok_or_else(reply_not_found)
    }

    pub async fn delete_reply(&self, id: &ObjectId) -> Result<(), CustomError> {
        if !self.comments.delete_reply(id).await? {
            return Err(reply_not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::service::CascadeService;
    use crate::database::MemoryStore;
    use crate::post::post_model::{Category, Post};
    use async_trait::async_trait;

    async fn setup() -> (MemoryStore, CommentService, ObjectId) {
        let store = MemoryStore::new();
        let now = Utc::now();
        let post = Post {
            id: ObjectId::new(),
            title: "Gratitude".into(),
            content: "List three things.".into(),
            image: None,
            category: Category::FaithAndSpirituality,
            author_id: ObjectId::new(),
            views: 0,
            created_at: now,
            updated_at: now,
        };
        PostRepository::insert(&store, &post).await.unwrap();
        let service = CommentService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (store, service, post.id)
    }

    fn comment(body: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            body: Some(body.into()),
        }
    }

    fn reply(message: &str) -> CreateReplyRequest {
        CreateReplyRequest {
            message: Some(message.into()),
        }
    }

    #[actix_web::test]
    async fn comment_requires_body_and_existing_post() {
        let (_, service, post_id) = setup().await;

        assert!(matches!(
            service.add_comment(&post_id, ObjectId::new(), comment("  ")).await,
            Err(CustomError::ValidationError(_))
        ));
        assert!(matches!(
            service
                .add_comment(&ObjectId::new(), ObjectId::new(), comment("hi"))
                .await,
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[actix_web::test]
    async fn reply_needs_an_existing_comment() {
        let (_, service, _) = setup().await;
        assert!(matches!(
            service
                .add_reply(&ObjectId::new(), ObjectId::new(), reply("hello"))
                .await,
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[actix_web::test]
    async fn deleting_a_comment_takes_its_replies() {
        let (store, service, post_id) = setup().await;
        let thread = service
            .add_comment(&post_id, ObjectId::new(), comment("First!"))
            .await
            .unwrap();
        let comment_id = ObjectId::parse_str(&thread.id).unwrap();

        for text in ["one", "two"] {
            service
                .add_reply(&comment_id, ObjectId::new(), reply(text))
                .await
                .unwrap();
        }
        assert_eq!(service.get_comment(&comment_id).await.unwrap().replies.len(), 2);

        assert_eq!(service.delete_comment(&comment_id).await.unwrap(), 2);
        assert!(store.list_replies().await.unwrap().is_empty());
        assert!(matches!(
            service.get_comment(&comment_id).await,
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[actix_web::test]
    async fn replies_can_be_fetched_and_deleted() {
        let (_, service, post_id) = setup().await;
        let thread = service
            .add_comment(&post_id, ObjectId::new(), comment("Nice"))
            .await
            .unwrap();
        let comment_id = ObjectId::parse_str(&thread.id).unwrap();
        let created = service
            .add_reply(&comment_id, ObjectId::new(), reply("Thanks"))
            .await
            .unwrap();
        let reply_id = ObjectId::parse_str(&created.id).unwrap();

        assert_eq!(service.get_reply(&reply_id).await.unwrap().message, "Thanks");
        assert_eq!(service.list_replies().await.unwrap().len(), 1);

        service.delete_reply(&reply_id).await.unwrap();
        assert!(matches!(
            service.delete_reply(&reply_id).await,
            Err(CustomError::NotFoundError(_))
        ));
    }

    /// Removes the parent (post or comment) just before each insert lands,
    /// as a delete racing with the add would.
    struct SweepingComments {
        inner: MemoryStore,
        cascade: CascadeService,
    }

    #[async_trait]
    impl CommentRepository for SweepingComments {
        async fn insert_comment(&self, comment: &Comment) -> Result<(), CustomError> {
            self.cascade.delete_post(&comment.post_id).await?;
            CommentRepository::insert_comment(&self.inner, comment).await
        }
        async fn find_comment(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError> {
            CommentRepository::find_comment(&self.inner, id).await
        }
        async fn list_comments(&self) -> Result<Vec<Comment>, CustomError> {
            CommentRepository::list_comments(&self.inner).await
        }
        async fn comments_for_post(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
            CommentRepository::comments_for_post(&self.inner, post_id).await
        }
        async fn count_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError> {
            CommentRepository::count_for_post(&self.inner, post_id).await
        }
        async fn delete_comment(&self, id: &ObjectId) -> Result<bool, CustomError> {
            CommentRepository::delete_comment(&self.inner, id).await
        }
        async fn insert_reply(&self, reply: &Reply) -> Result<(), CustomError> {
            CommentRepository::delete_replies_for_comment(&self.inner, &reply.comment_id).await?;
            CommentRepository::delete_comment(&self.inner, &reply.comment_id).await?;
            CommentRepository::insert_reply(&self.inner, reply).await
        }
        async fn find_reply(&self, id: &ObjectId) -> Result<Option<Reply>, CustomError> {
            CommentRepository::find_reply(&self.inner, id).await
        }
        async fn list_replies(&self) -> Result<Vec<Reply>, CustomError> {
            CommentRepository::list_replies(&self.inner).await
        }
        async fn replies_for_comment(&self, comment_id: &ObjectId) -> Result<Vec<Reply>, CustomError> {
            CommentRepository::replies_for_comment(&self.inner, comment_id).await
        }
        async fn delete_reply(&self, id: &ObjectId) -> Result<bool, CustomError> {
            CommentRepository::delete_reply(&self.inner, id).await
        }
        async fn delete_replies_for_comment(&self, comment_id: &ObjectId) -> Result<u64, CustomError> {
            CommentRepository::delete_replies_for_comment(&self.inner, comment_id).await
        }
    }

    fn sweeping(store: &MemoryStore) -> CommentService {
        let comments = SweepingComments {
            inner: store.clone(),
            cascade: CascadeService::new(Arc::new(store.clone())),
        };
        CommentService::new(Arc::new(comments), Arc::new(store.clone()))
    }

    #[actix_web::test]
    async fn comment_racing_a_post_delete_is_not_left_behind() {
        let (store, _, post_id) = setup().await;
        let service = sweeping(&store);

        let err = service
            .add_comment(&post_id, ObjectId::new(), comment("Too late"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomError::NotFoundError(_)));
        assert!(PostRepository::find_by_id(&store, &post_id).await.unwrap().is_none());
        assert!(store.comments_for_post(&post_id).await.unwrap().is_empty());
        assert!(store.list_comments().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn reply_racing_a_comment_delete_is_not_left_behind() {
        let (store, service, post_id) = setup().await;
        let thread = service
            .add_comment(&post_id, ObjectId::new(), comment("Soon gone"))
            .await
            .unwrap();
        let comment_id = ObjectId::parse_str(&thread.id).unwrap();

        let err = sweeping(&store)
            .add_reply(&comment_id, ObjectId::new(), reply("Too late"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomError::NotFoundError(_)));
        assert!(store.find_comment(&comment_id).await.unwrap().is_none());
        assert!(store.list_replies().await.unwrap().is_empty());
    }
}
