use log::info;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::cascade::repository::CascadeRepository;
use crate::utils::error::CustomError;

/// What a post cascade removed. `post_deleted` is false when the post was
/// already gone, which is how a replayed cascade ends.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PostCascadeReport {
    pub post_deleted: bool,
    pub comments: u64,
    pub replies: u64,
    pub reactions: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct UserCascadeReport {
    pub user_deleted: bool,
    pub posts: u64,
    pub comments: u64,
    pub replies: u64,
    pub reactions: u64,
    pub quotes: u64,
}

/// Records which steps of a cascade have committed, so a failure can say
/// exactly where it stopped.
struct Progress {
    target: String,
    completed: Vec<&'static str>,
}

impl Progress {
    fn new(target: String) -> Self {
        Progress {
            target,
            completed: Vec::new(),
        }
    }

    /// A delete step. Counts towards `completed` once it succeeds.
    async fn step<T, F>(&mut self, name: &'static str, fut: F) -> Result<T, CustomError>
    where
        F: Future<Output = Result<T, CustomError>>,
    {
        let value = fut.await.map_err(|err| self.failure(name, err))?;
        self.completed.push(name);
        Ok(value)
    }

    /// A read-only step. It commits nothing, so it is never listed as
    /// completed.
    async fn lookup<T, F>(&self, name: &'static str, fut: F) -> Result<T, CustomError>
    where
        F: Future<Output = Result<T, CustomError>>,
    {
        fut.await.map_err(|err| self.failure(name, err))
    }

    fn failure(&self, name: &'static str, err: CustomError) -> CustomError {
        // Nothing has been removed yet: the plain storage error is accurate.
        if self.completed.is_empty() {
            return err;
        }
        CustomError::PartialCascadeFailure {
            target: self.target.clone(),
            step: name,
            completed: self.completed.clone(),
        }
    }
}

pub struct CascadeService {
    repo: Arc<dyn CascadeRepository>,
}

impl CascadeService {
    pub fn new(repo: Arc<dyn CascadeRepository>) -> Self {
        CascadeService { repo }
    }

    /// Delete a post with its comments, their replies and its reactions,
    /// children first. Safe to call again on a post that is already gone.
    pub async fn delete_post(&self, post_id: &ObjectId) -> Result<PostCascadeReport, CustomError> {
        let mut progress = Progress::new(format!("post {}", post_id));
        let report = self.delete_post_steps(post_id, &mut progress).await?;
        info!("Post {} cascade finished: {:?}", post_id, report);
        Ok(report)
    }

    async fn delete_post_steps(
        &self,
        post_id: &ObjectId,
        progress: &mut Progress,
    ) -> Result<PostCascadeReport, CustomError> {
        let comment_ids = progress
            .lookup("comment lookup", self.repo.comment_ids_for_post(post_id))
            .await?;
        let replies = progress
            .step("replies", self.repo.delete_replies_for_comments(&comment_ids))
            .await?;
        let comments = progress
            .step("comments", self.repo.delete_comments_for_post(post_id))
            .await?;
        let reactions = progress
            .step("reactions", self.repo.delete_reactions_for_post(post_id))
            .await?;
        let post_deleted = progress
            .step("post", self.repo.delete_post(post_id))
            .await?;

        Ok(PostCascadeReport {
            post_deleted,
            comments,
            replies,
            reactions,
        })
    }

    /// Delete a user and everything they own: their posts (each cascaded),
    /// their comments with the replies under them, their own replies,
    /// reactions and quotes.
    pub async fn delete_user(&self, user_id: &ObjectId) -> Result<UserCascadeReport, CustomError> {
        let mut progress = Progress::new(format!("user {}", user_id));
        let mut report = UserCascadeReport::default();

        let post_ids = progress
            .lookup("post lookup", self.repo.post_ids_by_author(user_id))
            .await?;
        for post_id in &post_ids {
            let post = self.delete_post_steps(post_id, &mut progress).await?;
            if post.post_deleted {
                report.posts += 1;
            }
            report.comments += post.comments;
            report.replies += post.replies;
            report.reactions += post.reactions;
        }

        let comment_ids = progress
            .lookup("comment lookup", self.repo.comment_ids_by_author(user_id))
            .await?;
        report.replies += progress
            .step(
                "replies under user comments",
                self.repo.delete_replies_for_comments(&comment_ids),
            )
            .await?;
        report.replies += progress
            .step("user replies", self.repo.delete_replies_by_author(user_id))
            .await?;
        report.comments += progress
            .step("user comments", self.repo.delete_comments_by_author(user_id))
            .await?;
        report.reactions += progress
            .step("user reactions", self.repo.delete_reactions_by_user(user_id))
            .await?;
        report.quotes += progress
            .step("user quotes", self.repo.delete_quotes_by_user(user_id))
            .await?;
        report.user_deleted = progress
            .step("user", self.repo.delete_user(user_id))
            .await?;

        info!("User {} cascade finished: {:?}", user_id, report);
        Ok(report)
    }
}
