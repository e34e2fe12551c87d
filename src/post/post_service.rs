use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::cascade::service::{CascadeService, PostCascadeReport};
use crate::comment::model::CommentThread;
use crate::comment::repository::CommentRepository;
use crate::post::post_model::{
    Category, CreatePostRequest, Post, PostCounters, PostDetail, PostView, UpdatePostRequest,
};
use crate::post::post_repository::PostRepository;
use crate::reaction::model::ReactionKind;
use crate::reaction::repository::ReactionRepository;
use crate::utils::error::CustomError;
use crate::utils::helpers::required;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    reactions: Arc<dyn ReactionRepository>,
    cascade: Arc<CascadeService>,
}

fn post_not_found() -> CustomError {
    CustomError::NotFoundError("Post not found".to_string())
}

fn parse_category(raw: &str) -> Result<Category, CustomError> {
    Category::parse(raw)
        .ok_or_else(|| CustomError::ValidationError("Invalid category specified".to_string()))
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        reactions: Arc<dyn ReactionRepository>,
        cascade: Arc<CascadeService>,
    ) -> Self {
        PostService {
            posts,
            comments,
            reactions,
            cascade,
        }
    }

    /// Likes, dislikes and comments for a post, counted from their own
    /// collections every time.
    pub async fn counters(&self, post_id: &ObjectId) -> Result<PostCounters, CustomError> {
        Ok(PostCounters {
            likes: self.reactions.count(post_id, ReactionKind::Like).await?,
            dislikes: self.reactions.count(post_id, ReactionKind::Dislike).await?,
            comments: self.comments.count_for_post(post_id).await?,
        })
    }

    async fn view(&self, post: Post) -> Result<PostView, CustomError> {
        let counts = self.counters(&post.id).await?;
        Ok(PostView::new(post, counts))
    }

    async fn views(&self, posts: Vec<Post>) -> Result<Vec<PostView>, CustomError> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.view(post).await?);
        }
        Ok(views)
    }

    async fn ensure_title_free(
        &self,
        title: &str,
        except: Option<&ObjectId>,
    ) -> Result<(), CustomError> {
        match self.posts.find_by_title(title).await? {
            Some(existing) if Some(&existing.id) != except => Err(CustomError::ConflictError(
                "Post title already exists".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub async fn create_post(
        &self,
        author_id: ObjectId,
        request: CreatePostRequest,
    ) -> Result<PostView, CustomError> {
        let (Some(title), Some(content), Some(category)) = (
            required(&request.title),
            required(&request.content),
            required(&request.category),
        ) else {
            return Err(CustomError::ValidationError(
                "Title, content and category are required".to_string(),
            ));
        };
        let category = parse_category(&category)?;

        self.ensure_title_free(&title, None).await?;

        let now = Utc::now();
        let post = Post {
            id: ObjectId::new(),
            title,
            content,
            image: required(&request.image),
            category,
            author_id,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(&post).await?;
        info!("Post {} created by {}", post.id, author_id);

        Ok(PostView::new(post, PostCounters::default()))
    }

    /// Newest first. A category filter that matches nothing is a 404, an
    /// unfiltered empty blog is just an empty list.
    pub async fn list_posts(&self, category: Option<&str>) -> Result<Vec<PostView>, CustomError> {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(parse_category)
            .transpose()?;

        let posts = self.posts.list(category).await?;
        if posts.is_empty() && category.is_some() {
            return Err(CustomError::NotFoundError(
                "No posts found for this category".to_string(),
            ));
        }
        self.views(posts).await
    }

    pub async fn posts_by_category(&self, category: &str) -> Result<Vec<PostView>, CustomError> {
        let category = Category::parse(category)
            .ok_or_else(|| CustomError::NotFoundError("Category not found".to_string()))?;

        let posts = self.posts.list(Some(category)).await?;
        if posts.is_empty() {
            return Err(CustomError::NotFoundError(
                "No posts found for this category".to_string(),
            ));
        }
        self.views(posts).await
    }

    /// Counts a view and returns the post with its comment threads.
    pub async fn get_post(&self, post_id: &ObjectId) -> Result<PostDetail, CustomError> {
        let post = self
            .posts
            .increment_views(post_id)
            .await?
            .ok_or_else(post_not_found)?;

        let mut threads = Vec::new();
        for comment in self.comments.comments_for_post(post_id).await? {
            let replies = self.comments.replies_for_comment(&comment.id).await?;
            threads.push(CommentThread::new(comment, replies));
        }

        Ok(PostDetail {
            post: self.view(post).await?,
            comments: threads,
        })
    }

    pub async fn update_post(
        &self,
        post_id: &ObjectId,
        request: UpdatePostRequest,
    ) -> Result<PostView, CustomError> {
        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(post_not_found)?;

        if let Some(title) = required(&request.title) {
            if title != post.title {
                self.ensure_title_free(&title, Some(post_id)).await?;
                post.title = title;
            }
        }
        if let Some(content) = required(&request.content) {
            post.content = content;
        }
        if let Some(category) = required(&request.category) {
            post.category = parse_category(&category)?;
        }
        if let Some(image) = required(&request.image) {
            post.image = Some(image);
        }
        post.updated_at = Utc::now();

        if !self.posts.replace(&post).await? {
            return Err(post_not_found());
        }
        self.view(post).await
    }

    /// Cascade-delete the post. Leftover dependents are swept even when the
    /// post document itself is already gone, which then reports 404.
    pub async fn delete_post(&self, post_id: &ObjectId) -> Result<PostCascadeReport, CustomError> {
        let report = self.cascade.delete_post(post_id).await?;
        if !report.post_deleted {
            return Err(post_not_found());
        }
        Ok(report)
    }

    pub fn categories(&self) -> Vec<&'static str> {
        Category::ALL.iter().map(|c| c.label()).collect()
    }
}
