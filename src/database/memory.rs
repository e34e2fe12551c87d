//! In-process storage engine.
//!
//! Mirrors the MongoDB engine's constraints (unique email, unique post
//! title, one reaction per post/user pair) so services behave the same on
//! both. Used by the test suite and by `STORAGE_BACKEND=memory`.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cascade::repository::CascadeRepository;
use crate::comment::model::{Comment, Reply};
use crate::comment::repository::CommentRepository;
use crate::message::model::Message;
use crate::message::repository::MessageRepository;
use crate::post::post_model::{Category, Post};
use crate::post::post_repository::PostRepository;
use crate::quote::model::Quote;
use crate::quote::repository::QuoteRepository;
use crate::reaction::model::{Reaction, ReactionKind};
use crate::reaction::repository::ReactionRepository;
use crate::user::model::User;
use crate::user::repository::UserRepository;
use crate::utils::error::CustomError;

#[derive(Default)]
struct Tables {
    users: HashMap<ObjectId, User>,
    posts: HashMap<ObjectId, Post>,
    comments: HashMap<ObjectId, Comment>,
    replies: HashMap<ObjectId, Reply>,
    reactions: HashMap<(ObjectId, ObjectId), Reaction>,
    quotes: HashMap<ObjectId, Quote>,
    messages: HashMap<ObjectId, Message>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

fn oldest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), CustomError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(CustomError::ConflictError("Email already in use".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, CustomError> {
        let users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        Ok(newest_first(users, |u: &User| (u.created_at, u.id)))
    }

    async fn replace(&self, user: &User) -> Result<bool, CustomError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(CustomError::ConflictError("Email already in use".to_string()));
        }
        match tables.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert(&self, post: &Post) -> Result<(), CustomError> {
        let mut tables = self.tables.write().await;
        if tables.posts.values().any(|p| p.title == post.title) {
            return Err(CustomError::ConflictError(
                "Post title already exists".to_string(),
            ));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.tables.read().await.posts.get(id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, CustomError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.title == title).cloned())
    }

    async fn list(&self, category: Option<Category>) -> Result<Vec<Post>, CustomError> {
        let tables = self.tables.read().await;
        let posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect();
        Ok(newest_first(posts, |p: &Post| (p.created_at, p.id)))
    }

    async fn increment_views(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(id).map(|post| {
            post.views += 1;
            post.clone()
        }))
    }

    async fn replace(&self, post: &Post) -> Result<bool, CustomError> {
        let mut tables = self.tables.write().await;
        if tables
            .posts
            .values()
            .any(|p| p.title == post.title && p.id != post.id)
        {
            return Err(CustomError::ConflictError(
                "Post title already exists".to_string(),
            ));
        }
        match tables.posts.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert_comment(&self, comment: &Comment) -> Result<(), CustomError> {
        let mut tables = self.tables.write().await;
        tables.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn find_comment(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError> {
        Ok(self.tables.read().await.comments.get(id).cloned())
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, CustomError> {
        let comments: Vec<Comment> = self.tables.read().await.comments.values().cloned().collect();
        Ok(oldest_first(comments, |c: &Comment| (c.created_at, c.id)))
    }

    async fn comments_for_post(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        let tables = self.tables.read().await;
        let comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == *post_id)
            .cloned()
            .collect();
        Ok(oldest_first(comments, |c: &Comment| (c.created_at, c.id)))
    }

    async fn count_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == *post_id)
            .count() as u64)
    }

    async fn delete_comment(&self, id: &ObjectId) -> Result<bool, CustomError> {
        Ok(self.tables.write().await.comments.remove(id).is_some())
    }

    async fn insert_reply(&self, reply: &Reply) -> Result<(), CustomError> {
        let mut tables = self.tables.write().await;
        tables.replies.insert(reply.id, reply.clone());
        Ok(())
    }

    async fn find_reply(&self, id: &ObjectId) -> Result<Option<Reply>, CustomError> {
        Ok(self.tables.read().await.replies.get(id).cloned())
    }

    async fn list_replies(&self) -> Result<Vec<Reply>, CustomError> {
        let replies: Vec<Reply> = self.tables.read().await.replies.values().cloned().collect();
        Ok(oldest_first(replies, |r: &Reply| (r.created_at, r.id)))
    }

    async fn replies_for_comment(&self, comment_id: &ObjectId) -> Result<Vec<Reply>, CustomError> {
        let tables = self.tables.read().await;
        let replies: Vec<Reply> = tables
            .replies
            .values()
            .filter(|r| r.comment_id == *comment_id)
            .cloned()
            .collect();
        Ok(oldest_first(replies, |r: &Reply| (r.created_at, r.id)))
    }

    async fn delete_reply(&self, id: &ObjectId) -> Result<bool, CustomError> {
        Ok(self.tables.write().await.replies.remove(id).is_some())
    }

    async fn delete_replies_for_comment(&self, comment_id: &ObjectId) -> Result<u64, CustomError> {
        let mut tables = self.tables.write().await;
        let before = tables.replies.len();
        tables.replies.retain(|_, r| r.comment_id != *comment_id);
        Ok((before - tables.replies.len()) as u64)
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn find(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<Reaction>, CustomError> {
        let tables = self.tables.read().await;
        Ok(tables.reactions.get(&(*post_id, *user_id)).cloned())
    }

    async fn remove(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
        kind: ReactionKind,
    ) -> Result<bool, CustomError> {
        let mut tables = self.tables.write().await;
        let key = (*post_id, *user_id);
        if tables.reactions.get(&key).is_some_and(|r| r.kind == kind) {
            tables.reactions.remove(&key);
            return Ok(true);
        }
        Ok(false)
    }

    async fn insert(&self, reaction: &Reaction) -> Result<(), CustomError> {
        let mut tables = self.tables.write().await;
        let key = (reaction.post_id, reaction.user_id);
        if tables.reactions.contains_key(&key) {
            return Err(CustomError::DuplicateReaction);
        }
        tables.reactions.insert(key, reaction.clone());
        Ok(())
    }

    async fn count(&self, post_id: &ObjectId, kind: ReactionKind) -> Result<u64, CustomError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reactions
            .values()
            .filter(|r| r.post_id == *post_id && r.kind == kind)
            .count() as u64)
    }
}

#[async_trait]
impl QuoteRepository for MemoryStore {
    async fn insert(&self, quote: &Quote) -> Result<(), CustomError> {
        let mut tables = self.tables.write().await;
        tables.quotes.insert(quote.id, quote.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Quote>, CustomError> {
        Ok(self.tables.read().await.quotes.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Quote>, CustomError> {
        let quotes: Vec<Quote> = self.tables.read().await.quotes.values().cloned().collect();
        Ok(newest_first(quotes, |q: &Quote| (q.created_at, q.id)))
    }

    async fn replace(&self, quote: &Quote) -> Result<bool, CustomError> {
        let mut tables = self.tables.write().await;
        match tables.quotes.get_mut(&quote.id) {
            Some(stored) => {
                *stored = quote.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        Ok(self.tables.write().await.quotes.remove(id).is_some())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn insert(&self, message: &Message) -> Result<(), CustomError> {
        let mut tables = self.tables.write().await;
        tables.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Message>, CustomError> {
        let messages: Vec<Message> = self.tables.read().await.messages.values().cloned().collect();
        Ok(newest_first(messages, |m: &Message| (m.created_at, m.id)))
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        Ok(self.tables.write().await.messages.remove(id).is_some())
    }
}

#[async_trait]
impl CascadeRepository for MemoryStore {
    async fn comment_ids_for_post(&self, post_id: &ObjectId) -> Result<Vec<ObjectId>, CustomError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == *post_id)
            .map(|c| c.id)
            .collect())
    }

    async fn comment_ids_by_author(
        &self,
        user_id: &ObjectId,
    ) -> Result<Vec<ObjectId>, CustomError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.author_id == *user_id)
            .map(|c| c.id)
            .collect())
    }

    async fn post_ids_by_author(&self, user_id: &ObjectId) -> Result<Vec<ObjectId>, CustomError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.author_id == *user_id)
            .map(|p| p.id)
            .collect())
    }

    async fn delete_replies_for_comments(
        &self,
        comment_ids: &[ObjectId],
    ) -> Result<u64, CustomError> {
        let mut tables = self.tables.write().await;
        let before = tables.replies.len();
        tables
            .replies
            .retain(|_, r| !comment_ids.contains(&r.comment_id));
        Ok((before - tables.replies.len()) as u64)
    }

    async fn delete_comments_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|_, c| c.post_id != *post_id);
        Ok((before - tables.comments.len()) as u64)
    }

    async fn delete_reactions_for_post(&self, post_id: &ObjectId) -> Result<u64, CustomError> {
        let mut tables = self.tables.write().await;
        let before = tables.reactions.len();
        tables.reactions.retain(|(post, _), _| post != post_id);
        Ok((before - tables.reactions.len()) as u64)
    }

    async fn delete_post(&self, post_id: &ObjectId) -> Result<bool, CustomError> {
        Ok(self.tables.write().await.posts.remove(post_id).is_some())
    }

    async fn delete_replies_by_author(&self, user_id: &ObjectId) -> Result<u64, CustomError> {
        let mut tables = self.tables.write().await;
        let before = tables.replies.len();
        tables.replies.retain(|_, r| r.author_id != *user_id);
        Ok((before - tables.replies.len()) as u64)
    }

    async fn delete_comments_by_author(&self, user_id: &ObjectId) -> Result<u64, CustomError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|_, c| c.author_id != *user_id);
        Ok((before - tables.comments.len()) as u64)
    }

    async fn delete_reactions_by_user(&self, user_id: &ObjectId) -> Result<u64, CustomError> {
        let mut tables = self.tables.write().await;
        let before = tables.reactions.len();
        tables.reactions.retain(|(_, user), _| user != user_id);
        Ok((before - tables.reactions.len()) as u64)
    }

    async fn delete_quotes_by_user(&self, user_id: &ObjectId) -> Result<u64, CustomError> {
        let mut tables = self.tables.write().await;
        let before = tables.quotes.len();
        tables.quotes.retain(|_, q| q.user_id != *user_id);
        Ok((before - tables.quotes.len()) as u64)
    }

    async fn delete_user(&self, user_id: &ObjectId) -> Result<bool, CustomError> {
        Ok(self.tables.write().await.users.remove(user_id).is_some())
    }
}
