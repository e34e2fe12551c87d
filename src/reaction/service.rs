use log::warn;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::post::post_repository::PostRepository;
use crate::reaction::model::{Reaction, ReactionKind, ToggleAction, ToggleOutcome};
use crate::reaction::repository::ReactionRepository;
use crate::utils::error::CustomError;

/// How many times a toggle is replayed after losing an insert race.
const MAX_TOGGLE_ATTEMPTS: usize = 3;

pub struct ReactionService {
    reactions: Arc<dyn ReactionRepository>,
    posts: Arc<dyn PostRepository>,
}

impl ReactionService {
    pub fn new(reactions: Arc<dyn ReactionRepository>, posts: Arc<dyn PostRepository>) -> Self {
        ReactionService { reactions, posts }
    }

    /// Add the user's reaction of `kind` to the post, or take it back if it
    /// is already there. Adding one kind clears the opposite kind.
    pub async fn toggle_reaction(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
        kind: ReactionKind,
    ) -> Result<ToggleOutcome, CustomError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(CustomError::NotFoundError("Post not found".to_string()));
        }

        let mut attempt = 1;
        loop {
            match self.toggle_once(post_id, user_id, kind).await {
                Err(CustomError::DuplicateReaction) if attempt < MAX_TOGGLE_ATTEMPTS => {
                    warn!(
                        "Concurrent {} on post {} by user {}, replaying toggle (attempt {})",
                        kind.as_str(),
                        post_id,
                        user_id,
                        attempt
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn toggle_once(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
        kind: ReactionKind,
    ) -> Result<ToggleOutcome, CustomError> {
        if self.reactions.remove(post_id, user_id, kind).await? {
            return Ok(ToggleOutcome::new(kind, ToggleAction::Removed));
        }

        self.reactions
            .remove(post_id, user_id, kind.opposite())
            .await?;

        self.reactions
            .insert(&Reaction::new(*post_id, *user_id, kind))
            .await?;

        // A post cascade may have swept the post since the existence check.
        if self.posts.find_by_id(post_id).await?.is_none() {
            self.reactions.remove(post_id, user_id, kind).await?;
            return Err(CustomError::NotFoundError("Post not found".to_string()));
        }

        Ok(ToggleOutcome::new(kind, ToggleAction::Added))
    }

    /// The user's current reaction to a post, if any.
    pub async fn current_reaction(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<ReactionKind>, CustomError> {
        Ok(self
            .reactions
            .find(post_id, user_id)
            .await?
            .map(|reaction| reaction.kind))
    }
}
