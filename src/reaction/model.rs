use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn opposite(self) -> ReactionKind {
        match self {
            ReactionKind::Like => ReactionKind::Dislike,
            ReactionKind::Dislike => ReactionKind::Like,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }
}

/// One like or dislike. At most one exists per (post, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub post_id: ObjectId,
    pub user_id: ObjectId,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(post_id: ObjectId, user_id: ObjectId, kind: ReactionKind) -> Self {
        Reaction {
            id: ObjectId::new(),
            post_id,
            user_id,
            kind,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Added,
    Removed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    pub kind: ReactionKind,
    pub message: String,
}

impl ToggleOutcome {
    pub fn new(kind: ReactionKind, action: ToggleAction) -> Self {
        let verb = match action {
            ToggleAction::Added => "added",
            ToggleAction::Removed => "removed",
        };
        ToggleOutcome {
            action,
            kind,
            message: format!("Your {} {}", kind.as_str(), verb),
        }
    }
}
