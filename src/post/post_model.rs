use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::comment::model::CommentThread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "FAITH & SPIRITUALITY")]
    FaithAndSpirituality,
    #[serde(rename = "PERSONAL GROWTH & SELF DISCOVERY")]
    PersonalGrowth,
    #[serde(rename = "KINDNESS & COMPASSION")]
    KindnessAndCompassion,
    #[serde(rename = "VLOG")]
    Vlog,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::FaithAndSpirituality,
        Category::PersonalGrowth,
        Category::KindnessAndCompassion,
        Category::Vlog,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::FaithAndSpirituality => "FAITH & SPIRITUALITY",
            Category::PersonalGrowth => "PERSONAL GROWTH & SELF DISCOVERY",
            Category::KindnessAndCompassion => "KINDNESS & COMPASSION",
            Category::Vlog => "VLOG",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        let value = value.trim();
        Category::ALL.into_iter().find(|c| c.label() == value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: Category,
    pub author_id: ObjectId,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counts derived from the reaction and comment collections at read time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PostCounters {
    pub likes: u64,
    pub dislikes: u64,
    pub comments: u64,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: Category,
    pub author_id: String,
    pub views: i64,
    pub counts: PostCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, counts: PostCounters) -> Self {
        PostView {
            id: post.id.to_hex(),
            title: post.title,
            content: post.content,
            image: post.image,
            category: post.category,
            author_id: post.author_id.to_hex(),
            views: post.views,
            counts,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostView,
    pub comments: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostQuery {
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_round_trip_through_labels() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.label()), Some(category));
        }
        assert_eq!(Category::parse("COOKING"), None);
    }

    #[test]
    fn category_serializes_as_label() {
        let json = serde_json::to_string(&Category::KindnessAndCompassion).unwrap();
        assert_eq!(json, "\"KINDNESS & COMPASSION\"");
    }
}
