use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    pub author: String,
    pub category: String,
    pub user_id: ObjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub id: String,
    pub text: String,
    pub author: String,
    pub category: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Quote> for QuoteView {
    fn from(quote: Quote) -> Self {
        QuoteView {
            id: quote.id.to_hex(),
            text: quote.text,
            author: quote.author,
            category: quote.category,
            user_id: quote.user_id.to_hex(),
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    pub text: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}
