use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::middleware::auth::AuthenticatedUser;
use crate::quote::model::{Quote, QuoteRequest, QuoteView};
use crate::quote::repository::QuoteRepository;
use crate::utils::error::CustomError;
use crate::utils::helpers::required;

pub struct QuoteService {
    quotes: Arc<dyn QuoteRepository>,
}

fn quote_not_found() -> CustomError {
    CustomError::NotFoundError("Quote not found".to_string())
}

/// Quotes are managed by admins, and only by the admin who added them.
fn ensure_owner(caller: &AuthenticatedUser, quote: &Quote) -> Result<(), CustomError> {
    caller.require_admin()?;
    if quote.user_id != caller.id {
        return Err(CustomError::ForbiddenError(
            "You can only manage quotes you added".to_string(),
        ));
    }
    Ok(())
}

impl QuoteService {
    pub fn new(quotes: Arc<dyn QuoteRepository>) -> Self {
        QuoteService { quotes }
    }

    pub async fn add_quote(
        &self,
        caller: &AuthenticatedUser,
        request: QuoteRequest,
    ) -> Result<QuoteView, CustomError> {
        caller.require_admin()?;

        let (Some(text), Some(author), Some(category)) = (
            required(&request.text),
            required(&request.author),
            required(&request.category),
        ) else {
            return Err(CustomError::ValidationError(
                "Text, author and category are required".to_string(),
            ));
        };

        let now = Utc::now();
        let quote = Quote {
            id: ObjectId::new(),
            text,
            author,
            category,
            user_id: caller.id,
            created_at: now,
            updated_at: now,
        };
        self.quotes.insert(&quote).await?;
        info!("Quote {} added by {}", quote.id, caller.id);

        Ok(quote.into())
    }

    pub async fn list_quotes(&self) -> Result<Vec<QuoteView>, CustomError> {
        Ok(self
            .quotes
            .list()
            .await?
            .into_iter()
            .map(QuoteView::from)
            .collect())
    }

    pub async fn get_quote(&self, id: &ObjectId) -> Result<QuoteView, CustomError> {
        self.quotes
            .find_by_id(id)
            .await?
            .map(QuoteView::from)
            .ok_or_else(quote_not_found)
    }

    pub async fn update_quote(
        &self,
        caller: &AuthenticatedUser,
        id: &ObjectId,
        request: QuoteRequest,
    ) -> Result<QuoteView, CustomError> {
        let mut quote = self
            .quotes
            .find_by_id(id)
            .await?
            .ok_or_else(quote_not_found)?;
        ensure_owner(caller, &quote)?;

        if let Some(text) = required(&request.text) {
            quote.text = text;
        }
        if let Some(author) = required(&request.author) {
            quote.author = author;
        }
        if let Some(category) = required(&request.category) {
            quote.category = category;
        }
        quote.updated_at = Utc::now();

        if !self.quotes.replace(&quote).await? {
            return Err(quote_not_found());
        }
        Ok(quote.into())
    }

    pub async fn delete_quote(
        &self,
        caller: &AuthenticatedUser,
        id: &ObjectId,
    ) -> Result<(), CustomError> {
        let quote = self
            .quotes
            .find_by_id(id)
            .await?
            .ok_or_else(quote_not_found)?;
        ensure_owner(caller, &quote)?;

        if !self.quotes.delete(id).await? {
            return Err(quote_not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::user::model::Role;

    fn caller(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: ObjectId::new(),
            role,
        }
    }

    fn request(text: &str) -> QuoteRequest {
        QuoteRequest {
            text: Some(text.into()),
            author: Some("Maya Angelou".into()),
            category: Some("Courage".into()),
        }
    }

    #[actix_web::test]
    async fn only_admins_add_quotes() {
        let service = QuoteService::new(Arc::new(MemoryStore::new()));

        assert!(matches!(
            service.add_quote(&caller(Role::User), request("Hi")).await,
            Err(CustomError::ForbiddenError(_))
        ));
        assert!(matches!(
            service
                .add_quote(&caller(Role::Admin), QuoteRequest::default())
                .await,
            Err(CustomError::ValidationError(_))
        ));
    }

    #[actix_web::test]
    async fn only_the_owning_admin_can_change_a_quote() {
        let service = QuoteService::new(Arc::new(MemoryStore::new()));
        let owner = caller(Role::Admin);
        let other_admin = caller(Role::Admin);

        let quote = service.add_quote(&owner, request("Rise")).await.unwrap();
        let id = ObjectId::parse_str(&quote.id).unwrap();

        assert!(matches!(
            service.delete_quote(&other_admin, &id).await,
            Err(CustomError::ForbiddenError(_))
        ));

        let updated = service
            .update_quote(
                &owner,
                &id,
                QuoteRequest {
                    text: Some("Still I rise".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "Still I rise");
        assert_eq!(updated.author, "Maya Angelou");

        service.delete_quote(&owner, &id).await.unwrap();
        assert!(matches!(
            service.get_quote(&id).await,
            Err(CustomError::NotFoundError(_))
        ));
    }
}
