use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::message::model::{CreateMessageRequest, Message, MessageView};
use crate::message::repository::MessageRepository;
use crate::utils::error::CustomError;
use crate::utils::helpers::required;
use crate::utils::password_validation::validate_email;

pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        MessageService { messages }
    }

    pub async fn add_message(
        &self,
        request: CreateMessageRequest,
    ) -> Result<MessageView, CustomError> {
        let (Some(names), Some(email), Some(subject), Some(message)) = (
            required(&request.names),
            required(&request.email),
            required(&request.subject),
            required(&request.message),
        ) else {
            return Err(CustomError::ValidationError(
                "All fields are required".to_string(),
            ));
        };

        let email = email.to_lowercase();
        validate_email(&email)?;

        let now = Utc::now();
        let message = Message {
            id: ObjectId::new(),
            names,
            email,
            subject,
            message,
            created_at: now,
            updated_at: now,
        };
        self.messages.insert(&message).await?;
        info!("Contact message {} received", message.id);

        Ok(message.into())
    }

    pub async fn list_messages(&self) -> Result<Vec<MessageView>, CustomError> {
        Ok(self
            .messages
            .list()
            .await?
            .into_iter()
            .map(MessageView::from)
            .collect())
    }

    pub async fn delete_message(&self, id: &ObjectId) -> Result<(), CustomError> {
        if !self.messages.delete(id).await? {
            return Err(CustomError::NotFoundError("Message not found".to_string()));
        }
        Ok(())
    }
}
