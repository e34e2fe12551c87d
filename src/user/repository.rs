use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::database::db::USERS;
use crate::user::model::User;
use crate::utils::error::{CustomError, is_duplicate_key};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), CustomError>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError>;
    async fn list(&self) -> Result<Vec<User>, CustomError>;
    /// Overwrite a stored user. Returns false when the user no longer exists.
    async fn replace(&self, user: &User) -> Result<bool, CustomError>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        MongoUserRepository {
            collection: db.collection::<User>(USERS),
        }
    }
}

fn email_taken() -> CustomError {
    CustomError::ConflictError("Email already in use".to_string())
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), CustomError> {
        self.collection.insert_one(user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                email_taken()
            } else {
                CustomError::from_storage("Failed to create user", e)
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch user", e))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch user", e))
    }

    async fn list(&self) -> Result<Vec<User>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| CustomError::from_storage("Failed to fetch users", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::from_storage("Failed to collect users", e))
    }

    async fn replace(&self, user: &User) -> Result<bool, CustomError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": user.id }, user)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    email_taken()
                } else {
                    CustomError::from_storage("Failed to update user", e)
                }
            })?;

        Ok(result.matched_count > 0)
    }
}
