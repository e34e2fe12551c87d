use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::cascade::service::{CascadeService, UserCascadeReport};
use crate::config::AppConfig;
use crate::middleware::auth::create_token;
use crate::user::model::{
    AuthPayload, CreateUserRequest, LoginRequest, PublicUser, Role, UpdateUserRequest, User,
};
use crate::user::repository::UserRepository;
use crate::utils::error::CustomError;
use crate::utils::hashing;
use crate::utils::helpers::required;
use crate::utils::password_validation::{validate_email, validate_password};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    cascade: Arc<CascadeService>,
    jwt_secret: String,
    jwt_expires_in_hours: i64,
    bcrypt_cost: u32,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn user_not_found() -> CustomError {
    CustomError::NotFoundError("User not found".to_string())
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cascade: Arc<CascadeService>,
        config: &AppConfig,
    ) -> Self {
        UserService {
            users,
            cascade,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expires_in_hours: config.jwt_expires_in_hours,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    fn hash(&self, password: &str) -> Result<String, CustomError> {
        hashing::hash_password(password, self.bcrypt_cost).map_err(|e| {
            log::error!("Password hashing failed: {}", e);
            CustomError::InternalServerError("Failed to secure password".to_string())
        })
    }

    fn issue_token(&self, user: &User) -> Result<String, CustomError> {
        create_token(
            &user.id,
            user.role,
            &self.jwt_secret,
            self.jwt_expires_in_hours,
        )
    }

    pub async fn register(&self, request: CreateUserRequest) -> Result<AuthPayload, CustomError> {
        let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
            required(&request.first_name),
            required(&request.last_name),
            required(&request.email),
            request.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(CustomError::ValidationError(
                "All fields are required".to_string(),
            ));
        };

        let email = normalize_email(&email);
        validate_email(&email)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(CustomError::ConflictError(
                "Email already in use".to_string(),
            ));
        }

        validate_password(&password)?;

        let now = Utc::now();
        let user = User {
            id: ObjectId::new(),
            first_name,
            last_name,
            email,
            password: self.hash(&password)?,
            profile: required(&request.profile),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        self.users.insert(&user).await?;
        info!("Registered user {}", user.id);

        let token = self.issue_token(&user)?;
        Ok(AuthPayload {
            user: user.into(),
            token,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthPayload, CustomError> {
        let (Some(email), Some(password)) = (
            required(&request.email),
            request.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(CustomError::ValidationError(
                "Email and password are required".to_string(),
            ));
        };

        let invalid = || CustomError::UnauthorizedError("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_email(&normalize_email(&email))
            .await?
            .ok_or_else(invalid)?;

        if !hashing::verify_password(&password, &user.password).map_err(|_| invalid())? {
            return Err(invalid());
        }

        let token = self.issue_token(&user)?;
        Ok(AuthPayload {
            user: user.into(),
            token,
        })
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        self.users.find_by_id(id).await
    }

    pub async fn get_user(&self, id: &ObjectId) -> Result<PublicUser, CustomError> {
        self.users
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(user_not_found)
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, CustomError> {
        Ok(self
            .users
            .list()
            .await?
            .into_iter()
            .map(PublicUser::from)
            .collect())
    }

    pub async fn update_user(
        &self,
        id: &ObjectId,
        request: UpdateUserRequest,
    ) -> Result<PublicUser, CustomError> {
        let mut user = self.users.find_by_id(id).await?.ok_or_else(user_not_found)?;

        if let Some(email) = required(&request.email) {
            let email = normalize_email(&email);
            if email != user.email {
                validate_email(&email)?;
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(CustomError::ConflictError(
                        "Email already in use".to_string(),
                    ));
                }
                user.email = email;
            }
        }

        match (request.password.as_deref(), request.new_password.as_deref()) {
            (Some(current), Some(new_password)) => {
                let matches = hashing::verify_password(current, &user.password)
                    .map_err(|_| CustomError::InternalServerError("Invalid credentials".into()))?;
                if !matches {
                    return Err(CustomError::UnauthorizedError(
                        "Current password is incorrect".to_string(),
                    ));
                }
                validate_password(new_password)?;
                user.password = self.hash(new_password)?;
            }
            (None, Some(_)) => {
                return Err(CustomError::ValidationError(
                    "Current password is required to set a new one".to_string(),
                ));
            }
            _ => {}
        }

        if let Some(first_name) = required(&request.first_name) {
            user.first_name = first_name;
        }
        if let Some(last_name) = required(&request.last_name) {
            user.last_name = last_name;
        }
        if let Some(profile) = required(&request.profile) {
            user.profile = Some(profile);
        }
        user.updated_at = Utc::now();

        if !self.users.replace(&user).await? {
            return Err(user_not_found());
        }
        Ok(user.into())
    }

    pub async fn change_role(&self, id: &ObjectId, role: &str) -> Result<PublicUser, CustomError> {
        let role = Role::parse(role)
            .ok_or_else(|| CustomError::ValidationError("Invalid role specified".to_string()))?;

        let mut user = self.users.find_by_id(id).await?.ok_or_else(user_not_found)?;
        user.role = role;
        user.updated_at = Utc::now();

        if !self.users.replace(&user).await? {
            return Err(user_not_found());
        }
        info!("User {} is now {:?}", user.id, role);
        Ok(user.into())
    }

    /// Cascade-delete the account. The cascade runs even when the user row
    /// is already gone so leftovers from an interrupted attempt are swept.
    pub async fn delete_user(&self, id: &ObjectId) -> Result<UserCascadeReport, CustomError> {
        let report = self.cascade.delete_user(id).await?;
        if !report.user_deleted {
            return Err(user_not_found());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn service(store: &MemoryStore) -> UserService {
        UserService::new(
            Arc::new(store.clone()),
            Arc::new(CascadeService::new(Arc::new(store.clone()))),
            &AppConfig::for_memory("test-secret"),
        )
    }

    fn signup(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            first_name: Some("Grace".into()),
            last_name: Some("Okafor".into()),
            email: Some(email.into()),
            password: Some("hunter2024".into()),
            profile: None,
        }
    }

    #[actix_web::test]
    async fn register_then_login() {
        let store = MemoryStore::new();
        let service = service(&store);

        let registered = service.register(signup(" Grace@Example.com ")).await.unwrap();
        assert_eq!(registered.user.email, "grace@example.com");
        assert_eq!(registered.user.role, Role::User);

        let logged_in = service
            .login(LoginRequest {
                email: Some("grace@example.com".into()),
                password: Some("hunter2024".into()),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[actix_web::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let service = service(&store);
        service.register(signup("dup@example.com")).await.unwrap();

        let err = service.register(signup("DUP@example.com")).await.unwrap_err();
        assert!(matches!(err, CustomError::ConflictError(_)));
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorized() {
        let store = MemoryStore::new();
        let service = service(&store);
        service.register(signup("a@example.com")).await.unwrap();

        let err = service
            .login(LoginRequest {
                email: Some("a@example.com".into()),
                password: Some("nottheone1".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::UnauthorizedError(_)));
    }

    #[actix_web::test]
    async fn missing_fields_are_rejected() {
        let store = MemoryStore::new();
        let service = service(&store);
        let mut request = signup("b@example.com");
        request.last_name = Some("   ".into());

        let err = service.register(request).await.unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));
    }

    #[actix_web::test]
    async fn password_change_needs_current_password() {
        let store = MemoryStore::new();
        let service = service(&store);
        let user = service.register(signup("c@example.com")).await.unwrap().user;
        let id = ObjectId::parse_str(&user.id).unwrap();

        let err = service
            .update_user(
                &id,
                UpdateUserRequest {
                    password: Some("wrongpass1".into()),
                    new_password: Some("newpass123".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::UnauthorizedError(_)));

        service
            .update_user(
                &id,
                UpdateUserRequest {
                    password: Some("hunter2024".into()),
                    new_password: Some("newpass123".into()),
                    first_name: Some("G.".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let login = service
            .login(LoginRequest {
                email: Some("c@example.com".into()),
                password: Some("newpass123".into()),
            })
            .await
            .unwrap();
        assert_eq!(login.user.first_name, "G.");
    }

    #[actix_web::test]
    async fn change_role_validates_role() {
        let store = MemoryStore::new();
        let service = service(&store);
        let user = service.register(signup("d@example.com")).await.unwrap().user;
        let id = ObjectId::parse_str(&user.id).unwrap();

        assert!(service.change_role(&id, "superuser").await.is_err());
        let promoted = service.change_role(&id, "admin").await.unwrap();
        assert_eq!(promoted.role, Role::Admin);
    }

    #[actix_web::test]
    async fn deleting_twice_is_not_found_the_second_time() {
        let store = MemoryStore::new();
        let service = service(&store);
        let user = service.register(signup("e@example.com")).await.unwrap().user;
        let id = ObjectId::parse_str(&user.id).unwrap();

        assert!(service.delete_user(&id).await.unwrap().user_deleted);
        assert!(matches!(
            service.delete_user(&id).await.unwrap_err(),
            CustomError::NotFoundError(_)
        ));
    }
}
