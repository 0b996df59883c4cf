use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `password_hasher` - Hasher used for new and changed passwords
    pub fn new(repository: Arc<UR>, password_hasher: PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Hash off the async executor; Argon2 is deliberately slow.
    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                UserError::Password(e)
            })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(command.password).await?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            full_name: command.full_name,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<User, UserError> {
        match identifier {
            LoginIdentifier::Username(username) => self
                .repository
                .find_by_username(username)
                .await?
                .ok_or(UserError::NotFoundByUsername(username.to_string())),
            LoginIdentifier::Email(email) => self
                .repository
                .find_by_email(email)
                .await?
                .ok_or(UserError::NotFoundByEmail(email.to_string())),
        }
    }

    async fn list_users(&self, request: PageRequest) -> Result<UserPage, UserError> {
        let users = self
            .repository
            .list(request.limit(), request.offset())
            .await?;
        let total = self.repository.count().await?;

        Ok(UserPage {
            users,
            request,
            total,
        })
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_full_name) = command.full_name {
            user.full_name = Some(new_full_name);
        }

        let password_changed = command.password.is_some();
        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(new_password).await?;
        }

        let updated_user = self.repository.update(user).await?;

        tracing::info!(
            user_id = %updated_user.id,
            password_changed,
            "User updated"
        );

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::FullName;
    use crate::domain::user::models::Username;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn list(&self, limit: u64, offset: u64) -> Result<Vec<User>, UserError>;
            async fn count(&self) -> Result<u64, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(1024, 1, 1).unwrap()
    }

    fn service(repository: MockTestUserRepository) -> UserService<MockTestUserRepository> {
        UserService::new(Arc::new(repository), hasher())
    }

    fn sample_user(id: UserId) -> User {
        User {
            id,
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            full_name: None,
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repository = MockTestUserRepository::new();

        // Set up mock expectations
        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.email.as_str() == "test@example.com"
                    && user.full_name.as_ref().map(FullName::as_str) == Some("Test User")
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = service(repository);

        let command = CreateUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            full_name: Some(FullName::new("Test User".to_string()).unwrap()),
            password: Password::new("password123".to_string()).unwrap(),
        };

        let user = service.create_user(command).await.unwrap();
        assert_eq!(user.username.as_str(), "testuser");
        assert_eq!(user.email.as_str(), "test@example.com");
        // Password is hashed with real Argon2
        assert!(user.password_hash.starts_with("$argon2"));
        assert!(hasher().verify("password123", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = service(repository);

        let command = CreateUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test2@example.com".to_string()).unwrap(),
            full_name: None,
            password: Password::new("password456".to_string()).unwrap(),
        };

        let result = service.create_user(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repository = MockTestUserRepository::new();

        let user_id = UserId::new();
        let returned_user = sample_user(user_id);
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));

        let user = service(repository).get_user(&user_id).await.unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository).get_user(&UserId::new()).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_user_by_identifier_username() {
        let mut repository = MockTestUserRepository::new();

        let returned_user = sample_user(UserId::new());
        repository
            .expect_find_by_username()
            .withf(|u| u.as_str() == "testuser")
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        repository.expect_find_by_email().times(0);

        let identifier = LoginIdentifier::parse("testuser".to_string()).unwrap();
        let user = service(repository)
            .get_user_by_identifier(&identifier)
            .await
            .unwrap();
        assert_eq!(user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_get_user_by_identifier_email_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_find_by_username().times(0);

        let identifier = LoginIdentifier::parse("nobody@example.com".to_string()).unwrap();
        let result = service(repository).get_user_by_identifier(&identifier).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFoundByEmail(_)));
    }

    #[tokio::test]
    async fn test_get_user_by_identifier_store_failure() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));

        let identifier = LoginIdentifier::parse("testuser".to_string()).unwrap();
        let result = service(repository).get_user_by_identifier(&identifier).await;
        assert!(matches!(result.unwrap_err(), UserError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let mut repository = MockTestUserRepository::new();

        let user_id = UserId::new();
        let existing = sample_user(user_id);
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(|user| user.password_hash.starts_with("$argon2id$"))
            .times(1)
            .returning(|user| Ok(user));

        let command = UpdateUserCommand {
            username: None,
            email: None,
            full_name: None,
            password: Some(Password::new("new_password".to_string()).unwrap()),
        };

        let user = service(repository)
            .update_user(&user_id, command)
            .await
            .unwrap();
        assert!(hasher().verify("new_password", &user.password_hash).unwrap());
        assert_eq!(user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_update_user_keeps_hash_without_password() {
        let mut repository = MockTestUserRepository::new();

        let user_id = UserId::new();
        let existing = sample_user(user_id);
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(|user| {
                user.password_hash == "$argon2id$test_hash"
                    && user.username.as_str() == "renamed"
                    && user.full_name.as_ref().map(FullName::as_str) == Some("Renamed User")
            })
            .times(1)
            .returning(|user| Ok(user));

        let command = UpdateUserCommand {
            username: Some(Username::new("renamed".to_string()).unwrap()),
            email: None,
            full_name: Some(FullName::new("Renamed User".to_string()).unwrap()),
            password: None,
        };

        assert!(service(repository)
            .update_user(&user_id, command)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_list_users_pages_through_repository() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_list()
            .withf(|limit, offset| *limit == 20 && *offset == 40)
            .times(1)
            .returning(|_, _| Ok(vec![sample_user(UserId::new())]));
        repository.expect_count().times(1).returning(|| Ok(41));

        let page = service(repository)
            .list_users(PageRequest::new(Some(3), Some(20)))
            .await
            .unwrap();

        assert_eq!(page.users.len(), 1);
        assert_eq!(page.total, 41);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.request.page(), 3);
    }

    #[tokio::test]
    async fn test_list_users_store_failure() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_list()
            .times(1)
            .returning(|_, _| Err(UserError::DatabaseError("connection refused".to_string())));
        repository.expect_count().times(0);

        let result = service(repository).list_users(PageRequest::default()).await;
        assert!(matches!(result.unwrap_err(), UserError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete()
            .times(1)
            .returning(|id| Err(UserError::NotFound(id.to_string())));

        let result = service(repository).delete_user(&UserId::new()).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }
}
