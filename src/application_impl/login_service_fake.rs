use crate::application_port::{LoginError, LoginInput, LoginService};
use crate::domain_model::{UserId, UserProfile};
use std::collections::HashMap;

struct FakeUser {
    password: String,
    username: String,
    admin: bool,
}

/// In-memory login collaborator for wiring and tests. Real user persistence
/// and password hashing live outside this service.
pub struct FakeLoginService {
    users: HashMap<String, FakeUser>,
}

impl FakeLoginService {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
        }
        .with_user("ada@example.com", "correct-horse", "adalovelace", true)
        .with_user("grace@example.com", "hopper-radar", "gracehopper", false)
    }

    pub fn with_user(
        mut self,
        email: &str,
        password: &str,
        username: &str,
        admin: bool,
    ) -> Self {
        self.users.insert(
            email.to_string(),
            FakeUser {
                password: password.to_string(),
                username: username.to_string(),
                admin,
            },
        );
        self
    }

    fn fake_id(email: &str) -> UserId {
        UserId(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, email.as_bytes()).to_string())
    }
}

impl Default for FakeLoginService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LoginService for FakeLoginService {
    async fn validate(&self, input: LoginInput) -> Result<UserProfile, LoginError> {
        let mut errors = Vec::new();
        if input.email.is_none() {
            errors.push("The Email is missing.");
        }
        if input.password.is_none() {
            errors.push("The Password is missing.");
        }
        if !errors.is_empty() {
            return Err(LoginError::Validation(errors.join(" ")));
        }

        let email = input.email.unwrap_or_default();
        let password = input.password.unwrap_or_default();

        let user = self
            .users
            .get(&email)
            .ok_or(LoginError::InvalidCredentials)?;
        if user.password != password {
            return Err(LoginError::InvalidCredentials);
        }

        Ok(UserProfile {
            id: Self::fake_id(&email),
            email,
            username: user.username.clone(),
            admin: user.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_credentials_resolve_a_profile() {
        let service = FakeLoginService::new();
        let profile = service
            .validate(LoginInput {
                email: Some("ada@example.com".to_string()),
                password: Some("correct-horse".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(profile.username, "adalovelace");
        assert!(profile.admin);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let service = FakeLoginService::new();
        let result = service
            .validate(LoginInput {
                email: Some("ada@example.com".to_string()),
                password: Some("wrong".to_string()),
            })
            .await;
        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn missing_fields_list_every_message() {
        let service = FakeLoginService::new();
        let result = service
            .validate(LoginInput {
                email: None,
                password: None,
            })
            .await;
        match result {
            Err(LoginError::Validation(message)) => {
                assert_eq!(message, "The Email is missing. The Password is missing.");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn same_email_always_resolves_the_same_id() {
        let service = FakeLoginService::new();
        let input = || LoginInput {
            email: Some("grace@example.com".to_string()),
            password: Some("hopper-radar".to_string()),
        };
        let a = service.validate(input()).await.unwrap();
        let b = service.validate(input()).await.unwrap();
        assert_eq!(a.id, b.id);
    }
}
