#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::Identity;
use auth::PasswordHasher;
use auth::SigningSecret;
use auth::TokenIssuer;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::outbound::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    /// Signs tokens with the server's secret, for crafting edge cases
    pub token_issuer: TokenIssuer,
}

/// A registered user and the token it logged in with.
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub token: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let secret = SigningSecret::new(TEST_SECRET).expect("Invalid test secret");

        // Cheap Argon2 parameters keep the suite fast
        let password_hasher =
            PasswordHasher::with_cost(1024, 1, 1).expect("Invalid test hashing cost");

        let user_repository = Arc::new(InMemoryUserRepository::new());
        let user_service = Arc::new(UserService::new(user_repository, password_hasher.clone()));

        let authenticator = Arc::new(
            Authenticator::new(&secret, Duration::hours(1)).with_password_hasher(password_hasher),
        );

        let router = create_router(user_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
            token_issuer: TokenIssuer::new(&secret),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register through the API and return the response body.
    pub async fn register(&self, username: &str, email: &str) -> Value {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": TEST_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in with a username or email and return the access token.
    pub async fn login(&self, identifier: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({
                "username": identifier,
                "password": TEST_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }

    /// Register and log in a fresh user.
    pub async fn create_user(&self, username: &str) -> TestUser {
        let email = format!("{}@example.com", username);
        let body = self.register(username, &email).await;
        let token = self.login(username).await;

        TestUser {
            id: body["data"]["id"].as_str().unwrap().to_string(),
            username: username.to_string(),
            email,
            token,
        }
    }

    /// A correctly signed token for `user` that expired an hour ago.
    pub fn expired_token(&self, user: &TestUser) -> String {
        let identity = Identity::new(&user.id, &user.username, &user.email);
        self.token_issuer
            .issue_at(&identity, Utc::now() - Duration::hours(2), Duration::hours(1))
            .expect("Failed to sign token")
    }
}
