use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::AccessTokenCodec;
use auth::Authenticator;
use auth::PasswordHasher;
use bookkeeper_service::credential::errors::CredentialError;
use bookkeeper_service::credential::models::RefreshToken;
use bookkeeper_service::credential::ports::RefreshTokenRepository;
use bookkeeper_service::domain::credential::service::CredentialService;
use bookkeeper_service::domain::user::service::UserService;
use bookkeeper_service::inbound::http::router::create_router;
use bookkeeper_service::user::errors::UserError;
use bookkeeper_service::user::models::EmailAddress;
use bookkeeper_service::user::models::User;
use bookkeeper_service::user::models::UserId;
use bookkeeper_service::user::ports::UserRepository;
use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use tokio::sync::RwLock;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub codec: AccessTokenCodec,
    pub users: Arc<InMemoryUserRepository>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
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

        // Cheap hashing parameters keep the suite fast
        let password_hasher = PasswordHasher::with_params(8, 1, 1).unwrap();
        let authenticator = Arc::new(
            Authenticator::new(TEST_SECRET, chrono::Duration::minutes(15))
                .with_password_hasher(password_hasher.clone()),
        );

        let user_repository = Arc::new(InMemoryUserRepository::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());

        let user_service = Arc::new(
            UserService::new(Arc::clone(&user_repository)).with_password_hasher(password_hasher),
        );
        let credential_service = Arc::new(CredentialService::new(
            Arc::clone(&user_repository),
            Arc::clone(&refresh_tokens),
            authenticator,
            chrono::Duration::days(60),
        ));

        let router = create_router(
            user_service,
            credential_service,
            std::time::Duration::from_secs(10),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            codec: AccessTokenCodec::new(TEST_SECRET),
            users: user_repository,
            refresh_tokens,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/users")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in and return the `data` object of the response
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}

/// User storage honouring the same uniqueness rules as the database
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Overwrite the stored hash of the account with `email`, bypassing the service
    pub async fn overwrite_password_hash(&self, email: &str, password_hash: &str) {
        for user in self.users.write().await.values_mut() {
            if user.email.as_str() == email {
                user.password_hash = password_hash.to_string();
            }
        }
    }

    fn check_unique(users: &HashMap<UserId, User>, user: &User) -> Result<(), UserError> {
        for other in users.values().filter(|other| other.id != user.id) {
            if other.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
            if other.email == user.email {
                return Err(UserError::EmailAlreadyExists(
                    user.email.as_str().to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// Refresh token storage with the same revoke-once semantics as the database
#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: RwLock<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
    /// Number of stored records, live or not
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Inspect a stored record
    pub async fn get(&self, token: &str) -> Option<RefreshToken> {
        self.tokens.read().await.get(token).cloned()
    }

    /// Store a record directly, e.g. one that is already expired
    pub async fn put(&self, record: RefreshToken) {
        self.tokens.write().await.insert(record.token.clone(), record);
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, token: RefreshToken) -> Result<RefreshToken, CredentialError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(CredentialError::DatabaseError(
                "duplicate refresh token".to_string(),
            ));
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, CredentialError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn revoke(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, CredentialError> {
        match self.tokens.write().await.get_mut(token) {
            Some(record) => {
                record.revoke_at(revoked_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
