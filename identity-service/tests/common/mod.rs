#![allow(dead_code)]

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenConfig;
use identity_service::account::errors::EventPublisherError;
use identity_service::account::ports::EventPublisher;
use identity_service::domain::account::events::AccountRegisteredEvent;
use identity_service::domain::account::service::AccountService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryAccountRepository;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const BASE_URL: &str = "http://localhost:8080";

/// Event publisher that keeps every event in memory.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<AccountRegisteredEvent>>,
    failing: AtomicBool,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<AccountRegisteredEvent> {
        self.events.lock().expect("publisher lock poisoned").clone()
    }

    /// Make every subsequent publish fail like an unreachable broker.
    pub fn fail_publishes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.events()
            .into_iter()
            .rev()
            .find(|event| event.email == email)
            .map(|event| event.verification_token)
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_account_registered(
        &self,
        event: &AccountRegisteredEvent,
    ) -> Result<(), EventPublisherError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventPublisherError::PublishFailed(
                "broker unreachable".to_string(),
            ));
        }

        self.events
            .lock()
            .expect("publisher lock poisoned")
            .push(event.clone());
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: InMemoryAccountRepository,
    pub publisher: Arc<RecordingPublisher>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
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

        let repository = InMemoryAccountRepository::new();
        let publisher = Arc::new(RecordingPublisher::default());
        let authenticator = Arc::new(Authenticator::new(&TokenConfig {
            secret: JWT_SECRET.to_string(),
            issuer: "identity-service".to_string(),
            access_ttl: chrono::Duration::minutes(15),
        }));

        let account_service = Arc::new(AccountService::new(
            Arc::new(repository.clone()),
            Arc::clone(&publisher),
            Arc::clone(&authenticator),
            BASE_URL,
        ));

        let router = create_router(account_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            publisher,
            authenticator,
            api_client: reqwest::Client::new(),
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

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/register")
            .json(&serde_json::json!({
                "name": "Alice",
                "surname": "Doe",
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn verify(&self, token: &str) -> reqwest::Response {
        self.get(&format!("/auth/verify?token={}", token))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the access token.
    pub async fn access_token(&self, email: &str, password: &str) -> String {
        let body: serde_json::Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }
}
