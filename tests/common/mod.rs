//! Common Test Utilities
//!
//! In-memory stores and a `TestApp` that drives the real router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use fake::{
    faker::{internet::en::SafeEmail, name::en::FirstName},
    Fake,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use material_chat::config::{
    CorsSettings, DatabaseSettings, HttpSettings, JwtSettings, PremiumSettings,
    RateLimitSettings, ServerSettings, Settings, SnowflakeSettings, UploadSettings,
};
use material_chat::domain::{
    ChatMessage, Chatroom, ChatroomRepository, Membership, MessageRepository, User,
    UserRepository,
};
use material_chat::presentation::http::create_router;
use material_chat::shared::error::AppError;
use material_chat::startup::AppState;

pub const PASSWORD: &str = "password123";

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    chatrooms: HashMap<i64, Chatroom>,
    members: Vec<Membership>,
    messages: HashMap<i64, ChatMessage>,
}

/// One in-memory database backing all three repository traits
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("store lock poisoned")
    }

    pub fn user(&self, id: i64) -> Option<User> {
        self.tables().users.get(&id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self
            .tables()
            .users
            .values()
            .filter(|u| u.active)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables();
        match tables.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = User {
                    updated_at: Utc::now(),
                    ..user.clone()
                };
                Ok(stored.clone())
            }
            None => Err(AppError::NotFound("User not found".into())),
        }
    }

    async fn deactivate(&self, id: i64) -> Result<(), AppError> {
        if let Some(user) = self.tables().users.get_mut(&id) {
            user.active = false;
        }
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.tables().users.values().any(|u| u.email == email))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl ChatroomRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Chatroom>, AppError> {
        Ok(self.tables().chatrooms.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Chatroom>, AppError> {
        let name = name.to_lowercase();
        Ok(self
            .tables()
            .chatrooms
            .values()
            .find(|c| c.name.to_lowercase() == name)
            .cloned())
    }

    async fn list_visible(&self, user_id: i64) -> Result<Vec<Chatroom>, AppError> {
        let tables = self.tables();
        let mut rooms: Vec<Chatroom> = tables
            .chatrooms
            .values()
            .filter(|c| {
                !c.private
                    || tables
                        .members
                        .iter()
                        .any(|m| m.chatroom_id == c.id && m.user_id == user_id)
            })
            .cloned()
            .collect();
        rooms.sort_by_key(|c| c.id);
        Ok(rooms)
    }

    async fn count_owned_by(&self, owner_id: i64) -> Result<i64, AppError> {
        Ok(self
            .tables()
            .chatrooms
            .values()
            .filter(|c| c.owner_id == owner_id)
            .count() as i64)
    }

    async fn create_with_owner(&self, chatroom: &Chatroom) -> Result<Chatroom, AppError> {
        let mut tables = self.tables();
        let name = chatroom.name.to_lowercase();
        if tables.chatrooms.values().any(|c| c.name.to_lowercase() == name) {
            return Err(AppError::Conflict(
                "A chatroom with this name already exists".into(),
            ));
        }
        tables.chatrooms.insert(chatroom.id, chatroom.clone());
        tables.members.push(Membership {
            chatroom_id: chatroom.id,
            user_id: chatroom.owner_id,
            joined_at: chatroom.created_at,
        });
        Ok(chatroom.clone())
    }

    async fn update(&self, chatroom: &Chatroom) -> Result<Chatroom, AppError> {
        let mut tables = self.tables();
        match tables.chatrooms.get_mut(&chatroom.id) {
            Some(stored) => {
                *stored = chatroom.clone();
                Ok(stored.clone())
            }
            None => Err(AppError::NotFound("Chatroom not found".into())),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables();
        tables.chatrooms.remove(&id);
        tables.members.retain(|m| m.chatroom_id != id);
        tables.messages.retain(|_, m| m.chatroom_id != id);
        Ok(())
    }

    async fn add_member(&self, chatroom_id: i64, user_id: i64) -> Result<Membership, AppError> {
        let mut tables = self.tables();
        if let Some(existing) = tables
            .members
            .iter()
            .find(|m| m.chatroom_id == chatroom_id && m.user_id == user_id)
        {
            return Ok(existing.clone());
        }
        let membership = Membership {
            chatroom_id,
            user_id,
            joined_at: Utc::now(),
        };
        tables.members.push(membership.clone());
        Ok(membership)
    }

    async fn remove_member(&self, chatroom_id: i64, user_id: i64) -> Result<(), AppError> {
        self.tables()
            .members
            .retain(|m| !(m.chatroom_id == chatroom_id && m.user_id == user_id));
        Ok(())
    }

    async fn is_member(&self, chatroom_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self
            .tables()
            .members
            .iter()
            .any(|m| m.chatroom_id == chatroom_id && m.user_id == user_id))
    }

    async fn list_members(&self, chatroom_id: i64) -> Result<Vec<Membership>, AppError> {
        Ok(self
            .tables()
            .members
            .iter()
            .filter(|m| m.chatroom_id == chatroom_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatMessage>, AppError> {
        Ok(self.tables().messages.get(&id).cloned())
    }

    async fn find_by_chatroom(
        &self,
        chatroom_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let mut messages: Vec<ChatMessage> = self
            .tables()
            .messages
            .values()
            .filter(|m| m.chatroom_id == chatroom_id && before.map_or(true, |b| m.id < b))
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.id.cmp(&a.id));
        messages.truncate(limit as usize);
        Ok(messages)
    }

    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage, AppError> {
        self.tables().messages.insert(message.id, message.clone());
        Ok(message.clone())
    }

    async fn update(&self, message: &ChatMessage) -> Result<ChatMessage, AppError> {
        let mut tables = self.tables();
        match tables.messages.get_mut(&message.id) {
            Some(stored) => {
                *stored = message.clone();
                Ok(stored.clone())
            }
            None => Err(AppError::NotFound("Message not found".into())),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.tables().messages.remove(&id);
        Ok(())
    }
}

/// Settings suitable for tests: no database, generous limits
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: "test-secret-that-is-at-least-32-characters".into(),
            expires_in_days: 90,
        },
        snowflake: SnowflakeSettings {
            machine_id: 1,
            node_id: 0,
        },
        rate_limit: RateLimitSettings {
            max_requests: 1000,
            window_seconds: 3600,
            message: "Too many requests from this IP.\n Please try again in an hour.".into(),
            trust_proxy_headers: false,
        },
        http: HttpSettings {
            json_body_limit: 10 * 1024,
            hpp_whitelist: vec!["duration".into()],
            static_dir: None,
        },
        uploads: UploadSettings {
            dir: std::env::temp_dir()
                .join("material-chat-test-uploads")
                .to_string_lossy()
                .into_owned(),
            max_bytes: 1024 * 1024,
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        premium: PremiumSettings {
            free_chatroom_limit: 3,
            monthly_days: 30,
            yearly_days: 365,
        },
        environment: "test".into(),
    }
}

/// Response with the body decoded as JSON (`Null` when empty or not JSON)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A signed-up user and its token
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// Test application over the in-memory store
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let state = AppState::new(settings, store.clone(), store.clone(), store.clone());
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), token).await
    }

    pub async fn patch(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body), Some(token)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, Some(token)).await
    }

    /// Sign up a user with generated details
    pub async fn signup(&self) -> TestUser {
        let name: String = FirstName().fake();
        let email = unique_email();

        let response = self
            .post(
                "/api/v1/users/signup",
                json!({
                    "name": name,
                    "email": email,
                    "password": PASSWORD,
                    "passwordConfirm": PASSWORD,
                }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        TestUser {
            id: response.body["user"]["id"]
                .as_str()
                .expect("user id")
                .to_string(),
            email,
            token: response.body["token"]
                .as_str()
                .expect("token")
                .to_string(),
        }
    }

    /// Create a chatroom and return its id
    pub async fn create_chatroom(&self, token: &str, name: &str, private: bool) -> TestResponse {
        self.post(
            "/api/v1/chatrooms",
            json!({ "name": name, "description": "test room", "private": private }),
            Some(token),
        )
        .await
    }
}

/// Unique, lowercase email address
pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}-{}", uuid::Uuid::new_v4().simple(), email.to_lowercase())
}
