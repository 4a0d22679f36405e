//! In-memory [`Backend`] used by unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ApiError, Backend};
use crate::models::{
    AuditEvent, ChatTurn, Role, TokenPair, User, Visitor, VisitorId, VisitorStatus,
};

/// Build a visitor from RFC 3339 timestamps.
pub fn visitor(id: VisitorId, name: &str, status: VisitorStatus, scheduled: Option<&str>, created: &str) -> Visitor {
    let parse = |s: &str| {
        DateTime::parse_from_rfc3339(s)
            .expect("timestamp")
            .with_timezone(&Utc)
    };
    Visitor {
        id,
        name: name.to_string(),
        phone: String::new(),
        purpose: String::new(),
        status,
        host_household: None,
        scheduled_time: scheduled.map(parse),
        created_at: parse(created),
        approved_at: None,
        checked_in_at: None,
        checked_out_at: None,
    }
}

pub fn rejected(status: u16) -> ApiError {
    ApiError::Status {
        status,
        body: String::new(),
    }
}

#[derive(Default)]
pub struct FakeBackend {
    pub visitors: Mutex<Vec<Visitor>>,
    pub events: Mutex<Vec<AuditEvent>>,
    pub users: Mutex<Vec<User>>,
    pub access_token: Mutex<String>,
    pub chat_reply: Mutex<Option<String>>,
    pub chat_histories: Mutex<Vec<Vec<ChatTurn>>>,
    pub registered: Mutex<Vec<String>>,
    pub reject_login: AtomicBool,
    pub fail_lists: AtomicBool,
    pub fail_commands: AtomicBool,
    pub fail_register: AtomicBool,
    pub token_calls: AtomicU32,
    pub visitor_fetches: AtomicU32,
    pub event_fetches: AtomicU32,
    pub user_fetches: AtomicU32,
    pub commands: AtomicU32,
}

impl FakeBackend {
    pub fn with_visitors(visitors: Vec<Visitor>) -> Self {
        let fake = Self::default();
        *fake.visitors.lock().unwrap() = visitors;
        fake
    }

    pub fn set_status(&self, id: VisitorId, status: VisitorStatus) {
        if let Some(v) = self.visitors.lock().unwrap().iter_mut().find(|v| v.id == id) {
            v.status = status;
        }
    }

    fn transition(&self, id: VisitorId, to: VisitorStatus) -> Result<Visitor, ApiError> {
        self.commands.fetch_add(1, Ordering::SeqCst);
        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(rejected(400));
        }
        let mut visitors = self.visitors.lock().unwrap();
        let v = visitors
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| rejected(404))?;
        let now = Utc::now();
        match to {
            VisitorStatus::Approved => v.approved_at = Some(now),
            VisitorStatus::CheckedIn => v.checked_in_at = Some(now),
            VisitorStatus::CheckedOut => v.checked_out_at = Some(now),
            _ => {}
        }
        v.status = to;
        Ok(v.clone())
    }

    fn list<T: Clone>(&self, list: &Mutex<Vec<T>>, counter: &AtomicU32) -> Result<Vec<T>, ApiError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".into()));
        }
        Ok(list.lock().unwrap().clone())
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn obtain_token(&self, _username: &str, _password: &str) -> Result<TokenPair, ApiError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(rejected(401));
        }
        Ok(TokenPair {
            access: self.access_token.lock().unwrap().clone(),
            refresh: "refresh-token".into(),
        })
    }

    async fn list_visitors(&self) -> Result<Vec<Visitor>, ApiError> {
        self.list(&self.visitors, &self.visitor_fetches)
    }

    async fn check_in(&self, id: VisitorId) -> Result<Visitor, ApiError> {
        self.transition(id, VisitorStatus::CheckedIn)
    }

    async fn check_out(&self, id: VisitorId) -> Result<Visitor, ApiError> {
        self.transition(id, VisitorStatus::CheckedOut)
    }

    async fn approve(&self, id: VisitorId) -> Result<Visitor, ApiError> {
        self.transition(id, VisitorStatus::Approved)
    }

    async fn deny(&self, id: VisitorId) -> Result<Visitor, ApiError> {
        self.transition(id, VisitorStatus::Denied)
    }

    async fn list_events(&self) -> Result<Vec<AuditEvent>, ApiError> {
        self.list(&self.events, &self.event_fetches)
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.list(&self.users, &self.user_fetches)
    }

    async fn chat(&self, history: &[ChatTurn]) -> Result<String, ApiError> {
        self.chat_histories.lock().unwrap().push(history.to_vec());
        self.chat_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| rejected(500))
    }

    async fn register_push_token(&self, registration_id: &str) -> Result<(), ApiError> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(ApiError::Timeout);
        }
        self.registered
            .lock()
            .unwrap()
            .push(registration_id.to_string());
        Ok(())
    }
}

pub fn user(id: i64, username: &str, role: Role) -> User {
    User {
        id,
        username: username.to_string(),
        role,
        email: None,
        phone: None,
        household: None,
        household_flat_number: None,
        first_name: String::new(),
        last_name: String::new(),
    }
}
