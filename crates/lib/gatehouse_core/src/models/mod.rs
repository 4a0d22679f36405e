//! Wire models for the visitor-management backend.
//!
//! Field names follow the backend's snake_case JSON. Records are owned by the
//! server; the client only reads them and issues commands.

pub mod auth;
pub mod chat;
pub mod event;
pub mod user;
pub mod visitor;

pub use auth::{Role, TokenClaims, TokenPair};
pub use chat::{ChatMessage, ChatSender, ChatTurn, ChatTurnRole};
pub use event::AuditEvent;
pub use user::User;
pub use visitor::{Household, Visitor, VisitorId, VisitorStatus};
