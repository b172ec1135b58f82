//! # Services
//!
//! Business logic for Reclaim. Each service receives its repositories as
//! `Arc<dyn Port>` handles at construction; nothing here touches global state.

pub mod claims;
pub mod conversations;
pub mod items;
pub mod messages;
mod notify;

pub use claims::ClaimService;
pub use conversations::{ConversationGate, MessageLimits};
pub use items::ItemService;
pub use messages::{split_page, MessageHistory};
