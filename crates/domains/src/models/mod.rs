//! # Domain Models
//!
//! These structs represent the core entities of Reclaim.
//! We use UUID v7 for time-ordered, globally unique identification; message
//! pagination relies on that ordering.

pub mod claim;
pub mod item;
pub mod message;
pub mod thread;

pub use claim::{Claim, ClaimStatus};
pub use item::{Item, ItemStatus, NewItem};
pub use message::{Conversation, Message, MessagePage};
pub use thread::{check_claim_allows_conversation, Thread};
