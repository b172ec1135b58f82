pub mod claims;
pub mod conversations;
pub mod items;
pub mod system;
