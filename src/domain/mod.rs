pub mod chat;
pub mod email;
pub mod page;
