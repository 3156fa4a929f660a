pub mod chat;
pub mod compare;
pub mod pipeline;
pub mod setup;
