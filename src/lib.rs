pub mod chat;
pub mod core;
pub mod llm;
pub mod logging;
pub mod rag;
pub mod server;
pub mod state;
