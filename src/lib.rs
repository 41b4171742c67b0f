pub mod account;
pub mod cipher;
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod interactive;
pub mod keeper;
pub mod node;
pub mod session;
