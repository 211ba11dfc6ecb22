//! API module
//!
//! Contains HTTP request handlers for the chat proxy endpoints

pub mod chat;
