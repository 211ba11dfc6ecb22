// State management module
// Handles shared application state for request handlers

pub mod app_state;

pub use app_state::AppState;
