pub mod rest;
pub mod state;

// Re-export the handlers the binary wires into the router.
pub use rest::{
    append_session_handler, clear_sessions_handler, health_handler, list_sessions_handler,
    root_handler, version_handler,
};
