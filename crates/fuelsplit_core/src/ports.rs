//! crates/fuelsplit_core/src/ports.rs
//!
//! Defines the service contract (trait) for the history store. The trait
//! forms the boundary of the hexagonal architecture: the core stays
//! independent of whether history lives behind an HTTP API or a database.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{HistoryEntry, Session};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations. Transport failures and
/// non-success responses are collapsed into these two cases; the caller
/// surfaces them as transient notices and never treats them as fatal.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The store could not be reached, or answered with a non-success
    /// status on an idempotent operation.
    #[error("History store unreachable: {0}")]
    Unreachable(String),
    /// The store refused an append, e.g. for a malformed payload.
    #[error("History store rejected the request: {0}")]
    Rejected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Port (Trait)
//=========================================================================================

/// CRUD facade over the remote history collection. Pure I/O boundary; no
/// business logic lives behind it.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Lists all persisted sessions, newest first.
    async fn list_entries(&self) -> PortResult<Vec<HistoryEntry>>;

    /// Appends one finalized session and returns its server-assigned id.
    async fn append_session(&self, session: &Session) -> PortResult<Uuid>;

    /// Deletes every entry in the store.
    async fn clear_all(&self) -> PortResult<()>;
}
