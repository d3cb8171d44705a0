//! services/cli/src/http.rs
//!
//! This module contains the HTTP adapter, which is the concrete
//! implementation of the `HistoryStore` port against the remote history
//! service. Transport failures map to `Unreachable`; a refused append
//! maps to `Rejected`.

use async_trait::async_trait;
use fuelsplit_core::domain::{HistoryEntry, Session};
use fuelsplit_core::ports::{HistoryStore, PortError, PortResult};
use serde::Deserialize;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `HistoryStore` port over the history
/// service's REST API.
#[derive(Clone)]
pub struct HttpHistoryStore {
    client: reqwest::Client,
    sessions_url: String,
}

/// Shape of the service's append response: `{ "ok": true, "id": ... }`.
#[derive(Deserialize)]
struct AppendResponse {
    id: Uuid,
}

impl HttpHistoryStore {
    /// Creates a new adapter rooted at the service base URL,
    /// e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            sessions_url: format!("{}/api/sessions", base_url.trim_end_matches('/')),
        }
    }
}

//=========================================================================================
// `HistoryStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl HistoryStore for HttpHistoryStore {
    async fn list_entries(&self) -> PortResult<Vec<HistoryEntry>> {
        let response = self
            .client
            .get(&self.sessions_url)
            .send()
            .await
            .map_err(|e| PortError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unreachable(format!(
                "history fetch failed with status {}",
                response.status()
            )));
        }

        response
            .json::<Vec<HistoryEntry>>()
            .await
            .map_err(|e| PortError::Unreachable(e.to_string()))
    }

    async fn append_session(&self, session: &Session) -> PortResult<Uuid> {
        let response = self
            .client
            .post(&self.sessions_url)
            .json(session)
            .send()
            .await
            .map_err(|e| PortError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::Rejected(format!(
                "save failed with status {status}: {body}"
            )));
        }

        response
            .json::<AppendResponse>()
            .await
            .map(|r| r.id)
            .map_err(|e| PortError::Rejected(e.to_string()))
    }

    async fn clear_all(&self) -> PortResult<()> {
        let response = self
            .client
            .delete(&self.sessions_url)
            .send()
            .await
            .map_err(|e| PortError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unreachable(format!(
                "clear failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
