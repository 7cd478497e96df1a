use collector_corner_cli::{Assembler, Session};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One form per browser session. The mutex serialises actions within a
/// session; different sessions never share a store.
pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<DashMap<Uuid, SharedSession>>,
    pub assembler: Arc<Assembler>,
    pub shop_name: Arc<str>,
}

impl AppState {
    pub fn new(assembler: Assembler, shop_name: &str) -> Self {
        AppState {
            sessions: Arc::new(DashMap::new()),
            assembler: Arc::new(assembler),
            shop_name: Arc::from(shop_name),
        }
    }

    /// The session's store, created empty on first write.
    pub fn session(&self, id: Uuid) -> SharedSession {
        self.sessions.entry(id).or_default().clone()
    }

    /// Read paths use this so unknown cookies never add entries.
    pub fn existing_session(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }
}
