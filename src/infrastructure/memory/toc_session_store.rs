//! In-Memory TOC Session Store Implementation

use dashmap::DashMap;
use uuid::Uuid;

use crate::application::ports::TocSessionStorePort;
use crate::domain::toc_session::TocSession;

/// 内存目录会话存储（按小说 ID 索引）
pub struct InMemoryTocSessionStore {
    sessions: DashMap<Uuid, TocSession>,
}

impl InMemoryTocSessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for InMemoryTocSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TocSessionStorePort for InMemoryTocSessionStore {
    fn put(&self, session: TocSession) {
        let novel_id = *session.novel_id().as_uuid();
        let state = session.state().name();
        if self.sessions.insert(novel_id, session).is_some() {
            tracing::debug!(novel_id = %novel_id, state = state, "TOC session replaced");
        } else {
            tracing::debug!(novel_id = %novel_id, state = state, "TOC session created");
        }
    }

    fn get(&self, novel_id: Uuid) -> Option<TocSession> {
        self.sessions.get(&novel_id).map(|s| s.clone())
    }

    fn remove(&self, novel_id: Uuid) -> bool {
        self.sessions
            .remove(&novel_id)
            .map(|_| {
                tracing::debug!(novel_id = %novel_id, "TOC session removed");
            })
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::novel::NovelId;

    #[test]
    fn test_session_lifecycle() {
        let store = InMemoryTocSessionStore::new();
        let novel_id = NovelId::new();
        let id = *novel_id.as_uuid();

        // Put
        store.put(TocSession::propose(novel_id.clone(), 1, 3, vec!["一 出発".to_string()]));
        assert_eq!(store.get(id).unwrap().end_line(), 3);

        // Replace
        store.put(TocSession::propose(novel_id, 2, 5, Vec::new()));
        assert_eq!(store.get(id).unwrap().start_line(), 2);

        // Remove
        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.get(id).is_none());
    }
}
