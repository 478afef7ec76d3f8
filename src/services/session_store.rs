use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::quiz::QuizDocument;
use crate::services::session_service::{QuizSession, SessionOptions, SessionView};

#[derive(Debug)]
struct SessionSlot {
    session: QuizSession,
    generating: bool,
    touched: Instant,
}

/// In-memory sessions keyed by id. The lock is never held across an await.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    slots: Arc<Mutex<HashMap<Uuid, SessionSlot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionSlot>> {
        self.slots.lock().expect("session store mutex poisoned")
    }

    pub fn create(&self, document: QuizDocument, options: SessionOptions) -> (Uuid, SessionView) {
        let id = Uuid::new_v4();
        let session = QuizSession::new(document, options);
        let view = session.view();
        self.lock().insert(
            id,
            SessionSlot {
                session,
                generating: false,
                touched: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, "Session created");
        (id, view)
    }

    /// Runs `f` against the session, refreshing its idle timer.
    pub fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut QuizSession) -> T) -> Result<T> {
        let mut slots = self.lock();
        let slot = slots.get_mut(&id).ok_or_else(session_not_found)?;
        slot.touched = Instant::now();
        Ok(f(&mut slot.session))
    }

    pub fn view(&self, id: Uuid) -> Result<SessionView> {
        self.with_session(id, |s| s.view())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Marks a generation as in flight for the session. Fails with a
    /// conflict while another one is still pending.
    pub fn begin_generation(&self, id: Uuid) -> Result<GenerationTicket> {
        let mut slots = self.lock();
        let slot = slots.get_mut(&id).ok_or_else(session_not_found)?;
        if slot.generating {
            return Err(Error::Conflict(
                "A quiz is already being generated for this session".to_string(),
            ));
        }
        slot.generating = true;
        slot.touched = Instant::now();
        Ok(GenerationTicket {
            store: self.clone(),
            id,
        })
    }

    /// Drops sessions idle for longer than `ttl`, skipping any with a
    /// generation in flight. Returns how many were removed.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut slots = self.lock();
        let before = slots.len();
        slots.retain(|_, slot| slot.generating || now.duration_since(slot.touched) < ttl);
        before - slots.len()
    }

    fn finish_generation(&self, id: Uuid) {
        if let Some(slot) = self.lock().get_mut(&id) {
            slot.generating = false;
        }
    }
}

fn session_not_found() -> Error {
    Error::NotFound("Session does not exist".to_string())
}

/// Held while a replacement document is generated for a session. Dropping
/// it, including through cancellation of the request, releases the guard.
#[derive(Debug)]
pub struct GenerationTicket {
    store: SessionStore,
    id: Uuid,
}

impl GenerationTicket {
    /// Replaces the session's document, starting the walkthrough over with
    /// the same options.
    pub fn complete(self, document: QuizDocument) -> Result<SessionView> {
        let mut slots = self.store.lock();
        let slot = slots.get_mut(&self.id).ok_or_else(session_not_found)?;
        slot.session = QuizSession::new(document, slot.session.options());
        slot.generating = false;
        slot.touched = Instant::now();
        Ok(slot.session.view())
    }
}

impl Drop for GenerationTicket {
    fn drop(&mut self) {
        self.store.finish_generation(self.id);
    }
}
