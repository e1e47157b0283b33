//! strategy/pool.rs
//! Bounded per-backend arena of job sessions.
//!
//! The map lock covers the capacity check, session setup and removal. Engine
//! calls run under the session's own mutex, so independent jobs do not
//! serialize on I/O while calls for one job stay ordered.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::strategy::{HandlerError, StrategyType};
use crate::types::JobId;

pub(crate) type Session<S> = Arc<Mutex<S>>;

pub(crate) fn lock_session<S>(session: &Session<S>) -> MutexGuard<'_, S> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SessionPool<S> {
    strategy: StrategyType,
    capacity: usize,
    sessions: Mutex<HashMap<JobId, Session<S>>>,
}

impl<S> SessionPool<S> {
    pub fn new(strategy: StrategyType, capacity: usize) -> Self {
        Self { strategy, capacity, sessions: Mutex::new(HashMap::new()) }
    }

    fn map(&self) -> MutexGuard<'_, HashMap<JobId, Session<S>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn exhausted(&self) -> HandlerError {
        HandlerError::NotAvailable { strategy: self.strategy, capacity: self.capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.map().contains_key(&id)
    }

    pub fn get(&self, id: JobId) -> Option<Session<S>> {
        self.map().get(&id).cloned()
    }

    /// Existing session for `id`, or a new one from `open` if a slot is free.
    ///
    /// `open` runs under the map lock. Opening an engine can emit bytes to the
    /// job's sink when it is dropped, so it is only built once the slot is
    /// certain.
    pub fn acquire<F>(&self, id: JobId, open: F) -> Result<Session<S>, HandlerError>
    where
        F: FnOnce() -> Result<S, HandlerError>,
    {
        let mut map = self.map();
        if let Some(existing) = map.get(&id) {
            return Ok(existing.clone());
        }
        if map.len() >= self.capacity {
            return Err(self.exhausted());
        }
        let session = Arc::new(Mutex::new(open()?));
        map.insert(id, session.clone());
        Ok(session)
    }

    /// Session already bound to `id`. Continuations go through here so a
    /// released job is never reopened.
    pub fn resume(&self, id: JobId) -> Result<Session<S>, HandlerError> {
        self.get(id).ok_or(HandlerError::JobNotFound { strategy: self.strategy, id })
    }

    /// Deregister `id` and hand back sole ownership of its session.
    pub fn remove(&self, id: JobId) -> Result<S, HandlerError> {
        let session = self
            .map()
            .remove(&id)
            .ok_or(HandlerError::JobNotFound { strategy: self.strategy, id })?;

        match Arc::try_unwrap(session) {
            Ok(m) => Ok(m.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(still_shared) => {
                // A call for this job is still running; put it back.
                self.map().insert(id, still_shared);
                Err(HandlerError::SessionBusy { strategy: self.strategy, id })
            }
        }
    }
}
