//! Dirty tracking for recognition settings
//!
//! Settings are written by the application at any time but only reach the
//! algorithm lazily, right before the next computation. `SettingsVersion`
//! records what the caller wants (`current`) next to what the algorithm was
//! last given (`last_applied`).

use std::fmt::Debug;

use parking_lot::Mutex;
use tracing::trace;

#[derive(Debug)]
struct VersionState<S> {
    current: S,
    previous: Option<S>,
    last_applied: Option<S>,
}

#[derive(Debug)]
pub struct SettingsVersion<S> {
    state: Mutex<VersionState<S>>,
}

impl<S> SettingsVersion<S>
where
    S: PartialEq + Clone + Debug,
{
    /// Nothing has been applied yet, so a fresh version starts dirty.
    pub fn new(initial: S) -> Self {
        Self {
            state: Mutex::new(VersionState {
                current: initial,
                previous: None,
                last_applied: None,
            }),
        }
    }

    /// Replaces the current settings.
    ///
    /// Returns `false` (and changes nothing) when `new` equals the current value.
    pub fn set(
        &self,
        new: S,
    ) -> bool {
        let mut state = self.state.lock();
        if state.current == new {
            return false;
        }

        trace!(current = ?state.current, new = ?new, "Settings replaced");
        let old = std::mem::replace(&mut state.current, new);
        state.previous = Some(old);
        true
    }

    pub fn current(&self) -> S {
        self.state.lock().current.clone()
    }

    /// Value replaced by the most recent effective `set`
    pub fn previous(&self) -> Option<S> {
        self.state.lock().previous.clone()
    }

    pub fn last_applied(&self) -> Option<S> {
        self.state.lock().last_applied.clone()
    }

    pub fn is_dirty(&self) -> bool {
        let state = self.state.lock();
        state.last_applied.as_ref() != Some(&state.current)
    }

    /// Snapshot of the settings that still have to reach the algorithm.
    pub fn pending(&self) -> Option<S> {
        let state = self.state.lock();
        if state.last_applied.as_ref() == Some(&state.current) {
            None
        } else {
            Some(state.current.clone())
        }
    }

    /// Records the snapshot that was handed to the algorithm.
    ///
    /// Takes the applied value rather than re-reading `current`: a `set`
    /// landing between [`Self::pending`] and this call keeps the version dirty.
    pub fn mark_applied(
        &self,
        applied: S,
    ) {
        self.state.lock().last_applied = Some(applied);
    }
}
