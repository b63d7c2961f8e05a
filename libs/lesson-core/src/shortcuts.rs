//! Keyboard shortcuts for board cards.
//!
//! The host owns one [`KeyboardHub`] for the whole process and feeds it every
//! key-up. A board that is on screen holds a [`ShortcutBinding`]; key-ups are
//! queued only for live bindings, and dropping the binding unregisters it, so
//! keys never reach a board that has been torn down.

use crate::error::ConfigError;
use crate::types::{CardTarget, Column};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::{Rc, Weak};
use tracing::trace;

/// Keys bound to card positions, top to bottom, per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutKeys {
    pub left: Vec<char>,
    pub right: Vec<char>,
}

impl Default for ShortcutKeys {
    fn default() -> Self {
        Self {
            left: vec!['q', 'w', 'e', 'r', 't'],
            right: vec!['a', 's', 'd', 'f', 'g'],
        }
    }
}

impl ShortcutKeys {
    /// Key shown on the card at `target`.
    pub fn key_for(&self, target: CardTarget) -> Option<char> {
        self.column(target.column).get(target.index).copied()
    }

    /// Card position bound to `key`, ignoring case.
    pub fn resolve(&self, key: char) -> Option<CardTarget> {
        let key = key.to_lowercase().next()?;
        let position = |keys: &[char]| keys.iter().position(|k| k.to_lowercase().next() == Some(key));

        position(&self.left)
            .map(CardTarget::left)
            .or_else(|| position(&self.right).map(CardTarget::right))
    }

    /// Check that each column can address a full round and that no key is
    /// bound twice.
    pub fn validate(&self, round_size: usize) -> Result<(), ConfigError> {
        for column in [Column::Left, Column::Right] {
            let got = self.column(column).len();
            if got < round_size {
                return Err(ConfigError::TooFewShortcuts {
                    column,
                    needed: round_size,
                    got,
                });
            }
        }

        let mut seen = HashSet::new();
        for key in self.left.iter().chain(&self.right) {
            let lower = key.to_lowercase().next().unwrap_or(*key);
            if !seen.insert(lower) {
                return Err(ConfigError::DuplicateShortcut(*key));
            }
        }
        Ok(())
    }

    fn column(&self, column: Column) -> &[char] {
        match column {
            Column::Left => &self.left,
            Column::Right => &self.right,
        }
    }
}

#[derive(Debug, Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<Listener>,
}

#[derive(Debug)]
struct Listener {
    id: u64,
    keys: ShortcutKeys,
    pending: VecDeque<CardTarget>,
}

/// Process-wide key-up dispatcher.
#[derive(Debug, Clone, Default)]
pub struct KeyboardHub {
    inner: Rc<RefCell<HubInner>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `keys`. It stays registered until the returned
    /// binding is dropped.
    pub fn bind(&self, keys: ShortcutKeys) -> ShortcutBinding {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push(Listener {
            id,
            keys,
            pending: VecDeque::new(),
        });
        trace!(id, "shortcut listener bound");

        ShortcutBinding {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver a key-up. Returns whether any live binding mapped the key.
    pub fn key_up(&self, key: char) -> bool {
        let mut delivered = false;
        for listener in self.inner.borrow_mut().listeners.iter_mut() {
            if let Some(target) = listener.keys.resolve(key) {
                listener.pending.push_back(target);
                delivered = true;
            }
        }
        delivered
    }

    /// Number of live bindings.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Scoped registration with a [`KeyboardHub`].
#[derive(Debug)]
pub struct ShortcutBinding {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl ShortcutBinding {
    /// Take the card positions triggered since the last call, in key order.
    pub fn drain(&self) -> Vec<CardTarget> {
        let Some(hub) = self.hub.upgrade() else {
            return Vec::new();
        };
        let mut inner = hub.borrow_mut();
        inner
            .listeners
            .iter_mut()
            .find(|listener| listener.id == self.id)
            .map(|listener| listener.pending.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Drop for ShortcutBinding {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.retain(|listener| listener.id != self.id);
            trace!(id = self.id, "shortcut listener released");
        }
    }
}
