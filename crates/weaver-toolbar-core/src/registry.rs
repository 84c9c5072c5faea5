//! Registry of live toolbar instances on this thread.
//!
//! Only one toolbar should follow a selection at a time. When a pointer-up
//! lands in one instance's content region, that instance walks the registry
//! and deactivates every peer directly. Everything runs on the UI thread, so
//! the registry is thread-local and holds weak handles; a dropped toolbar
//! simply stops upgrading.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a toolbar instance, unique for the process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToolbarId(u64);

impl ToolbarId {
    pub fn next() -> Self {
        ToolbarId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What an instance exposes to its peers.
pub trait PeerToolbar {
    /// Drop back to the deactivated look: anchored in fixed mode, hidden in
    /// floating mode.
    fn deactivate(&self);

    /// Whether this instance is currently tracking a selection.
    fn is_following(&self) -> bool;
}

thread_local! {
    static PEERS: RefCell<Vec<(ToolbarId, Weak<dyn PeerToolbar>)>> = const { RefCell::new(Vec::new()) };
}

pub fn register(id: ToolbarId, peer: Weak<dyn PeerToolbar>) {
    PEERS.with(|peers| {
        let mut peers = peers.borrow_mut();
        peers.retain(|(existing, weak)| *existing != id && weak.strong_count() > 0);
        peers.push((id, peer));
    });
}

pub fn unregister(id: ToolbarId) {
    PEERS.with(|peers| {
        peers
            .borrow_mut()
            .retain(|(existing, weak)| *existing != id && weak.strong_count() > 0);
    });
}

/// Live peers other than `except`.
fn live_peers(except: ToolbarId) -> Vec<Rc<dyn PeerToolbar>> {
    PEERS.with(|peers| {
        peers
            .borrow()
            .iter()
            .filter(|(id, _)| *id != except)
            .filter_map(|(_, weak)| weak.upgrade())
            .collect()
    })
}

/// Deactivate every registered instance except `except`.
///
/// The registry borrow is released before any peer runs, so a peer may
/// register or unregister from inside `deactivate`.
pub fn deactivate_peers(except: ToolbarId) {
    let peers = live_peers(except);
    if !peers.is_empty() {
        tracing::trace!(
            target: "weaver::toolbar",
            count = peers.len(),
            "deactivating peer toolbars"
        );
    }
    for peer in peers {
        peer.deactivate();
    }
}

/// Number of registered instances currently following a selection.
pub fn following_count() -> usize {
    PEERS.with(|peers| {
        peers
            .borrow()
            .iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .filter(|peer| peer.is_following())
            .count()
    })
}
