//! Per-client reservation sets with non-owning client tracking.
//!
//! A client is anything on the presentation side that wants cells on the
//! grid (a panel, a floor view, a legend). It identifies itself with a
//! [`ClientHandle`]; the store only keeps a [`Weak`] reference to the
//! handle's token, so dropping the last clone of a handle is enough to make
//! its reservation disappear on the next [`ReservationStore::sweep`].

use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::fga::Fga;

/// Counter for unique [`ClientId`] allocation.
static CLIENT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a reservation client.
///
/// Allocated from a monotonic counter, so an id is never reused even when a
/// dropped client's memory is recycled for a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

impl ClientId {
    fn next() -> Self {
        Self(CLIENT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client#{}", self.0)
    }
}

#[derive(Debug)]
struct ClientToken {
    id: ClientId,
}

/// Handle held by a reservation client.
///
/// Clones share one identity. The client stays "alive" for the store while
/// at least one clone exists somewhere outside it.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    token: Rc<ClientToken>,
}

impl ClientHandle {
    pub fn new() -> Self {
        Self {
            token: Rc::new(ClientToken {
                id: ClientId::next(),
            }),
        }
    }

    pub fn id(&self) -> ClientId {
        self.token.id
    }

    fn downgrade(&self) -> Weak<ClientToken> {
        Rc::downgrade(&self.token)
    }
}

impl Default for ClientHandle {
    fn default() -> Self {
        Self::new()
    }
}

struct Reservation {
    owner: Weak<ClientToken>,
    triples: Vec<Fga>,
}

impl Reservation {
    fn is_live(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

/// All clients' reservations, keyed by client id.
///
/// Iteration follows client creation order, so when two clients reserve the
/// same cell the later client is seen last.
#[derive(Default)]
pub struct ReservationStore {
    entries: BTreeMap<ClientId, Reservation>,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or create) the reservation owned by `client`.
    ///
    /// Unplaced triples are kept as given; they are filtered when the
    /// aggregate is read.
    pub fn update<I>(&mut self, client: &ClientHandle, triples: I)
    where
        I: IntoIterator<Item = Fga>,
    {
        let triples: Vec<Fga> = triples.into_iter().collect();
        self.entries.insert(
            client.id(),
            Reservation {
                owner: client.downgrade(),
                triples,
            },
        );
    }

    /// Forget a client explicitly. Returns whether it was tracked.
    pub fn remove(&mut self, client: ClientId) -> bool {
        self.entries.remove(&client).is_some()
    }

    /// The triples most recently reserved by `client`, if it is still live.
    pub fn triples_of(&self, client: ClientId) -> Option<&[Fga]> {
        self.entries
            .get(&client)
            .filter(|r| r.is_live())
            .map(|r| r.triples.as_slice())
    }

    /// True if any tracked client has been dropped since the last sweep.
    pub fn has_dead(&self) -> bool {
        self.entries.values().any(|r| !r.is_live())
    }

    /// Drop associations whose client no longer exists. Returns how many
    /// were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, r| r.is_live());
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Swept {} dead reservation client(s)", removed);
        }
        removed
    }

    /// Number of tracked clients that are still alive.
    pub fn live_clients(&self) -> usize {
        self.entries.values().filter(|r| r.is_live()).count()
    }

    /// Number of tracked associations, dead or alive.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every placed triple reserved by a live client.
    pub fn placed(&self) -> impl Iterator<Item = Fga> + '_ {
        self.entries
            .values()
            .filter(|r| r.is_live())
            .flat_map(|r| r.triples.iter().copied())
            .filter(Fga::is_placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_replaces() {
        let mut store = ReservationStore::new();
        let client = ClientHandle::new();
        store.update(&client, vec![Fga::new(0, 0, 0), Fga::new(0, 1, 0)]);
        store.update(&client, vec![Fga::new(1, 1, 1)]);
        assert_eq!(store.triples_of(client.id()), Some(&[Fga::new(1, 1, 1)][..]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_update_clears_placements() {
        let mut store = ReservationStore::new();
        let client = ClientHandle::new();
        store.update(&client, vec![Fga::new(0, 0, 0)]);
        store.update(&client, std::iter::empty());
        assert_eq!(store.placed().count(), 0);
        assert_eq!(store.live_clients(), 1);
    }

    #[test]
    fn test_unplaced_filtered_from_aggregate() {
        let mut store = ReservationStore::new();
        let client = ClientHandle::new();
        store.update(&client, vec![Fga::new(0, 0, 0), Fga::new(-1, 2, 0)]);
        let placed: Vec<Fga> = store.placed().collect();
        assert_eq!(placed, vec![Fga::new(0, 0, 0)]);
    }

    #[test]
    fn test_store_does_not_keep_client_alive() {
        let mut store = ReservationStore::new();
        let client = ClientHandle::new();
        let id = client.id();
        store.update(&client, vec![Fga::new(0, 0, 0)]);
        assert!(!store.has_dead());

        drop(client);
        assert!(store.has_dead());
        assert_eq!(store.triples_of(id), None);
        assert_eq!(store.placed().count(), 0);

        assert_eq!(store.sweep(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clone_keeps_client_alive() {
        let mut store = ReservationStore::new();
        let client = ClientHandle::new();
        let other = client.clone();
        store.update(&client, vec![Fga::new(0, 0, 0)]);
        drop(client);
        assert!(!store.has_dead());
        assert_eq!(store.sweep(), 0);
        assert_eq!(store.triples_of(other.id()).map(<[Fga]>::len), Some(1));
    }

    #[test]
    fn test_ids_unique() {
        let a = ClientHandle::new();
        let b = ClientHandle::new();
        assert_ne!(a.id(), b.id());
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_remove() {
        let mut store = ReservationStore::new();
        let client = ClientHandle::new();
        store.update(&client, vec![Fga::new(0, 0, 0)]);
        assert!(store.remove(client.id()));
        assert!(!store.remove(client.id()));
        assert!(store.is_empty());
    }
}
