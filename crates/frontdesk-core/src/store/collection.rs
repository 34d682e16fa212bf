// ── Ordered reactive collection ──
//
// Server order is kept: `list` replaces the whole vector, `create` appends,
// `update` replaces in place. Every mutation publishes a fresh snapshot on
// a `watch` channel and bumps a version counter.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{Record, RecordId};

pub(crate) struct EntityCollection<T: Record> {
    /// Current snapshot; readers clone the outer `Arc` and never block.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,
}

impl<T: Record> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);
        Self { snapshot, version }
    }

    /// Replace the whole collection, keeping the given order.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let items: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        self.snapshot.send_modify(|snap| *snap = Arc::new(items));
        self.bump_version();
    }

    pub(crate) fn push(&self, item: T) -> Arc<T> {
        let item = Arc::new(item);
        self.snapshot
            .send_modify(|snap| Arc::make_mut(snap).push(Arc::clone(&item)));
        self.bump_version();
        item
    }

    /// Swap in `item` where an entry with the same id sits.
    /// Returns `false` (and publishes nothing) when there is none.
    pub(crate) fn replace(&self, item: Arc<T>) -> bool {
        let id = item.id();
        let replaced = self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|e| e.id() == id) else {
                return false;
            };
            Arc::make_mut(snap)[pos] = item;
            true
        });
        if replaced {
            self.bump_version();
        }
        replaced
    }

    /// Edit the entry with `id` in place and return the edited copy.
    pub(crate) fn modify(&self, id: RecordId, f: impl FnOnce(&mut T)) -> Option<Arc<T>> {
        let mut edited = None;
        self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|e| e.id() == id) else {
                return false;
            };
            let entries = Arc::make_mut(snap);
            let mut record = T::clone(&entries[pos]);
            f(&mut record);
            let record = Arc::new(record);
            entries[pos] = Arc::clone(&record);
            edited = Some(record);
            true
        });
        if edited.is_some() {
            self.bump_version();
        }
        edited
    }

    pub(crate) fn get(&self, id: RecordId) -> Option<Arc<T>> {
        self.find(|e| e.id() == id)
    }

    pub(crate) fn find(&self, pred: impl Fn(&T) -> bool) -> Option<Arc<T>> {
        self.snapshot.borrow().iter().find(|e| pred(e)).map(Arc::clone)
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    #[allow(dead_code)]
    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    #[allow(dead_code)]
    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        label: &'static str,
    }

    impl Record for Item {
        fn id(&self) -> RecordId {
            RecordId::new(self.id)
        }
    }

    fn item(id: i64, label: &'static str) -> Item {
        Item { id, label }
    }

    #[test]
    fn replace_all_keeps_server_order() {
        let col = EntityCollection::new();
        col.replace_all(vec![item(3, "c"), item(1, "a"), item(2, "b")]);

        let ids: Vec<i64> = col.snapshot().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn push_appends() {
        let col = EntityCollection::new();
        col.replace_all(vec![item(1, "a")]);
        col.push(item(2, "b"));

        assert_eq!(col.len(), 2);
        assert_eq!(col.snapshot()[1].label, "b");
    }

    #[test]
    fn replace_is_in_place() {
        let col = EntityCollection::new();
        col.replace_all(vec![item(1, "a"), item(2, "b"), item(3, "c")]);

        assert!(col.replace(Arc::new(item(2, "B"))));
        let labels: Vec<&str> = col.snapshot().iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["a", "B", "c"]);
    }

    #[test]
    fn replace_missing_id_changes_nothing() {
        let col = EntityCollection::new();
        col.replace_all(vec![item(1, "a")]);
        let before = col.version();
        let mut rx = col.subscribe();
        rx.borrow_and_update();

        assert!(!col.replace(Arc::new(item(9, "z"))));
        assert_eq!(col.version(), before);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn modify_returns_edited_copy() {
        let col = EntityCollection::new();
        col.replace_all(vec![item(1, "a")]);

        let edited = col.modify(RecordId::new(1), |e| e.label = "edited").unwrap();
        assert_eq!(edited.label, "edited");
        assert_eq!(col.get(RecordId::new(1)).unwrap().label, "edited");
        assert!(col.modify(RecordId::new(2), |e| e.label = "x").is_none());
    }

    #[test]
    fn old_snapshots_are_not_mutated() {
        let col = EntityCollection::new();
        col.replace_all(vec![item(1, "a")]);
        let before = col.snapshot();

        col.replace(Arc::new(item(1, "b")));
        assert_eq!(before[0].label, "a");
        assert_eq!(col.snapshot()[0].label, "b");
    }

    #[test]
    fn every_mutation_notifies() {
        let col = EntityCollection::new();
        let mut rx = col.subscribe();

        col.push(item(1, "a"));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        col.modify(RecordId::new(1), |e| e.label = "b");
        assert!(rx.has_changed().unwrap());
        assert!(!col.is_empty());
    }
}
