//! The insertion-ordered object engine.
//!
//! Entries form a doubly linked list in insertion order. Lookup has three
//! tiers: `scan`/`scan_reverse` walk the list, `get` binary-searches a
//! sorted snapshot of entry pointers, and `find` searches an ordered tree
//! threaded through the entries' own index hooks. The snapshot and the
//! tree are mutually exclusive — the index slot is a single enum, so
//! activating one discards the other and both can never be live at once.
//!
//! Index staleness is deliberate: `append` touches no index, so a snapshot
//! or tree built earlier does not see appended entries until something
//! invalidates it (`set` on a miss, `remove`) or the other index takes
//! over. `set` and `insert` are the index-maintaining mutation paths.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;

use bstr::{BStr, ByteSlice};
use bumpalo::Bump;
use bumpalo::collections::Vec as BumpVec;

use crate::node::Node;

/// The ordered map payload of an object node.
pub struct Object<'a> {
    arena: &'a Bump,
    /// The node this payload belongs to; entry values get it as parent.
    node: Cell<Option<&'a Node<'a>>>,
    head: Cell<Option<&'a MapEntry<'a>>>,
    tail: Cell<Option<&'a MapEntry<'a>>>,
    len: Cell<usize>,
    index: RefCell<ObjectIndex<'a>>,
}

/// One key/value entry of an object, linked in insertion order.
pub struct MapEntry<'a> {
    key: &'a BStr,
    value: Cell<&'a Node<'a>>,
    prev: Cell<Option<&'a MapEntry<'a>>>,
    next: Cell<Option<&'a MapEntry<'a>>>,
    // Tree-index hooks; meaningful only while the tree index is active.
    left: Cell<Option<&'a MapEntry<'a>>>,
    right: Cell<Option<&'a MapEntry<'a>>>,
}

/// At most one lookup structure is ever active.
enum ObjectIndex<'a> {
    None,
    /// Entry pointers sorted by key bytes; backs `get`.
    Snapshot(BumpVec<'a, &'a MapEntry<'a>>),
    /// Root of the ordered tree threaded through entry hooks; backs `find`.
    Tree(Cell<Option<&'a MapEntry<'a>>>),
}

impl<'a> Object<'a> {
    pub(crate) fn new_in(arena: &'a Bump) -> Object<'a> {
        Object {
            arena,
            node: Cell::new(None),
            head: Cell::new(None),
            tail: Cell::new(None),
            len: Cell::new(0),
            index: RefCell::new(ObjectIndex::None),
        }
    }

    pub(crate) fn bind(&self, node: &'a Node<'a>) {
        self.node.set(Some(node));
    }

    /// Number of entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// `true` when the object has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len.get() == 0
    }

    /// The first entry in insertion order.
    #[must_use]
    pub fn first(&self) -> Option<&'a MapEntry<'a>> {
        self.head.get()
    }

    /// The last entry in insertion order.
    #[must_use]
    pub fn last(&self) -> Option<&'a MapEntry<'a>> {
        self.tail.get()
    }

    /// Iterates entries in insertion order.
    #[must_use]
    pub fn iter(&self) -> ObjectIter<'a> {
        ObjectIter {
            cur: self.head.get(),
        }
    }

    // --------------------------------------------------------------------
    // Lookup
    // --------------------------------------------------------------------

    /// Linear lookup from the head; on duplicate keys this returns the
    /// first inserted. Never builds an index.
    #[must_use]
    pub fn scan(&self, key: impl AsRef<[u8]>) -> Option<&'a Node<'a>> {
        self.scan_entry(key.as_ref()).map(|e| e.value.get())
    }

    /// Linear lookup from the tail; on duplicate keys this returns the
    /// last inserted.
    #[must_use]
    pub fn scan_reverse(&self, key: impl AsRef<[u8]>) -> Option<&'a Node<'a>> {
        let key = key.as_ref();
        let mut cur = self.tail.get();
        while let Some(e) = cur {
            if e.key.as_bytes() == key {
                return Some(e.value.get());
            }
            cur = e.prev.get();
        }
        None
    }

    /// Snapshot lookup: builds the sorted entry array on first use
    /// (discarding the tree if it was active), then binary-searches.
    /// Entries appended after the snapshot was built are not visible until
    /// the snapshot is invalidated and rebuilt.
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&'a Node<'a>> {
        self.ensure_snapshot();
        let ix = self.index.borrow();
        match &*ix {
            ObjectIndex::Snapshot(v) => {
                let key = key.as_ref();
                v.binary_search_by(|e| e.key.as_bytes().cmp(key))
                    .ok()
                    .map(|i| v[i].value.get())
            }
            _ => None,
        }
    }

    /// Tree lookup: builds the ordered tree on first use (discarding the
    /// snapshot if it was active). `insert` keeps the tree current; plain
    /// `append` leaves it stale.
    #[must_use]
    pub fn find(&self, key: impl AsRef<[u8]>) -> Option<&'a Node<'a>> {
        self.ensure_tree();
        let ix = self.index.borrow();
        match &*ix {
            ObjectIndex::Tree(root) => {
                tree_find(root.get(), key.as_ref()).map(|e| e.value.get())
            }
            _ => None,
        }
    }

    pub(crate) fn scan_entry(&self, key: &[u8]) -> Option<&'a MapEntry<'a>> {
        let mut cur = self.head.get();
        while let Some(e) = cur {
            if e.key.as_bytes() == key {
                return Some(e);
            }
            cur = e.next.get();
        }
        None
    }

    // --------------------------------------------------------------------
    // Mutation
    // --------------------------------------------------------------------

    /// Appends an entry at the tail. O(1); touches no index, so callers
    /// that never look up by key pay nothing.
    pub fn append(&self, key: &str, value: &'a Node<'a>) {
        let key = &*self.arena.alloc_str(key);
        self.push_entry(BStr::new(key), value);
    }

    /// Replaces the value of the first entry matching `key` in place,
    /// preserving its position; appends when there is no match, keeping
    /// whichever index is active consistent (the snapshot is dropped, the
    /// tree gains the new entry).
    pub fn set(&self, key: &str, value: &'a Node<'a>) {
        if let Some(e) = self.scan_entry(key.as_bytes()) {
            self.replace_value(e, value);
            return;
        }
        let k = &*self.arena.alloc_str(key);
        let entry = self.push_entry(BStr::new(k), value);
        let mut drop_snapshot = false;
        {
            let ix = self.index.borrow();
            match &*ix {
                ObjectIndex::Snapshot(_) => drop_snapshot = true,
                ObjectIndex::Tree(root) => tree_insert(root, entry),
                ObjectIndex::None => {}
            }
        }
        if drop_snapshot {
            *self.index.borrow_mut() = ObjectIndex::None;
        }
    }

    /// Tree-maintaining upsert: activates the tree index, replaces in
    /// place on a hit, appends and tree-inserts on a miss.
    pub fn insert(&self, key: &str, value: &'a Node<'a>) {
        self.ensure_tree();
        let ix = self.index.borrow();
        let ObjectIndex::Tree(root) = &*ix else {
            return;
        };
        if let Some(e) = tree_find(root.get(), key.as_bytes()) {
            self.replace_value(e, value);
            return;
        }
        let k = &*self.arena.alloc_str(key);
        let entry = self.push_entry(BStr::new(k), value);
        tree_insert(root, entry);
    }

    /// Unlinks the first entry matching `key`. Drops an active snapshot;
    /// erases the entry from an active tree. Returns whether an entry was
    /// removed.
    pub fn remove(&self, key: impl AsRef<[u8]>) -> bool {
        let Some(entry) = self.scan_entry(key.as_ref()) else {
            return false;
        };
        let mut drop_snapshot = false;
        {
            let ix = self.index.borrow();
            match &*ix {
                ObjectIndex::Snapshot(_) => drop_snapshot = true,
                ObjectIndex::Tree(root) => tree_erase(root, entry),
                ObjectIndex::None => {}
            }
        }
        if drop_snapshot {
            *self.index.borrow_mut() = ObjectIndex::None;
        }
        self.unlink(entry);
        true
    }

    pub(crate) fn push_entry(&self, key: &'a BStr, value: &'a Node<'a>) -> &'a MapEntry<'a> {
        value.parent.set(self.node.get());
        let entry = &*self.arena.alloc(MapEntry {
            key,
            value: Cell::new(value),
            prev: Cell::new(self.tail.get()),
            next: Cell::new(None),
            left: Cell::new(None),
            right: Cell::new(None),
        });
        match self.tail.get() {
            Some(t) => t.next.set(Some(entry)),
            None => self.head.set(Some(entry)),
        }
        self.tail.set(Some(entry));
        self.len.set(self.len.get() + 1);
        entry
    }

    fn replace_value(&self, entry: &'a MapEntry<'a>, value: &'a Node<'a>) {
        entry.value.get().parent.set(None);
        value.parent.set(self.node.get());
        entry.value.set(value);
    }

    fn unlink(&self, entry: &'a MapEntry<'a>) {
        match entry.prev.get() {
            Some(p) => p.next.set(entry.next.get()),
            None => self.head.set(entry.next.get()),
        }
        match entry.next.get() {
            Some(n) => n.prev.set(entry.prev.get()),
            None => self.tail.set(entry.prev.get()),
        }
        self.len.set(self.len.get() - 1);
        entry.prev.set(None);
        entry.next.set(None);
        entry.value.get().parent.set(None);
    }

    // --------------------------------------------------------------------
    // Index construction
    // --------------------------------------------------------------------

    fn ensure_snapshot(&self) {
        let mut ix = self.index.borrow_mut();
        if matches!(&*ix, ObjectIndex::Snapshot(_)) {
            return;
        }
        let mut v = BumpVec::with_capacity_in(self.len.get(), self.arena);
        let mut cur = self.head.get();
        while let Some(e) = cur {
            v.push(e);
            cur = e.next.get();
        }
        v.sort_unstable_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));
        // Overwriting the slot discards any active tree.
        *ix = ObjectIndex::Snapshot(v);
    }

    fn ensure_tree(&self) {
        let mut ix = self.index.borrow_mut();
        if matches!(&*ix, ObjectIndex::Tree(_)) {
            return;
        }
        let root = Cell::new(None);
        let mut cur = self.head.get();
        while let Some(e) = cur {
            tree_insert(&root, e);
            cur = e.next.get();
        }
        // Overwriting the slot discards any active snapshot.
        *ix = ObjectIndex::Tree(root);
    }
}

impl<'a> MapEntry<'a> {
    /// The key in its encoded form.
    #[must_use]
    pub fn key(&self) -> &'a BStr {
        self.key
    }

    /// The entry's value node.
    #[must_use]
    pub fn value(&self) -> &'a Node<'a> {
        self.value.get()
    }

    /// The next entry in insertion order.
    #[must_use]
    pub fn next(&self) -> Option<&'a MapEntry<'a>> {
        self.next.get()
    }

    /// The previous entry in insertion order.
    #[must_use]
    pub fn previous(&self) -> Option<&'a MapEntry<'a>> {
        self.prev.get()
    }
}

/// Forward iterator over entries in insertion order.
pub struct ObjectIter<'a> {
    cur: Option<&'a MapEntry<'a>>,
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = &'a MapEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.cur?;
        self.cur = e.next.get();
        Some(e)
    }
}

impl<'s, 'a> IntoIterator for &'s Object<'a> {
    type Item = &'a MapEntry<'a>;
    type IntoIter = ObjectIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ------------------------------------------------------------------------
// Ordered tree threaded through entry hooks
// ------------------------------------------------------------------------

fn tree_insert<'a>(root: &Cell<Option<&'a MapEntry<'a>>>, entry: &'a MapEntry<'a>) {
    entry.left.set(None);
    entry.right.set(None);
    let mut slot = root;
    loop {
        match slot.get() {
            None => {
                slot.set(Some(entry));
                return;
            }
            Some(cur) => {
                // Equal keys descend right, so duplicates stay reachable
                // and erase-by-identity can walk the same spine.
                slot = if entry.key.as_bytes() < cur.key.as_bytes() {
                    &cur.left
                } else {
                    &cur.right
                };
            }
        }
    }
}

fn tree_find<'a>(
    root: Option<&'a MapEntry<'a>>,
    key: &[u8],
) -> Option<&'a MapEntry<'a>> {
    let mut cur = root;
    while let Some(e) = cur {
        cur = match key.cmp(e.key.as_bytes()) {
            Ordering::Less => e.left.get(),
            Ordering::Greater => e.right.get(),
            Ordering::Equal => return Some(e),
        };
    }
    None
}

/// Removes `target` (located by pointer identity) from the tree.
fn tree_erase<'a>(root: &Cell<Option<&'a MapEntry<'a>>>, target: &'a MapEntry<'a>) {
    let mut slot = root;
    loop {
        let Some(cur) = slot.get() else {
            return;
        };
        if std::ptr::eq(cur, target) {
            break;
        }
        slot = match target.key.as_bytes().cmp(cur.key.as_bytes()) {
            Ordering::Less => &cur.left,
            _ => &cur.right,
        };
    }
    let replacement = match (target.left.get(), target.right.get()) {
        (None, r) => r,
        (l, None) => l,
        (Some(l), Some(r)) => {
            // Splice in the leftmost entry of the right subtree.
            let mut min_slot = &target.right;
            let mut min = r;
            while let Some(next) = min.left.get() {
                min_slot = &min.left;
                min = next;
            }
            if !std::ptr::eq(min, r) {
                min_slot.set(min.right.get());
                min.right.set(Some(r));
            }
            min.left.set(Some(l));
            Some(min)
        }
    };
    slot.set(replacement);
    target.left.set(None);
    target.right.set(None);
}
