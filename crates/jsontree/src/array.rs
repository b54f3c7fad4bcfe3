//! The array engine.
//!
//! Elements form a doubly linked entry list with a lazily built
//! direct-access table (an arena-allocated array of entry pointers) for
//! O(1) indexed reads. Any structural mutation invalidates the table; the
//! next indexed access rebuilds it in one walk.

use std::cell::{Cell, RefCell};

use bumpalo::Bump;
use bumpalo::collections::Vec as BumpVec;

use crate::node::Node;

/// The list payload of an array node.
pub struct Array<'a> {
    arena: &'a Bump,
    node: Cell<Option<&'a Node<'a>>>,
    head: Cell<Option<&'a ArrayEntry<'a>>>,
    tail: Cell<Option<&'a ArrayEntry<'a>>>,
    len: Cell<usize>,
    table: RefCell<Option<BumpVec<'a, &'a ArrayEntry<'a>>>>,
}

/// One element of an array.
pub struct ArrayEntry<'a> {
    value: &'a Node<'a>,
    prev: Cell<Option<&'a ArrayEntry<'a>>>,
    next: Cell<Option<&'a ArrayEntry<'a>>>,
}

impl<'a> Array<'a> {
    pub(crate) fn new_in(arena: &'a Bump) -> Array<'a> {
        Array {
            arena,
            node: Cell::new(None),
            head: Cell::new(None),
            tail: Cell::new(None),
            len: Cell::new(0),
            table: RefCell::new(None),
        }
    }

    pub(crate) fn bind(&self, node: &'a Node<'a>) {
        self.node.set(Some(node));
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// `true` when the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len.get() == 0
    }

    /// The first entry.
    #[must_use]
    pub fn first(&self) -> Option<&'a ArrayEntry<'a>> {
        self.head.get()
    }

    /// The last entry.
    #[must_use]
    pub fn last(&self) -> Option<&'a ArrayEntry<'a>> {
        self.tail.get()
    }

    /// Iterates entries front to back.
    #[must_use]
    pub fn iter(&self) -> ArrayIter<'a> {
        ArrayIter {
            cur: self.head.get(),
        }
    }

    /// Appends a value at the tail. O(1); invalidates the direct-access
    /// table.
    pub fn push(&self, value: &'a Node<'a>) {
        value.parent.set(self.node.get());
        let entry = &*self.arena.alloc(ArrayEntry {
            value,
            prev: Cell::new(self.tail.get()),
            next: Cell::new(None),
        });
        match self.tail.get() {
            Some(t) => t.next.set(Some(entry)),
            None => self.head.set(Some(entry)),
        }
        self.tail.set(Some(entry));
        self.len.set(self.len.get() + 1);
        *self.table.borrow_mut() = None;
    }

    /// Indexed read through the direct-access table; the first call after
    /// a mutation rebuilds the table in one walk. Out of range is `None`.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&'a Node<'a>> {
        self.nth_entry(index).map(|e| e.value)
    }

    /// Like [`nth`](Self::nth) but returns the entry itself.
    #[must_use]
    pub fn nth_entry(&self, index: usize) -> Option<&'a ArrayEntry<'a>> {
        self.ensure_table();
        self.table
            .borrow()
            .as_ref()
            .and_then(|t| t.get(index).copied())
    }

    /// Indexed read without a table: walks from whichever end of the list
    /// is closer.
    #[must_use]
    pub fn scan_index(&self, index: usize) -> Option<&'a Node<'a>> {
        let len = self.len.get();
        if index >= len {
            return None;
        }
        if index <= len / 2 {
            let mut cur = self.head.get();
            for _ in 0..index {
                cur = cur?.next.get();
            }
            cur.map(|e| e.value)
        } else {
            let mut cur = self.tail.get();
            for _ in 0..(len - 1 - index) {
                cur = cur?.prev.get();
            }
            cur.map(|e| e.value)
        }
    }

    /// Unlinks `entry` from the list. The entry must belong to this array.
    /// Its links are orphaned and its value's parent is cleared.
    pub fn erase(&self, entry: &'a ArrayEntry<'a>) {
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
        entry.value.parent.set(None);
        *self.table.borrow_mut() = None;
    }

    /// Orphans every entry and resets the list.
    pub fn clear(&self) {
        let mut cur = self.head.get();
        while let Some(e) = cur {
            cur = e.next.get();
            e.prev.set(None);
            e.next.set(None);
            e.value.parent.set(None);
        }
        self.head.set(None);
        self.tail.set(None);
        self.len.set(0);
        *self.table.borrow_mut() = None;
    }

    fn ensure_table(&self) {
        let mut table = self.table.borrow_mut();
        if table.is_some() {
            return;
        }
        let mut t = BumpVec::with_capacity_in(self.len.get(), self.arena);
        let mut cur = self.head.get();
        while let Some(e) = cur {
            t.push(e);
            cur = e.next.get();
        }
        *table = Some(t);
    }
}

impl<'a> ArrayEntry<'a> {
    /// The element's value node.
    #[must_use]
    pub fn value(&self) -> &'a Node<'a> {
        self.value
    }

    /// The next entry.
    #[must_use]
    pub fn next(&self) -> Option<&'a ArrayEntry<'a>> {
        self.next.get()
    }

    /// The previous entry.
    #[must_use]
    pub fn previous(&self) -> Option<&'a ArrayEntry<'a>> {
        self.prev.get()
    }
}

/// Forward iterator over array entries.
pub struct ArrayIter<'a> {
    cur: Option<&'a ArrayEntry<'a>>,
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = &'a ArrayEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.cur?;
        self.cur = e.next.get();
        Some(e)
    }
}

impl<'s, 'a> IntoIterator for &'s Array<'a> {
    type Item = &'a ArrayEntry<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
