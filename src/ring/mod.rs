use std::fmt::{Debug, Formatter};
use std::mem;

use crate::ring::cursor::Cursor;
use crate::ring::iterator::Iter;

pub(crate) mod cursor;
pub(crate) mod iterator;

/// A stable handle to a node of a [`Ring`].
///
/// A `NodeId` stays valid until its node is removed; afterwards the slot may
/// be handed out again to a newly inserted node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// The `Ring` is a circular doubly-linked list whose nodes live in an arena.
///
/// There is no head, tail or ghost node: every node is an element, and
/// following `next` from any node comes back to it after exactly `len` steps.
/// Positions are held outside of the ring as [`NodeId`]s, so any number of
/// cursors can point into the same ring without borrowing it.
///
/// # Naming Conventions
///
/// - `at`: the node an insertion is relative to, `None` only for an empty ring;
/// - `start`: the first node visited by a traversal.
pub(crate) struct Ring<T> {
    slots: Vec<Slot<T>>,
    /// head of the free list threaded through vacant slots
    vacant: Option<NodeId>,
    len: usize,
}

pub(crate) struct Node<T> {
    pub(crate) next: NodeId,
    pub(crate) prev: NodeId,
    pub(crate) element: T,
}

enum Slot<T> {
    Occupied(Node<T>),
    Vacant(Option<NodeId>),
}

// private methods
impl<T> Ring<T> {
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(node)) => node,
            _ => panic!("Cannot access a removed node {:?}", id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(node)) => node,
            _ => panic!("Cannot access a removed node {:?}", id),
        }
    }

    fn connect(&mut self, prev: NodeId, next: NodeId) {
        self.node_mut(prev).next = next;
        self.node_mut(next).prev = prev;
    }

    /// Store `element` in a vacant slot (or a new one) as a self-linked node.
    fn allocate(&mut self, element: T) -> NodeId {
        let id = self.vacant.unwrap_or(NodeId(self.slots.len()));
        let slot = Slot::Occupied(Node {
            next: id,
            prev: id,
            element,
        });
        if id.0 == self.slots.len() {
            self.slots.push(slot);
        } else {
            match mem::replace(&mut self.slots[id.0], slot) {
                Slot::Vacant(next_vacant) => self.vacant = next_vacant,
                Slot::Occupied(_) => unreachable!("the free list points at a live node"),
            }
        }
        self.len += 1;
        id
    }

    /// Free the slot of `id` and return its node. The node must already be
    /// unlinked from its neighbours.
    fn release(&mut self, id: NodeId) -> Node<T> {
        match mem::replace(&mut self.slots[id.0], Slot::Vacant(self.vacant)) {
            Slot::Occupied(node) => {
                self.vacant = Some(id);
                self.len -= 1;
                node
            }
            Slot::Vacant(_) => unreachable!("released node {:?} twice", id),
        }
    }

    /// Attach a single self-linked node `node` to the ring, between `prev` and `next`.
    ///
    /// If the `prev` and `next` are not adjacent nodes, this function call will
    /// make the ring ill-formed.
    fn attach_node(&mut self, prev: NodeId, next: NodeId, node: NodeId) {
        #[cfg(debug_assertions)]
        self.assert_adjacent(prev, next);
        self.connect(prev, node);
        self.connect(node, next);
        #[cfg(debug_assertions)]
        {
            self.assert_adjacent(prev, node);
            self.assert_adjacent(node, next);
        }
    }

    #[cfg(debug_assertions)]
    fn assert_adjacent(&self, prev: NodeId, next: NodeId) {
        assert_eq!(self.node(prev).next, next);
        assert_eq!(self.node(next).prev, prev);
    }
}

impl<T> Ring<T> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: None,
            len: 0,
        }
    }

    /// This operation should compute in *O*(1) time.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn get(&self, id: NodeId) -> &T {
        &self.node(id).element
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.node_mut(id).element
    }

    pub(crate) fn next(&self, id: NodeId) -> NodeId {
        self.node(id).next
    }

    pub(crate) fn prev(&self, id: NodeId) -> NodeId {
        self.node(id).prev
    }

    /// Insert `element` immediately before `at`, or as the only node when
    /// the ring is empty (`at == None`). Cursors are never moved.
    ///
    /// This operation should compute in *O*(1) time.
    pub(crate) fn insert_before(&mut self, at: Option<NodeId>, element: T) -> NodeId {
        debug_assert_eq!(at.is_none(), self.is_empty());
        let neighbours = at.map(|at| (self.prev(at), at));
        self.insert_between(neighbours, element)
    }

    /// Insert `element` immediately after `at`, or as the only node when
    /// the ring is empty (`at == None`). Cursors are never moved.
    ///
    /// This operation should compute in *O*(1) time.
    pub(crate) fn insert_after(&mut self, at: Option<NodeId>, element: T) -> NodeId {
        debug_assert_eq!(at.is_none(), self.is_empty());
        let neighbours = at.map(|at| (at, self.next(at)));
        self.insert_between(neighbours, element)
    }

    fn insert_between(&mut self, neighbours: Option<(NodeId, NodeId)>, element: T) -> NodeId {
        let id = self.allocate(element);
        match neighbours {
            Some((prev, next)) => {
                self.attach_node(prev, next, id);
                log::trace!("ring: linked {:?} between {:?} and {:?}", id, prev, next);
            }
            None => log::trace!("ring: {:?} starts a new cycle", id),
        }
        id
    }

    /// Unlink and free the node `id`. Returns its element and its former
    /// successor, or `None` when the ring has become empty.
    ///
    /// This operation should compute in *O*(1) time.
    pub(crate) fn remove(&mut self, id: NodeId) -> (T, Option<NodeId>) {
        let (prev, next) = {
            let node = self.node(id);
            (node.prev, node.next)
        };
        let node = self.release(id);
        let successor = if next == id {
            None
        } else {
            self.connect(prev, next);
            Some(next)
        };
        log::trace!("ring: unlinked {:?}, successor {:?}", id, successor);
        (node.element, successor)
    }

    pub(crate) fn cursor(&self, at: NodeId) -> Cursor<'_, T> {
        Cursor::new(self, at)
    }

    /// Visit every element once in `next` order, beginning at `start`.
    /// Yields nothing when `start` is `None`.
    pub(crate) fn iter_from(&self, start: Option<NodeId>) -> Iter<'_, T> {
        Iter::new(self, start)
    }

    /// The first node satisfying `predicate`, searching forward from `start`
    /// (inclusive) and visiting each node at most once.
    ///
    /// This operation should compute in *O*(*n*) time.
    pub(crate) fn position<P>(&self, start: Option<NodeId>, predicate: P) -> Option<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        self.cursor(start?).find(predicate)
    }

    /// Number of `next` steps leading from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if `to` is not a node of this ring.
    pub(crate) fn distance(&self, from: NodeId, to: NodeId) -> usize {
        let mut cursor = self.cursor(from);
        for steps in 0..self.len {
            if cursor.id() == to {
                return steps;
            }
            cursor.move_next();
        }
        panic!("Cannot reach {:?} from {:?}", to, from)
    }

    /// Walk the ring and check that it forms one cycle through every live
    /// node, with `prev` the inverse of `next`.
    #[cfg(test)]
    pub(crate) fn assert_cyclic(&self) {
        use std::collections::HashSet;

        let live: Vec<NodeId> = (0..self.slots.len())
            .map(NodeId)
            .filter(|id| matches!(self.slots[id.0], Slot::Occupied(_)))
            .collect();
        assert_eq!(live.len(), self.len);
        for &id in &live {
            assert_eq!(self.prev(self.next(id)), id);
            assert_eq!(self.next(self.prev(id)), id);
        }
        if let Some(&start) = live.first() {
            let mut visited = HashSet::new();
            let mut cursor = self.cursor(start);
            for _ in 0..self.len {
                assert!(visited.insert(cursor.id()), "cycle shorter than the ring");
                cursor.move_next();
            }
            assert_eq!(cursor.id(), start);
        }
    }
}

impl<T: Debug> Debug for Ring<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(node) = slot {
                map.entry(&index, &node.element);
            }
        }
        map.finish()
    }
}

impl<T> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}
