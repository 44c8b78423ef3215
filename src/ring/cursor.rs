use crate::ring::{NodeId, Ring};
use std::fmt;
use std::fmt::Formatter;

/// A cursor over a `Ring`.
///
/// A `Cursor` is a read-only position in the ring that can freely move
/// back-and-forth. Since the ring has no ghost node, every move is cyclic and
/// never fails: moving `len` steps in either direction returns to the start.
pub(crate) struct Cursor<'a, T: 'a> {
    current: NodeId,
    ring: &'a Ring<T>,
}

impl<'a, T: 'a> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: 'a> Copy for Cursor<'a, T> {}

impl<'a, T: 'a> Cursor<'a, T> {
    pub(crate) fn new(ring: &'a Ring<T>, current: NodeId) -> Self {
        Self { current, ring }
    }

    pub(crate) fn id(&self) -> NodeId {
        self.current
    }

    pub(crate) fn current(&self) -> &'a T {
        self.ring.get(self.current)
    }

    /// This operation should compute in *O*(1) time.
    pub(crate) fn move_next(&mut self) {
        self.current = self.ring.next(self.current);
    }

    /// This operation should compute in *O*(1) time.
    pub(crate) fn move_prev(&mut self) {
        self.current = self.ring.prev(self.current);
    }

    pub(crate) fn seek_forward(&mut self, steps: usize) {
        (0..steps).for_each(|_| self.move_next());
    }

    pub(crate) fn seek_backward(&mut self, steps: usize) {
        (0..steps).for_each(|_| self.move_prev());
    }

    /// Rotate the cursor `offset` steps forward, or `-offset` steps backward
    /// if `offset` is negative. Offsets larger than the ring wrap around.
    ///
    /// With `feature = "fast-seek"`, this operation should compute in
    /// *O*(min(|`offset`|, *n* / 2)) time, otherwise in *O*(|`offset`|) time.
    pub(crate) fn seek(&mut self, offset: isize) {
        #[cfg(feature = "fast-seek")]
        let offset = shortest_offset(offset, self.ring.len());
        if offset < 0 {
            self.seek_backward(offset.unsigned_abs());
        } else {
            self.seek_forward(offset.unsigned_abs());
        }
    }

    /// Return the first node satisfying `predicate`, starting at the cursor
    /// itself and visiting every node at most once.
    pub(crate) fn find<P>(mut self, mut predicate: P) -> Option<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        for _ in 0..self.ring.len() {
            if predicate(self.current()) {
                return Some(self.current);
            }
            self.move_next();
        }
        None
    }

    /// Like [`Cursor::find`], but starts one step after the cursor, so the
    /// cursor's own node is visited last.
    pub(crate) fn find_next<P>(mut self, predicate: P) -> Option<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        self.move_next();
        self.find(predicate)
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("ring", &self.ring)
            .field("current", self.current())
            .finish()
    }
}

/// The offset of least magnitude reaching the same node as `offset` in a ring
/// of `len` nodes; ties go forward.
#[cfg(feature = "fast-seek")]
fn shortest_offset(offset: isize, len: usize) -> isize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    let forward = offset.rem_euclid(len);
    if forward <= len - forward {
        forward
    } else {
        forward - len
    }
}

/// Repair a cursor after `removed` has been unlinked: a cursor that was on
/// the removed node moves to its former `successor`, and becomes unset if the
/// ring is now empty.
pub(crate) fn reseat(cursor: &mut Option<NodeId>, removed: NodeId, successor: Option<NodeId>) {
    if *cursor == Some(removed) {
        *cursor = successor;
    }
}
