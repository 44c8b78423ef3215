use crate::ring::{NodeId, Ring};
use std::fmt;
use std::iter::FusedIterator;

/// An iterator over the elements of a `Ring`, once around.
///
/// Unlike a [`Cursor`], which is cyclic, `Iter` starts at a given node,
/// yields each element exactly once in `next` order, and is then fused.
///
/// [`Cursor`]: crate::ring::cursor::Cursor
pub(crate) struct Iter<'a, T: 'a> {
    ring: &'a Ring<T>,
    next: Option<NodeId>,
    len: usize,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(ring: &'a Ring<T>, start: Option<NodeId>) -> Self {
        let len = if start.is_some() { ring.len() } else { 0 };
        Self {
            ring,
            next: start,
            len,
        }
    }
}

impl<'a, T: 'a> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring,
            next: self.next,
            len: self.len,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let current = self.ring.node(self.next?);
        self.next = Some(current.next);
        self.len -= 1;
        Some(&current.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}
