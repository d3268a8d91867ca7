//! Identity-bearing records.

use std::fmt;
use std::marker::PhantomData;

use omx_ids::{Id, Lsid, Tag};

/// A record type that carries an identifier.
///
/// `TAG` is the identity type-tag the record numbers under. Variants of one
/// polymorphic family share a tag, so a rectangle and a line constructed in
/// that order come out as `Shape:0` and `Shape:1`.
pub trait Identified {
    const TAG: Tag;

    fn id(&self) -> &Id;
    fn id_mut(&mut self) -> &mut Id;

    /// Canonical identifier, once assigned.
    fn lsid(&self) -> Option<&Lsid> {
        self.id().lsid()
    }
}

/// A verified pointer to an object inside one document.
///
/// Produced by the document once a reference is linked; following a handle
/// is an index lookup, not a graph search. A handle is only meaningful for
/// the document that produced it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Handle<T: Identified> {
    id: Lsid,
    marker: PhantomData<fn() -> T>,
}

impl<T: Identified> Handle<T> {
    pub fn new(id: Lsid) -> Self {
        Handle {
            id,
            marker: PhantomData,
        }
    }

    pub fn id(&self) -> &Lsid {
        &self.id
    }

    pub fn tag(&self) -> Tag {
        T::TAG
    }
}

impl<T: Identified> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{}>({})", T::TAG, self.id)
    }
}
