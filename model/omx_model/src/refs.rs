//! Reference fields.
//!
//! A reference names another object by identifier. Until the link pass runs
//! it holds the string as written (or as repaired); afterwards it either
//! holds the verified canonical identifier of an indexed object or stays
//! raw, with a dangling-reference diagnostic on record.

use std::fmt;
use std::marker::PhantomData;

use omx_ids::{Lsid, Tag};

use crate::Identified;

/// Resolution state of one reference site.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum RefState {
    /// Target string as written (or rewritten by a numeric repair); not yet
    /// checked against the index, or checked and found dangling.
    Raw(String),
    /// Target text failed identifier validation without a usable number.
    /// The link pass retries it against the session's identity repairs.
    Deferred(String),
    /// Verified: the index holds an object whose identifier is exactly this.
    Linked(Lsid),
}

/// Untyped interior of a reference, shared by visitors.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RefSlot {
    pub state: RefState,
}

impl RefSlot {
    pub fn raw(target: impl Into<String>) -> Self {
        RefSlot {
            state: RefState::Raw(target.into()),
        }
    }

    pub fn deferred(original: impl Into<String>) -> Self {
        RefSlot {
            state: RefState::Deferred(original.into()),
        }
    }

    /// The target as a string: canonical when linked, as-written otherwise.
    pub fn target(&self) -> &str {
        match &self.state {
            RefState::Raw(s) | RefState::Deferred(s) => s,
            RefState::Linked(id) => id.as_str(),
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self.state, RefState::Linked(_))
    }

    /// The verified identifier, once linked.
    pub fn lsid(&self) -> Option<&Lsid> {
        match &self.state {
            RefState::Linked(id) => Some(id),
            RefState::Raw(_) | RefState::Deferred(_) => None,
        }
    }
}

/// A typed reference to an object with identity tag `T::TAG`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ref<T: Identified> {
    pub slot: RefSlot,
    marker: PhantomData<fn() -> T>,
}

impl<T: Identified> Ref<T> {
    /// Reference a target by identifier string.
    pub fn to(target: impl Into<String>) -> Self {
        Ref {
            slot: RefSlot::raw(target),
            marker: PhantomData,
        }
    }

    pub fn from_slot(slot: RefSlot) -> Self {
        Ref {
            slot,
            marker: PhantomData,
        }
    }

    /// Identity tag of the referenced type.
    pub fn target_tag(&self) -> Tag {
        T::TAG
    }

    pub fn target(&self) -> &str {
        self.slot.target()
    }

    pub fn is_linked(&self) -> bool {
        self.slot.is_linked()
    }

    pub fn lsid(&self) -> Option<&Lsid> {
        self.slot.lsid()
    }
}

impl<T: Identified> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref<{}>({:?})", T::TAG, self.slot.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Image;
    use pretty_assertions::assert_eq;

    #[test]
    fn target_reads_through_every_state() {
        let mut reference = Ref::<Image>::to("Image:3");
        assert_eq!(reference.target(), "Image:3");
        assert!(!reference.is_linked());

        reference.slot.state = RefState::Linked(Lsid::from("Image:3"));
        assert_eq!(reference.target(), "Image:3");
        assert_eq!(reference.lsid(), Some(&Lsid::from("Image:3")));

        let deferred = Ref::<Image>::from_slot(RefSlot::deferred("not-an-id"));
        assert_eq!(deferred.target(), "not-an-id");
        assert_eq!(deferred.lsid(), None);
    }

    #[test]
    fn tag_comes_from_the_target_type() {
        assert_eq!(Ref::<Image>::to("Image:0").target_tag(), Tag::Image);
    }
}
