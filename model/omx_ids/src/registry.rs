//! Per-session identifier assignment.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{format, Lsid, Tag};

/// Identifier supplied for a new identity-bearing record.
#[derive(Copy, Clone, Debug)]
pub enum ProvidedId<'a> {
    /// No identifier supplied; allocate the next number for the tag.
    Auto,
    /// Bare number, formatted as `Tag:n`.
    Number(i64),
    /// Identifier string as written in the document.
    Text(&'a str),
}

/// Result of an identity assignment.
#[derive(Clone, Debug)]
pub struct Assigned {
    pub id: Lsid,
    /// Original text when the supplied identifier failed validation and was
    /// repaired. Callers surface this as a `Casting invalid <Tag>ID`
    /// warning.
    pub cast_from: Option<Box<str>>,
}

/// Outcome of checking a reference-position identifier.
///
/// References never allocate numbers or claim identities, so checking one
/// has no side effect on the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckedRef {
    /// Matches the grammar; the target string is used as written.
    Valid,
    /// Failed validation but carries a numeric trailing token; the target
    /// is rewritten to the canonical numbered form.
    CastNumeric(Lsid),
    /// Failed validation with no usable number. The link pass retries the
    /// original text against identity repairs recorded by
    /// [`IdRegistry::assign`].
    CastDeferred,
}

/// Same type-tag, same identifier, two objects. Fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId {
    pub tag: Tag,
    pub id: Lsid,
}

impl fmt::Display for DuplicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identifier `{}` assigned to more than one {} object",
            self.id, self.tag
        )
    }
}

impl std::error::Error for DuplicateId {}

/// Identifier state for one construction session.
///
/// Holds the per-tag numbering counters (`-1` meaning no number assigned
/// yet), the set of claimed identifiers, and the repairs applied to invalid
/// identity strings. Created fresh per session and discarded when
/// construction plus resolution completes; a later mutation session resumes
/// from the retained counters via [`IdRegistry::with_counters`].
#[derive(Clone)]
pub struct IdRegistry {
    counters: [i64; Tag::COUNT],
    claims: FxHashSet<Lsid>,
    casts: [FxHashMap<Box<str>, Lsid>; Tag::COUNT],
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::with_counters([-1; Tag::COUNT])
    }

    /// Resume a session from counters retained by an earlier one, so new
    /// auto-assigned numbers continue past everything already seen.
    pub fn with_counters(counters: [i64; Tag::COUNT]) -> Self {
        IdRegistry {
            counters,
            claims: FxHashSet::default(),
            casts: std::array::from_fn(|_| FxHashMap::default()),
        }
    }

    /// Assign or validate the identifier for a new identity-bearing record.
    ///
    /// Every call mutates the registry: counters advance or ratchet up, and
    /// the produced identifier is claimed. A second claim of the same
    /// identifier is a [`DuplicateId`] error.
    pub fn assign(&mut self, tag: Tag, provided: ProvidedId<'_>) -> Result<Assigned, DuplicateId> {
        match provided {
            ProvidedId::Auto => {
                let id = self.bump(tag);
                self.claim(tag, id, None)
            }
            ProvidedId::Number(n) => {
                let id = self.numbered(tag, n);
                self.claim(tag, id, None)
            }
            ProvidedId::Text(text) => {
                if format::matches(tag, text) {
                    if let Some(n) = format::trailing_int(text) {
                        self.ratchet(tag, n);
                    }
                    return self.claim(tag, Lsid::from(text), None);
                }
                // Repair: reuse a numeric trailing token, else auto-assign.
                let id = match format::trailing_decimal(text) {
                    Some(n) => self.numbered(tag, n),
                    None => self.bump(tag),
                };
                self.casts[tag.index()]
                    .entry(Box::from(text))
                    .or_insert_with(|| id.clone());
                self.claim(tag, id, Some(Box::from(text)))
            }
        }
    }

    /// Check a reference-position identifier against the target's grammar.
    pub fn check_ref(&self, tag: Tag, raw: &str) -> CheckedRef {
        if format::matches(tag, raw) {
            return CheckedRef::Valid;
        }
        match format::trailing_decimal(raw) {
            Some(n) => CheckedRef::CastNumeric(Lsid::from(format!("{}:{n}", tag.as_str()))),
            None => CheckedRef::CastDeferred,
        }
    }

    /// The identity an invalid string was repaired to, if any. First repair
    /// wins when the same invalid text appears on several identities.
    pub fn cast_target(&self, tag: Tag, original: &str) -> Option<&Lsid> {
        self.casts[tag.index()].get(original)
    }

    /// Claim an identifier assigned by an earlier session, so additions to
    /// an existing document cannot collide with it.
    pub fn adopt(&mut self, id: Lsid) {
        self.claims.insert(id);
    }

    /// Every claimed identifier, in arbitrary order.
    pub fn claims(&self) -> impl Iterator<Item = &Lsid> {
        self.claims.iter()
    }

    /// Counter snapshot, retained across sessions by the document.
    pub fn counters(&self) -> [i64; Tag::COUNT] {
        self.counters
    }

    /// Highest number seen for a tag; `-1` when none.
    pub fn peek(&self, tag: Tag) -> i64 {
        self.counters[tag.index()]
    }

    fn bump(&mut self, tag: Tag) -> Lsid {
        let next = self.counters[tag.index()] + 1;
        self.counters[tag.index()] = next;
        Lsid::from(format!("{}:{next}", tag.as_str()))
    }

    fn numbered(&mut self, tag: Tag, n: i64) -> Lsid {
        self.ratchet(tag, n);
        Lsid::from(format!("{}:{n}", tag.as_str()))
    }

    fn ratchet(&mut self, tag: Tag, n: i64) {
        let slot = &mut self.counters[tag.index()];
        *slot = (*slot).max(n);
    }

    fn claim(
        &mut self,
        tag: Tag,
        id: Lsid,
        cast_from: Option<Box<str>>,
    ) -> Result<Assigned, DuplicateId> {
        if !self.claims.insert(id.clone()) {
            return Err(DuplicateId { tag, id });
        }
        Ok(Assigned { id, cast_from })
    }
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}
