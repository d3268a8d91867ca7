//! Ordered heterogeneous record collections.
//!
//! Three catalog families are polymorphic: shapes on a region of interest,
//! structured annotations, and instrument light sources. A [`UnionSeq`]
//! holds any mix of one family's variants in insertion order.
//!
//! Variant selection happens in [`UnionSeq::append_element`]. An event
//! named after a concrete variant decodes as that variant, full stop. An
//! event named after the family (or unnamed) goes through mapping dispatch:
//! a `kind` field short-circuits to the named variant, otherwise each
//! variant is tried in the family's fixed priority order and the first
//! whose requirements are satisfied wins.

use omx_tree::Element;

use crate::{BuildContext, BuildError, Identified};

/// One polymorphic record family.
///
/// Implemented by the family enums in [`crate::records`]; the decode
/// machinery is generic over this.
pub trait VariantFamily: Identified + Sized {
    /// Family name in error messages, e.g. `"shape"`.
    const FAMILY: &'static str;

    /// Kind keywords in trial priority order.
    const KINDS: &'static [&'static str];

    /// This variant's kind keyword.
    fn kind(&self) -> &'static str;

    /// This variant's event name, e.g. `"Rectangle"`.
    fn element_name(&self) -> &'static str;

    /// Decode the variant named by the event, `Ok(None)` when the name
    /// selects no variant of this family.
    fn from_named(el: Element, cx: &mut BuildContext<'_>) -> Result<Option<Self>, BuildError>;

    /// Decode as the variant whose kind keyword is `kind`, `Ok(None)` for
    /// an unknown keyword.
    fn from_kind(
        kind: &str,
        el: Element,
        cx: &mut BuildContext<'_>,
    ) -> Result<Option<Self>, BuildError>;

    fn to_element(&self) -> Element;
}

/// An ordered collection of one family's variants.
pub struct UnionSeq<T: VariantFamily> {
    items: Vec<T>,
}

impl<T: VariantFamily> UnionSeq<T> {
    pub fn new() -> Self {
        UnionSeq { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Append an already-built variant.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove and return the variant at `index`, shifting later members up.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove the member carrying `id`, preserving the order of the rest.
    pub fn remove_by_id(&mut self, id: &str) -> Option<T> {
        let at = self
            .items
            .iter()
            .position(|item| item.lsid().is_some_and(|lsid| lsid.as_str() == id))?;
        Some(self.items.remove(at))
    }

    /// Members of one kind, in collection order.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.items.iter().filter(move |item| item.kind() == kind)
    }

    /// Decode one event and append the resulting variant.
    pub fn append_element(
        &mut self,
        el: Element,
        cx: &mut BuildContext<'_>,
    ) -> Result<(), BuildError> {
        if el.name.is_empty() || el.name == T::TAG.as_str() {
            return self.append_from_mapping(el, cx);
        }
        let name = el.name.clone();
        match T::from_named(el, cx)? {
            Some(variant) => {
                self.items.push(variant);
                Ok(())
            }
            None => Err(BuildError::InvalidVariant {
                path: cx.path.clone(),
                family: T::FAMILY,
                found: name,
            }),
        }
    }

    /// Decode an event with no variant name: a `kind` field selects the
    /// variant directly, otherwise priority-ordered trials pick the first
    /// variant the mapping satisfies.
    pub fn append_from_mapping(
        &mut self,
        mut el: Element,
        cx: &mut BuildContext<'_>,
    ) -> Result<(), BuildError> {
        if let Some(hint) = el.take_field("kind") {
            let Some(kind) = hint.as_str() else {
                return Err(BuildError::Structural {
                    path: cx.path.clone(),
                    detail: format!(
                        "{} kind must be a keyword, found {}",
                        T::FAMILY,
                        hint.kind_name()
                    ),
                });
            };
            let kind = kind.to_lowercase();
            return match T::from_kind(&kind, el, cx)? {
                Some(variant) => {
                    self.items.push(variant);
                    Ok(())
                }
                None => Err(BuildError::UnknownVariant {
                    path: cx.path.clone(),
                    family: T::FAMILY,
                    kind,
                }),
            };
        }

        // A trial leaves no trace; the winning variant is decoded again in
        // the enclosing mode so identifier assignment and diagnostics
        // happen exactly once.
        let mut chosen = None;
        for kind in T::KINDS {
            let fits = cx.trial(|cx| matches!(T::from_kind(kind, el.clone(), cx), Ok(Some(_))));
            if fits {
                chosen = Some(*kind);
                break;
            }
        }
        match chosen {
            Some(kind) => match T::from_kind(kind, el, cx)? {
                Some(variant) => {
                    self.items.push(variant);
                    Ok(())
                }
                None => Err(BuildError::NoMatchingVariant {
                    path: cx.path.clone(),
                    family: T::FAMILY,
                }),
            },
            None => Err(BuildError::NoMatchingVariant {
                path: cx.path.clone(),
                family: T::FAMILY,
            }),
        }
    }
}

impl<T: VariantFamily> Default for UnionSeq<T> {
    fn default() -> Self {
        UnionSeq::new()
    }
}

impl<T: VariantFamily + Clone> Clone for UnionSeq<T> {
    fn clone(&self) -> Self {
        UnionSeq {
            items: self.items.clone(),
        }
    }
}

impl<T: VariantFamily + PartialEq> PartialEq for UnionSeq<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: VariantFamily + std::fmt::Debug> std::fmt::Debug for UnionSeq<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: VariantFamily> FromIterator<T> for UnionSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        UnionSeq {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T: VariantFamily> IntoIterator for &'a UnionSeq<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: VariantFamily> IntoIterator for UnionSeq<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
