//! Object paths.
//!
//! A [`Path`] names one location in the document tree: a sequence of field
//! and index steps from the root, e.g. `images[2].pixels.channels[0]`.
//! Diagnostics carry paths the way compiler diagnostics carry spans.

use std::fmt;

use smallvec::SmallVec;

/// One step of an object path.
///
/// Field names come from the static schema catalog, so they are `'static`
/// and the whole step stays `Copy`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Step {
    /// Descend into a named field.
    Field(&'static str),
    /// Descend into one element of a sequence field.
    Index(u32),
}

/// Location of an object in the document tree.
///
/// Inline capacity covers the deepest catalog nesting
/// (`images[i].pixels.channels[j].light_source_settings` is five steps).
#[derive(Clone, Eq, PartialEq, Hash, Default)]
pub struct Path {
    steps: SmallVec<[Step; 8]>,
}

impl Path {
    /// The document root.
    pub fn root() -> Self {
        Path::default()
    }

    /// Build a path from steps, mostly for tests and fixtures.
    pub fn from_steps(steps: impl IntoIterator<Item = Step>) -> Self {
        Path {
            steps: steps.into_iter().collect(),
        }
    }

    /// Push a field step.
    pub fn push_field(&mut self, name: &'static str) {
        self.steps.push(Step::Field(name));
    }

    /// Push an index step.
    pub fn push_index(&mut self, index: usize) {
        // Document sequences are far below u32::MAX members; saturate
        // rather than carry a fallible signature through every walker.
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.steps.push(Step::Index(index));
    }

    /// Remove the most recent step.
    pub fn pop(&mut self) -> Option<Step> {
        self.steps.pop()
    }

    /// A new path extending this one by `step`.
    #[must_use]
    pub fn child(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Path { steps }
    }

    /// The steps from the root.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// True for the document root.
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Whether `other` is this path or lies underneath it.
    pub fn contains(&self, other: &Path) -> bool {
        other.steps.len() >= self.steps.len() && other.steps[..self.steps.len()] == self.steps[..]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "(root)");
        }
        let mut first = true;
        for step in &self.steps {
            match step {
                Step::Field(name) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                Step::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_root() {
        assert_eq!(Path::root().to_string(), "(root)");
    }

    #[test]
    fn display_mixed_steps() {
        let mut path = Path::root();
        path.push_field("images");
        path.push_index(2);
        path.push_field("pixels");
        path.push_field("channels");
        path.push_index(0);
        assert_eq!(path.to_string(), "images[2].pixels.channels[0]");
    }

    #[test]
    fn push_pop_round_trip() {
        let mut path = Path::root();
        path.push_field("rois");
        path.push_index(1);
        assert_eq!(path.depth(), 2);
        assert_eq!(path.pop(), Some(Step::Index(1)));
        assert_eq!(path.pop(), Some(Step::Field("rois")));
        assert!(path.is_root());
        assert_eq!(path.pop(), None);
    }

    #[test]
    fn child_does_not_mutate_parent() {
        let mut parent = Path::root();
        parent.push_field("instruments");
        let child = parent.child(Step::Index(0));
        assert_eq!(parent.depth(), 1);
        assert_eq!(child.depth(), 2);
        assert!(parent.contains(&child));
        assert!(!child.contains(&parent));
    }

    #[test]
    fn contains_is_prefix_based() {
        let images = Path::from_steps([Step::Field("images")]);
        let image0 = Path::from_steps([Step::Field("images"), Step::Index(0)]);
        let rois = Path::from_steps([Step::Field("rois")]);
        assert!(images.contains(&image0));
        assert!(images.contains(&images));
        assert!(!rois.contains(&image0));
        assert!(Path::root().contains(&rois));
    }
}
