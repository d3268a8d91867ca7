use std::fmt;

use omx_ids::Tag;
use omx_tree::Path;

use crate::DiagCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A recorded diagnostic: what happened, and where in the document.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported to a sink, not silently dropped"]
pub struct Diagnostic {
    /// Code for searchability.
    pub code: DiagCode,
    pub severity: Severity,
    /// Main message.
    pub message: String,
    /// Document path where the condition was observed.
    pub path: Option<Path>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: DiagCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            path: None,
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: DiagCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: DiagCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Record the document path where the condition was observed.
    pub fn at(mut self, path: Path) -> Self {
        self.path = Some(path);
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Check if this is an error (vs warning).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        if let Some(path) = &self.path {
            write!(f, "\n  --> {path}")?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}

/// Create a "casting invalid identifier" warning.
///
/// Message wording is stable: callers match on `Casting invalid <Tag>ID`.
/// `repaired` is `None` for reference positions whose replacement is only
/// known once the link pass runs.
pub fn casting_invalid_id(tag: Tag, original: &str, repaired: Option<&str>, path: Path) -> Diagnostic {
    let diag = Diagnostic::warning(DiagCode::W0101)
        .with_message(format!("Casting invalid {tag}ID"))
        .at(path)
        .with_note(format!("`{original}` does not match the {tag} pattern"));
    match repaired {
        Some(repaired) => diag.with_note(format!("repaired to `{repaired}`")),
        None => diag.with_note("repair deferred to reference resolution"),
    }
}

/// Create a "dangling reference" warning.
pub fn dangling_reference(target: &str, path: Path) -> Diagnostic {
    Diagnostic::warning(DiagCode::W0201)
        .with_message(format!("reference to `{target}` does not resolve"))
        .at(path)
        .with_note("the field keeps the raw identifier string")
}

/// Create a "deprecated field name" warning.
pub fn deprecated_field(record: &str, old: &str, new: &str) -> Diagnostic {
    Diagnostic::warning(DiagCode::W0102)
        .with_message(format!(
            "field `{old}` on {record} is deprecated, use `{new}`"
        ))
        .with_note(format!("`{old}` reads through to `{new}`"))
}

/// Create an "unknown field ignored" warning.
pub fn unknown_field(record: &str, field: &str, path: Path) -> Diagnostic {
    Diagnostic::warning(DiagCode::W0103)
        .with_message(format!("unknown field `{field}` on {record} ignored"))
        .at(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_collects_parts() {
        let mut path = Path::root();
        path.push_field("images");
        path.push_index(0);
        let diag = Diagnostic::error(DiagCode::E0102)
            .with_message("missing required field `pixels`")
            .at(path)
            .with_note("Image declares `pixels` as required");

        assert_eq!(diag.code, DiagCode::E0102);
        assert!(diag.is_error());
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(
            diag.to_string(),
            "error [E0102]: missing required field `pixels`\n  --> images[0]\n  = note: Image declares `pixels` as required"
        );
    }

    #[test]
    fn casting_message_wording_is_exact() {
        let diag = casting_invalid_id(
            Tag::Instrument,
            "Microscope",
            Some("Instrument:0"),
            Path::root(),
        );
        assert_eq!(diag.message, "Casting invalid InstrumentID");
        assert_eq!(diag.severity, Severity::Warning);
    }
}
