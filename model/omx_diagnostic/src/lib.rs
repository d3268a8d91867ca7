//! Diagnostics for document construction, resolution, and mutation.
//!
//! Fatal conditions surface as typed errors in the crates that raise them;
//! everything recoverable flows through here instead: a [`Diagnostic`] names
//! what happened (code, message, document path), and a [`DiagnosticSink`]
//! accumulates them in the order the session encountered them. A document
//! with warnings is still a usable document.

mod code;
mod diagnostic;
mod sink;

pub use code::DiagCode;
pub use diagnostic::{
    casting_invalid_id, dangling_reference, deprecated_field, unknown_field, Diagnostic, Severity,
};
pub use sink::DiagnosticSink;
