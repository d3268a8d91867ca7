use std::fmt;

/// Codes for all session diagnostics.
///
/// Format: E#### / W#### where the second digit indicates phase:
/// - x1xx: construction (identity assignment, field decoding)
/// - x2xx: resolution (index and link passes)
/// - x3xx: mutation
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagCode {
    // Construction warnings (W01xx)
    /// Identifier failed pattern validation and was repaired
    W0101,
    /// Deprecated field name accessed through the compatibility table
    W0102,
    /// Unknown field ignored while decoding a record
    W0103,

    // Resolution warnings (W02xx)
    /// Reference target not present in the document
    W0201,

    // Construction errors (E01xx)
    /// Same identifier assigned to two objects of one type
    E0101,
    /// Tree shape does not match the record schema
    E0102,
    /// Value is not a permitted variant for the collection
    E0103,
    /// Explicit kind discriminator names no known variant
    E0104,
    /// No variant accepted the mapping in priority order
    E0105,

    // Resolution errors (E02xx)
    /// Index pass did not visit every claimed identity
    E0201,

    // Mutation errors (E03xx)
    /// Mutation validated against the live document and was refused
    E0301,
}

impl DiagCode {
    /// The code as a string (e.g. `"W0101"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagCode::W0101 => "W0101",
            DiagCode::W0102 => "W0102",
            DiagCode::W0103 => "W0103",
            DiagCode::W0201 => "W0201",
            DiagCode::E0101 => "E0101",
            DiagCode::E0102 => "E0102",
            DiagCode::E0103 => "E0103",
            DiagCode::E0104 => "E0104",
            DiagCode::E0105 => "E0105",
            DiagCode::E0201 => "E0201",
            DiagCode::E0301 => "E0301",
        }
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
