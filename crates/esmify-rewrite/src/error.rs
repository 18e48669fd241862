//! Rule errors.

/// Error raised while building or applying a rewrite rule.
///
/// Custom rule functions report failures with [`RuleError::rejected`]; the
/// resolver, visitor and name mapper hand these back to the caller untouched.
#[derive(Debug)]
pub enum RuleError {
    /// A record entry's pattern failed to compile.
    InvalidPattern {
        alias: String,
        source: regex::Error,
    },
    /// A caller-supplied rewrite function refused a specifier.
    Rejected { specifier: String, reason: String },
}

impl RuleError {
    pub fn rejected(specifier: impl Into<String>, reason: impl Into<String>) -> Self {
        RuleError::Rejected {
            specifier: specifier.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleError::InvalidPattern { alias, source } => {
                write!(f, "invalid pattern for rewrite alias '{alias}': {source}")
            }
            RuleError::Rejected { specifier, reason } => {
                write!(f, "rewrite rule failed for '{specifier}': {reason}")
            }
        }
    }
}

impl std::error::Error for RuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuleError::InvalidPattern { source, .. } => Some(source),
            RuleError::Rejected { .. } => None,
        }
    }
}
