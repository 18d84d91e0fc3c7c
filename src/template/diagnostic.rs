use serde::{Deserialize, Serialize};

/// Severity of a non-fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A non-fatal finding attached to an otherwise successful translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Placeholder the finding is about.
    pub placeholder: String,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(placeholder: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            placeholder: placeholder.into(),
            message: message.into(),
        }
    }

    pub fn info(placeholder: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            placeholder: placeholder.into(),
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.placeholder, self.message)
    }
}
