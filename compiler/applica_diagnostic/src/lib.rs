//! Contains the definition of the [`Diagnostic`] struct and related types.

use serde::{Deserialize, Serialize};

/// Implement this trait for a type that can report a diagnostic.
///
/// This trait is typically implemented by the structs that encode the
/// resolution errors. Keeping the error values separate from the rendered
/// [`Diagnostic`] lets the resolver enumerate every issue of a declaration
/// before deciding how (and whether) to present them.
pub trait Report<Param> {
    /// Creates a diagnostic.
    fn report(&self, parameter: Param) -> Diagnostic;
}

/// Enumeration of the severity levels of a diagnostic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum Severity {
    /// A configuration error that makes the constraint unusable.
    Error,

    /// A suspicious configuration that still resolves.
    Warning,

    /// An informational message.
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
            Self::Info => f.write_str("info"),
        }
    }
}

/// A struct containing all the information required to display the diagnostic
/// to the user.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Diagnostic {
    /// The message to display to the user.
    pub message: String,

    /// The severity of the diagnostic.
    pub severity: Severity,

    /// The optional help message to display to the user. This will be
    /// displayed alongside the main message.
    pub help_message: Option<String>,

    /// List of related notes to display to the user.
    ///
    /// For example, for an ambiguous resolution, this lists every validator
    /// that competes for the element type.
    pub related: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            help_message: None,
            related: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic with the given message.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, ..Self::error(message) }
    }

    /// Sets the help message.
    #[must_use]
    pub fn with_help(mut self, help_message: impl Into<String>) -> Self {
        self.help_message = Some(help_message.into());
        self
    }

    /// Appends a related note.
    #[must_use]
    pub fn with_related(mut self, related: impl Into<String>) -> Self {
        self.related.push(related.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.severity, self.message)?;

        for related in &self.related {
            write!(f, "\n  = note: {related}")?;
        }

        if let Some(help_message) = &self.help_message {
            write!(f, "\n  = help: {help_message}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Diagnostic, Severity};

    #[test]
    fn display() {
        let diagnostic = Diagnostic::error("the constraint `Size` is ambiguous")
            .with_related("`SizeValidatorForCollection` accepts `Collection`")
            .with_help("declare a more specific validator");

        assert_eq!(
            diagnostic.to_string(),
            "[error]: the constraint `Size` is ambiguous\n  = note: \
             `SizeValidatorForCollection` accepts `Collection`\n  = help: \
             declare a more specific validator"
        );
    }

    #[test]
    fn warning_keeps_message() {
        let diagnostic = Diagnostic::warning("unused");

        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.message, "unused");
        assert!(diagnostic.related.is_empty());
    }
}
