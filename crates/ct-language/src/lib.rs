//! Language table for processed code listings.
//!
//! Listing blocks carry a `language` attribute supplied by the host document
//! model. This crate maps that attribute onto a small static table of
//! supported languages, each exposing the conventions that the chomp and fold
//! passes need: a statement terminator token and a flag marking whether the
//! language follows Java-like conventions (package statements, brace blocks).

/// Supported listing languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Java,
    Kotlin,
    Groovy,
}

impl Language {
    /// Parse a language from the `language` attribute of a listing block.
    ///
    /// Returns `None` if the language is not in the supported table. Unknown
    /// languages are treated as not Java-like, so every listing pass becomes
    /// a no-op for them.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "java" => Some(Self::Java),
            "kotlin" => Some(Self::Kotlin),
            "groovy" => Some(Self::Groovy),
            _ => None,
        }
    }

    /// Identifier used in the `language` attribute.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::Groovy => "groovy",
        }
    }

    /// Human readable title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Java => "Java",
            Self::Kotlin => "Kotlin",
            Self::Groovy => "Groovy",
        }
    }

    /// Source file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Kotlin => "kt",
            Self::Groovy => "groovy",
        }
    }

    /// Token that ends a statement, used when building package patterns.
    ///
    /// Kotlin and Groovy package statements have no terminator.
    #[must_use]
    pub fn statement_terminator(self) -> &'static str {
        match self {
            Self::Java => ";",
            Self::Kotlin | Self::Groovy => "",
        }
    }

    /// Whether this language follows Java-like conventions.
    #[must_use]
    pub fn is_java_like(self) -> bool {
        matches!(self, Self::Java | Self::Kotlin | Self::Groovy)
    }
}

/// Whether an optionally-resolved language is Java-like.
///
/// Absent or unknown languages are not Java-like.
#[must_use]
pub fn is_java_like(language: Option<Language>) -> bool {
    language.is_some_and(Language::is_java_like)
}
