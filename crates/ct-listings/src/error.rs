//! Error types for listing conversion.

use ct_options::InvalidOptionToken;

/// Error during conversion of one listing block.
///
/// Conversion of a snippet aborts on the first error; there is no partial
/// output. The wrapped source carries the offending token and directive so
/// the author can locate the malformed attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// A `chomp` or `fold` attribute held an unparseable directive.
    #[error("invalid `{attribute}` directive")]
    InvalidDirective {
        /// Name of the attribute the directive came from.
        attribute: &'static str,
        /// The parse failure.
        #[source]
        source: InvalidOptionToken,
    },
}
