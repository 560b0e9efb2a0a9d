//! Post-processing for code listings embedded in documentation.
//!
//! Published listings rarely show source files as they exist on disk:
//! license headers and package statements are chomped away, marked text is
//! redacted, and import blocks fold behind a show/hide affordance. This
//! crate implements those passes as pure text transformations over one
//! listing block at a time.
//!
//! # Architecture
//!
//! Conversion is a fixed chain of passes, each driven by a layered directive
//! attribute resolved through [`ct_options`]:
//!
//! 1. **Chomp** ([`chomp`]): ordered boilerplate-removal rules, gated by
//!    [`ChompOption`] toggles.
//! 2. **Fold** ([`fold`]): partitions lines into plain and foldable blocks
//!    and renders fold markup, gated by [`FoldOption`] toggles. Flat output
//!    targets use a marker-removal pass instead.
//!
//! Both passes apply only to Java-like languages from the [`ct_language`]
//! table; anything else passes through untouched.
//!
//! Each conversion call is a pure function of its inputs with no shared
//! mutable state, so the host may convert independent snippets concurrently.
//!
//! # Example
//!
//! ```
//! use ct_listings::{ListingAttributes, ListingConverters};
//!
//! let attributes = ListingAttributes::new()
//!     .with_block_attribute("language", "java")
//!     .with_block_attribute("fold", "none");
//!
//! let content = "// (c) 2026 the authors\npackage com.example;\n\nclass Greeter {}";
//! let converted = ListingConverters::html().convert(&attributes, content)?;
//! assert_eq!(converted, "class Greeter {}");
//! # Ok::<(), ct_listings::ConvertError>(())
//! ```

mod chomp;
mod convert;
mod error;
mod fold;

pub use chomp::{ChompOption, chomp};
pub use convert::{
    ChompConverter, FoldConverter, FoldRemovalConverter, ListingAttributes, ListingConverter,
    ListingConverters,
};
pub use error::ConvertError;
pub use fold::{FoldOption, fold};
