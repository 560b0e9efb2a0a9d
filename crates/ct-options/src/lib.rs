//! Layered option directives for code listing post-processing.
//!
//! Authors control listing passes with whitespace-separated directive strings
//! such as `"all -tags"` or `"+formatters"`. A directive can be set once for
//! the whole document and adjusted per listing block. This crate parses both
//! directives into operation sequences and resolves them, against a
//! compile-time default set, into the final set of active toggles.
//!
//! # Directive grammar
//!
//! Each whitespace-separated token is one operation:
//!
//! - `all` activates every toggle
//! - `none` clears every toggle
//! - `default` activates the compile-time defaults
//! - `+name` / `-name` adds or removes a single toggle
//! - `name` activates a single toggle
//!
//! Names are matched case-insensitively. An unknown name fails the whole
//! resolution with [`InvalidOptionToken`].
//!
//! # Layering
//!
//! A missing document directive means "use the defaults"; a missing block
//! directive means "inherit the document result". A block directive made only
//! of `+`/`-` operations adjusts the document result, while any `all`,
//! `none`, `default`, or bare-name token makes the block directive replace
//! the document directive outright.
//!
//! # Example
//!
//! ```
//! use ct_options::{ListingOption, Options};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Toggle {
//!     One,
//!     Two,
//! }
//!
//! impl ListingOption for Toggle {
//!     const MEMBERS: &'static [Self] = &[Self::One, Self::Two];
//!
//!     fn parse_name(name: &str) -> Option<Self> {
//!         match name.to_ascii_lowercase().as_str() {
//!             "one" => Some(Self::One),
//!             "two" => Some(Self::Two),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let options = Options::resolve(Some("all"), Some("-two"), &[Toggle::One])?;
//! assert!(options.has(Toggle::One));
//! assert!(!options.has(Toggle::Two));
//! # Ok::<(), ct_options::InvalidOptionToken>(())
//! ```

use std::fmt;

/// A closed set of named toggles controlled by a directive.
///
/// Implemented by each pass's toggle enum. `MEMBERS` lists every member in
/// declaration order; resolved sets iterate in that order.
pub trait ListingOption: Copy + Eq + fmt::Debug + 'static {
    /// Every member of the toggle set, in declaration order.
    const MEMBERS: &'static [Self];

    /// Parse a toggle from its directive name, case-insensitively.
    fn parse_name(name: &str) -> Option<Self>;
}

/// A directive token names an option outside the closed toggle set.
///
/// Resolution fails as a whole; there is no best-effort fallback, so a typo
/// in a directive never silently changes which passes run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid option token `{token}` in directive `{directive}`")]
pub struct InvalidOptionToken {
    /// The token that failed to parse.
    pub token: String,
    /// The full directive the token appeared in.
    pub directive: String,
}

/// One parsed directive token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation<E> {
    All,
    None,
    Default,
    Add(E),
    Remove(E),
    Value(E),
}

impl<E: ListingOption> Operation<E> {
    fn parse(token: &str, directive: &str) -> Result<Self, InvalidOptionToken> {
        if token.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else if token.eq_ignore_ascii_case("none") {
            Ok(Self::None)
        } else if token.eq_ignore_ascii_case("default") {
            Ok(Self::Default)
        } else if let Some(name) = token.strip_prefix('+') {
            Ok(Self::Add(parse_value(name, directive)?))
        } else if let Some(name) = token.strip_prefix('-') {
            Ok(Self::Remove(parse_value(name, directive)?))
        } else {
            Ok(Self::Value(parse_value(token, directive)?))
        }
    }

    /// Whether this operation makes a block directive replace the document
    /// directive instead of adjusting it.
    fn is_replacing(self) -> bool {
        matches!(self, Self::All | Self::None | Self::Default | Self::Value(_))
    }
}

fn parse_value<E: ListingOption>(name: &str, directive: &str) -> Result<E, InvalidOptionToken> {
    E::parse_name(name).ok_or_else(|| InvalidOptionToken {
        token: name.to_owned(),
        directive: directive.to_owned(),
    })
}

/// A resolved set of active toggles.
///
/// Constructed once per conversion from the document and block directive
/// strings via [`Options::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options<E: ListingOption> {
    active: Vec<E>,
}

impl<E: ListingOption> Options<E> {
    /// Resolve the document and block directives into the active toggle set.
    ///
    /// `None` and `""` are equivalent for both directives: an absent document
    /// directive resolves to `defaults`, and an absent block directive
    /// inherits the document result unchanged.
    pub fn resolve(
        document: Option<&str>,
        block: Option<&str>,
        defaults: &[E],
    ) -> Result<Self, InvalidOptionToken> {
        let mut operations = parse_directive(document, true)?;
        let block_operations = parse_directive(block, false)?;
        if block_operations.iter().any(|op| op.is_replacing()) {
            operations = block_operations;
        } else {
            operations.extend(block_operations);
        }
        Ok(Self {
            active: reduce(&operations, defaults),
        })
    }

    /// Whether the given toggle is active.
    #[must_use]
    pub fn has(&self, option: E) -> bool {
        self.active.contains(&option)
    }

    /// The active toggles, in declaration order.
    #[must_use]
    pub fn active(&self) -> &[E] {
        &self.active
    }

    /// Whether no toggle is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Iterate over the active toggles, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = E> + '_ {
        self.active.iter().copied()
    }
}

/// Parse one directive string into its operation sequence.
///
/// `default_when_empty` distinguishes the document scope (where an absent
/// directive means "use the defaults") from the block scope (where an absent
/// directive contributes nothing and the document result is inherited).
fn parse_directive<E: ListingOption>(
    directive: Option<&str>,
    default_when_empty: bool,
) -> Result<Vec<Operation<E>>, InvalidOptionToken> {
    let directive = directive.unwrap_or_default();
    if directive.is_empty() {
        return Ok(if default_when_empty {
            vec![Operation::Default]
        } else {
            Vec::new()
        });
    }
    directive
        .split_whitespace()
        .map(|token| Operation::parse(token, directive))
        .collect()
}

/// Reduce an operation sequence, left to right, into the active member set.
///
/// Later operations win for the same member. The result is ordered by enum
/// declaration order, not by operation order.
fn reduce<E: ListingOption>(operations: &[Operation<E>], defaults: &[E]) -> Vec<E> {
    let mut members: Vec<E> = Vec::new();
    let mut insert = |members: &mut Vec<E>, member: E| {
        if !members.contains(&member) {
            members.push(member);
        }
    };
    for operation in operations {
        match *operation {
            Operation::Default => {
                for &member in defaults {
                    insert(&mut members, member);
                }
            }
            Operation::All => {
                for &member in E::MEMBERS {
                    insert(&mut members, member);
                }
            }
            Operation::None => members.clear(),
            Operation::Add(member) | Operation::Value(member) => insert(&mut members, member),
            Operation::Remove(member) => members.retain(|&m| m != member),
        }
    }
    E::MEMBERS
        .iter()
        .copied()
        .filter(|member| members.contains(member))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestOption {
        One,
        Two,
        Three,
    }

    impl TestOption {
        const DEFAULTS: &'static [Self] = &[Self::One, Self::Three];
    }

    impl ListingOption for TestOption {
        const MEMBERS: &'static [Self] = &[Self::One, Self::Two, Self::Three];

        fn parse_name(name: &str) -> Option<Self> {
            match name.to_ascii_lowercase().as_str() {
                "one" => Some(Self::One),
                "two" => Some(Self::Two),
                "three" => Some(Self::Three),
                _ => None,
            }
        }
    }

    fn resolve(document: &str, block: &str) -> Options<TestOption> {
        Options::resolve(Some(document), Some(block), TestOption::DEFAULTS).unwrap()
    }

    #[test]
    fn test_document_values() {
        let options = resolve("one two", "");
        assert_eq!(options.active(), [TestOption::One, TestOption::Two]);
    }

    #[test]
    fn test_document_none_is_empty() {
        let options = resolve("none", "");
        assert!(options.is_empty());
    }

    #[test]
    fn test_document_all_activates_everything() {
        let options = resolve("all", "");
        assert_eq!(options.active(), TestOption::MEMBERS);
    }

    #[test]
    fn test_document_adds_and_removes_apply_in_order() {
        let options = resolve("all -three -one", "");
        assert_eq!(options.active(), [TestOption::Two]);
    }

    #[test]
    fn test_block_value_replaces_document() {
        let options = resolve("all", "two");
        assert_eq!(options.active(), [TestOption::Two]);
    }

    #[test]
    fn test_block_removal_adjusts_document() {
        let options = resolve("one two", "-two");
        assert_eq!(options.active(), [TestOption::One]);
    }

    #[test]
    fn test_block_addition_adjusts_document() {
        let options = resolve("one", "+two");
        assert_eq!(options.active(), [TestOption::One, TestOption::Two]);
    }

    #[test]
    fn test_both_absent_yields_defaults() {
        let options = resolve("", "");
        assert_eq!(options.active(), TestOption::DEFAULTS);
        let options = Options::resolve(None, None, TestOption::DEFAULTS).unwrap();
        assert_eq!(options.active(), TestOption::DEFAULTS);
    }

    #[test]
    fn test_absent_document_with_block_addition() {
        let options = resolve("", "+two");
        assert_eq!(options.active(), TestOption::MEMBERS);
    }

    #[test]
    fn test_absent_document_with_block_removal() {
        let options = resolve("", "-three");
        assert_eq!(options.active(), [TestOption::One]);
    }

    #[test]
    fn test_block_none_discards_document() {
        let options = resolve("all", "none");
        assert!(options.is_empty());
    }

    #[test]
    fn test_block_default_discards_document() {
        let options = resolve("two", "default");
        assert_eq!(options.active(), TestOption::DEFAULTS);
    }

    #[test]
    fn test_replacing_block_ignores_document_entirely() {
        // Any all/none/default/bare token makes the block stand alone.
        for block in ["all", "none", "default", "two", "two -one"] {
            let layered = resolve("one three", block);
            let alone = resolve("", block);
            assert_eq!(layered, alone, "block directive `{block}`");
        }
    }

    #[test]
    fn test_adjusting_block_equals_concatenated_directives() {
        let layered = resolve("all -three", "-one +three");
        let flat = resolve("all -three -one +three", "");
        assert_eq!(layered, flat);
    }

    #[test]
    fn test_later_operations_override_earlier_ones() {
        let options = resolve("-one +one none +two", "");
        assert_eq!(options.active(), [TestOption::Two]);
    }

    #[test]
    fn test_names_parse_case_insensitively() {
        let options = resolve("ALL -Three", "");
        assert_eq!(options.active(), [TestOption::One, TestOption::Two]);
    }

    #[test]
    fn test_unknown_name_fails() {
        let error = Options::<TestOption>::resolve(Some("one bogus"), Some(""), TestOption::DEFAULTS)
            .unwrap_err();
        assert_eq!(error.token, "bogus");
        assert_eq!(error.directive, "one bogus");
        assert_eq!(
            error.to_string(),
            "invalid option token `bogus` in directive `one bogus`"
        );
    }

    #[test]
    fn test_unknown_name_in_block_fails() {
        let error = Options::<TestOption>::resolve(Some("all"), Some("+nope"), TestOption::DEFAULTS)
            .unwrap_err();
        assert_eq!(error.token, "nope");
        assert_eq!(error.directive, "+nope");
    }

    #[test]
    fn test_iter_yields_declaration_order() {
        let options = resolve("three one", "");
        let collected: Vec<_> = options.iter().collect();
        assert_eq!(collected, [TestOption::One, TestOption::Three]);
    }

    #[test]
    fn test_has() {
        let options = resolve("one", "");
        assert!(options.has(TestOption::One));
        assert!(!options.has(TestOption::Two));
    }
}
