//! Listing converter chain.
//!
//! The host document pipeline resolves each listing block's attributes and
//! hands the raw listing text to a converter chain before rendering. The
//! chain is fixed per output target: HTML targets chomp and then fold, flat
//! targets (plain text, PDF) chomp and then strip the fold markers that
//! would otherwise leak into output that cannot fold.

use std::collections::HashMap;

use ct_language::Language;
use ct_options::{ListingOption, Options};

use crate::chomp::{self, ChompOption};
use crate::error::ConvertError;
use crate::fold::{self, FoldOption};

const LANGUAGE_ATTRIBUTE: &str = "language";
const CHOMP_ATTRIBUTE: &str = "chomp";
const FOLD_ATTRIBUTE: &str = "fold";
const PACKAGE_REPLACEMENT_ATTRIBUTE: &str = "chomp_package_replacement";

/// Attributes supplied by the host document model for one listing block.
///
/// Directive attributes resolve at two scopes: document-wide and per block.
/// The scopes layer per attribute: directives merge through the option
/// algebra, while plain values (the package replacement) resolve block-first.
///
/// # Example
///
/// ```
/// use ct_listings::ListingAttributes;
///
/// let attributes = ListingAttributes::new()
///     .with_document_attribute("chomp", "none")
///     .with_block_attribute("language", "java")
///     .with_block_attribute("chomp", "+headers");
///
/// assert_eq!(attributes.attribute("chomp"), Some("+headers"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListingAttributes {
    document: HashMap<String, String>,
    block: HashMap<String, String>,
}

impl ListingAttributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a document-scope attribute.
    #[must_use]
    pub fn with_document_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.document.insert(name.into(), value.into());
        self
    }

    /// Set a block-scope attribute.
    #[must_use]
    pub fn with_block_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.block.insert(name.into(), value.into());
        self
    }

    /// Look up a document-scope attribute.
    #[must_use]
    pub fn document_attribute(&self, name: &str) -> Option<&str> {
        self.document.get(name).map(String::as_str)
    }

    /// Look up a block-scope attribute.
    #[must_use]
    pub fn block_attribute(&self, name: &str) -> Option<&str> {
        self.block.get(name).map(String::as_str)
    }

    /// Look up an attribute, block scope overriding document scope.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.block_attribute(name)
            .or_else(|| self.document_attribute(name))
    }

    /// The block's language, if it names one in the supported table.
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.block_attribute(LANGUAGE_ATTRIBUTE)
            .and_then(Language::parse)
    }

    fn options<E: ListingOption>(
        &self,
        attribute: &'static str,
        defaults: &[E],
    ) -> Result<Options<E>, ConvertError> {
        Options::resolve(
            self.document_attribute(attribute),
            self.block_attribute(attribute),
            defaults,
        )
        .map_err(|source| ConvertError::InvalidDirective { attribute, source })
    }
}

/// One conversion pass over a listing block's content.
pub trait ListingConverter {
    /// Convert the content, given the block's resolved attributes.
    fn convert(
        &self,
        attributes: &ListingAttributes,
        content: &str,
    ) -> Result<String, ConvertError>;
}

/// Applies the chomp pipeline, driven by the `chomp` directive attribute.
#[derive(Debug, Default)]
pub struct ChompConverter;

impl ListingConverter for ChompConverter {
    fn convert(
        &self,
        attributes: &ListingAttributes,
        content: &str,
    ) -> Result<String, ConvertError> {
        let options = attributes.options(CHOMP_ATTRIBUTE, ChompOption::DEFAULTS)?;
        let replacement = attributes.attribute(PACKAGE_REPLACEMENT_ATTRIBUTE);
        tracing::debug!(options = ?options.active(), "chomping listing");
        Ok(chomp::chomp(
            content,
            attributes.language(),
            &options,
            replacement,
        ))
    }
}

/// Applies folding markup, driven by the `fold` directive attribute.
#[derive(Debug, Default)]
pub struct FoldConverter;

impl ListingConverter for FoldConverter {
    fn convert(
        &self,
        attributes: &ListingAttributes,
        content: &str,
    ) -> Result<String, ConvertError> {
        let options = attributes.options(FOLD_ATTRIBUTE, FoldOption::DEFAULTS)?;
        tracing::debug!(options = ?options.active(), "folding listing");
        Ok(fold::fold(content, attributes.language(), &options))
    }
}

/// Strips fold marker lines for output targets that cannot fold.
///
/// Honors the same `fold` directive resolution as [`FoldConverter`], so
/// disabling folding at document scope leaves listings untouched on flat
/// targets too.
#[derive(Debug, Default)]
pub struct FoldRemovalConverter;

impl ListingConverter for FoldRemovalConverter {
    fn convert(
        &self,
        attributes: &ListingAttributes,
        content: &str,
    ) -> Result<String, ConvertError> {
        let options = attributes.options(FOLD_ATTRIBUTE, FoldOption::DEFAULTS)?;
        if !ct_language::is_java_like(attributes.language()) || !options.has(FoldOption::Tags) {
            return Ok(content.to_owned());
        }
        Ok(fold::remove_fold_markers(content))
    }
}

/// An ordered chain of listing converters.
///
/// # Example
///
/// ```
/// use ct_listings::{ListingAttributes, ListingConverters};
///
/// let attributes = ListingAttributes::new().with_block_attribute("language", "java");
/// let converters = ListingConverters::html();
/// let converted = converters
///     .convert(&attributes, "// copyright\npackage com.example;\n\nclass A {}")?;
/// assert_eq!(converted, "class A {}");
/// # Ok::<(), ct_listings::ConvertError>(())
/// ```
pub struct ListingConverters {
    converters: Vec<Box<dyn ListingConverter>>,
}

impl ListingConverters {
    /// Converter chain for HTML output: chomp, then fold.
    #[must_use]
    pub fn html() -> Self {
        Self {
            converters: vec![Box::new(ChompConverter), Box::new(FoldConverter)],
        }
    }

    /// Converter chain for flat output targets: chomp, then remove fold
    /// markers.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            converters: vec![Box::new(ChompConverter), Box::new(FoldRemovalConverter)],
        }
    }

    /// Convert one listing block's content through the chain.
    ///
    /// Fails on the first converter error; a malformed directive aborts the
    /// whole snippet rather than producing partial output.
    pub fn convert(
        &self,
        attributes: &ListingAttributes,
        content: &str,
    ) -> Result<String, ConvertError> {
        let mut converted = content.to_owned();
        for converter in &self.converters {
            converted = converter.convert(attributes, &converted)?;
        }
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn java_block() -> ListingAttributes {
        ListingAttributes::new().with_block_attribute("language", "java")
    }

    #[test]
    fn test_attribute_block_overrides_document() {
        let attributes = ListingAttributes::new()
            .with_document_attribute("chomp_package_replacement", "org.doc")
            .with_block_attribute("chomp_package_replacement", "org.block");
        assert_eq!(
            attributes.attribute("chomp_package_replacement"),
            Some("org.block")
        );
    }

    #[test]
    fn test_attribute_falls_back_to_document() {
        let attributes =
            ListingAttributes::new().with_document_attribute("chomp_package_replacement", "org.doc");
        assert_eq!(
            attributes.attribute("chomp_package_replacement"),
            Some("org.doc")
        );
    }

    #[test]
    fn test_language_resolution() {
        assert_eq!(java_block().language(), Some(Language::Java));
        assert_eq!(ListingAttributes::new().language(), None);
        let unknown = ListingAttributes::new().with_block_attribute("language", "rust");
        assert_eq!(unknown.language(), None);
    }

    #[test]
    fn test_html_chain_chomps_and_folds() {
        let content = "// copyright\npackage com.example;\n\nimport a.B;\n\npublic class X {}";
        let converted = ListingConverters::html()
            .convert(&java_block(), content)
            .unwrap();
        assert_eq!(
            converted,
            "<span class=\"fold-block hide-when-folded\">import a.B;\n\n</span>\
             <span class=\"fold-block\">public class X {}\n</span>"
        );
    }

    #[test]
    fn test_unknown_language_passes_through() {
        let content = "// copyright\npackage com.example;\n\nimport a.B;\n\npublic class X {}";
        let attributes = ListingAttributes::new();
        let converted = ListingConverters::html().convert(&attributes, content).unwrap();
        assert_eq!(converted, content);
    }

    #[test]
    fn test_block_directive_adjusts_document_directive() {
        let content = "// copyright\npackage com.example;\n\npublic class X {}";
        let attributes = java_block()
            .with_document_attribute("chomp", "none")
            .with_block_attribute("chomp", "+headers");
        let converted = ListingConverters::html().convert(&attributes, content).unwrap();
        assert_eq!(converted, "package com.example;\n\npublic class X {}");
    }

    #[test]
    fn test_package_replacement_attribute_is_used() {
        let content = "package com.example;\n\npublic class X {}";
        let attributes = java_block()
            .with_block_attribute("chomp", "packages")
            .with_document_attribute("chomp_package_replacement", "org.test");
        let converted = ListingConverters::html().convert(&attributes, content).unwrap();
        assert_eq!(converted, "package org.test;\n\npublic class X {}");
    }

    #[test]
    fn test_invalid_chomp_directive_fails_with_context() {
        let attributes = java_block().with_block_attribute("chomp", "+bogus");
        let error = ListingConverters::html()
            .convert(&attributes, "class X {}")
            .unwrap_err();
        let ConvertError::InvalidDirective { attribute, source } = error;
        assert_eq!(attribute, "chomp");
        assert_eq!(source.token, "bogus");
        assert_eq!(source.directive, "+bogus");
    }

    #[test]
    fn test_invalid_fold_directive_fails_with_context() {
        let attributes = java_block()
            .with_block_attribute("chomp", "none")
            .with_document_attribute("fold", "sideways");
        let error = ListingConverters::html()
            .convert(&attributes, "class X {}")
            .unwrap_err();
        let ConvertError::InvalidDirective { attribute, source } = error;
        assert_eq!(attribute, "fold");
        assert_eq!(source.token, "sideways");
    }

    #[test]
    fn test_flat_chain_removes_fold_markers() {
        let content = "class X {\n\t// @fold:on // fields\n\tint a;\n\t// @fold:off\n}";
        let attributes = java_block().with_block_attribute("chomp", "none");
        let converted = ListingConverters::flat().convert(&attributes, content).unwrap();
        assert_eq!(converted, "class X {\n\tint a;\n}");
    }

    #[test]
    fn test_flat_chain_honors_disabled_folding() {
        let content = "class X {\n\t// @fold:on\n\tint a;\n\t// @fold:off\n}";
        let attributes = java_block()
            .with_block_attribute("chomp", "none")
            .with_document_attribute("fold", "none");
        let converted = ListingConverters::flat().convert(&attributes, content).unwrap();
        assert_eq!(converted, content);
    }

    #[test]
    fn test_flat_chain_leaves_unknown_language_alone() {
        let content = "# not java\n// @fold:on\n";
        let attributes = ListingAttributes::new().with_block_attribute("language", "python");
        let converted = ListingConverters::flat().convert(&attributes, content).unwrap();
        assert_eq!(converted, content);
    }

    #[test]
    fn test_empty_content_stays_empty() {
        let converted = ListingConverters::html().convert(&java_block(), "").unwrap();
        assert_eq!(converted, "");
    }
}
