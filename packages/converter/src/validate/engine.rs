//! Validate engine that runs every applicable validator over the node tree.

use std::panic::{self, AssertUnwindSafe};

use indexmap::IndexMap;

use crate::config::UNEXPECTED_ERROR;
use crate::context::Context;
use crate::model::{AllErrors, Detail, Error, Node, TemplateId};

/// Defects grouped by the top-level node they were found under.
type Groups = IndexMap<(TemplateId, String), Error>;

/// Engine that walks the node tree and collects validation defects.
///
/// The walk is pre-order with children in document order, so the report is
/// deterministic. A validator that panics is reported as an
/// [`UNEXPECTED_ERROR`] detail on its node; the walk continues.
pub struct ValidateEngine<'c> {
    context: &'c Context,
}

impl<'c> ValidateEngine<'c> {
    /// Create an engine for a context.
    #[must_use]
    pub fn new(context: &'c Context) -> Self {
        Self { context }
    }

    /// Validate a whole tree.
    ///
    /// Details are grouped into one [`Error`] per top-level node: the root
    /// itself, or one of the root's children together with its subtree.
    /// Returns an empty report when validation is disabled.
    #[must_use]
    pub fn validate(&self, tree: &Node) -> AllErrors {
        if !self.context.do_validation() {
            tracing::debug!("Validation disabled, skipping");
            return AllErrors::new();
        }

        let mut groups = Groups::new();
        self.record(tree, tree, &mut groups);
        for child in tree.children() {
            self.visit(child, child, &mut groups);
        }

        let mut errors = AllErrors::new();
        for error in groups.into_values() {
            errors.add_error(error);
        }
        errors
    }

    fn visit(&self, node: &Node, top: &Node, groups: &mut Groups) {
        self.record(node, top, groups);
        for child in node.children() {
            self.visit(child, top, groups);
        }
    }

    fn record(&self, node: &Node, top: &Node, groups: &mut Groups) {
        let details = self.check(node);
        if details.is_empty() {
            return;
        }
        let error = groups
            .entry((top.template(), top.path().to_string()))
            .or_insert_with(|| Error::new(top.template().name()).with_path(top.path()));
        for detail in details {
            error.add_detail(detail);
        }
    }

    /// Run every validator bound to the node's template.
    pub fn check(&self, node: &Node) -> Vec<Detail> {
        let mut details = Vec::new();
        for validator in self.context.validators_for(node.template()) {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| validator.validate(node, self.context)));
            match outcome {
                Ok(found) => details.extend(found),
                Err(_) => {
                    tracing::warn!(
                        template = %node.template(),
                        path = %node.path(),
                        "Validator panicked"
                    );
                    details.push(Detail::new(UNEXPECTED_ERROR).with_path(node.path()));
                }
            }
        }
        details
    }
}

/// Validate a tree with the handlers in `context`.
#[must_use]
pub fn validate(context: &Context, tree: &Node) -> AllErrors {
    ValidateEngine::new(context).validate(tree)
}
