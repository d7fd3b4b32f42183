//! Fluent checks over a single node.

use regex::Regex;

use crate::model::{Detail, Node, TemplateId};

/// Accumulates defects found on one node.
///
/// Every failed check records a [`Detail`] located at the node's path. Checks
/// on an optional value only apply when the value is present; combine them
/// with [`Checker::value`] to make it required.
///
/// # Examples
/// ```
/// use qpp_converter::model::{Node, TemplateId};
/// use qpp_converter::validate::Checker;
///
/// let node = Node::new(TemplateId::AciAggregateCount).with_value("aggregateCount", "x");
/// let details = Checker::check(&node)
///     .value("count missing", "aggregateCount")
///     .int_value("count is not a number", "aggregateCount")
///     .into_details();
///
/// assert_eq!(details.len(), 1);
/// assert_eq!(details[0].message, "count is not a number");
/// ```
#[derive(Debug)]
pub struct Checker<'a> {
    node: &'a Node,
    details: Vec<Detail>,
}

impl<'a> Checker<'a> {
    /// Start checking a node.
    #[must_use]
    pub fn check(node: &'a Node) -> Self {
        Self {
            node,
            details: Vec::new(),
        }
    }

    fn fail(&mut self, message: &str) {
        self.details
            .push(Detail::new(message).with_path(self.node.path()));
    }

    fn present(&self, name: &str) -> Option<&'a str> {
        self.node.value(name).filter(|v| !v.trim().is_empty())
    }

    /// Require a non-blank value.
    #[must_use]
    pub fn value(mut self, message: &str, name: &str) -> Self {
        if self.present(name).is_none() {
            self.fail(message);
        }
        self
    }

    /// A present value must parse as an integer.
    #[must_use]
    pub fn int_value(mut self, message: &str, name: &str) -> Self {
        if let Some(v) = self.present(name) {
            if v.trim().parse::<i64>().is_err() {
                self.fail(message);
            }
        }
        self
    }

    /// A present integer value must not be negative.
    ///
    /// Non-integer values are left to [`Checker::int_value`].
    #[must_use]
    pub fn non_negative(mut self, message: &str, name: &str) -> Self {
        if let Some(Ok(n)) = self.present(name).map(|v| v.trim().parse::<i64>()) {
            if n < 0 {
                self.fail(message);
            }
        }
        self
    }

    /// A present value must match a pattern.
    #[must_use]
    pub fn matches(mut self, message: &str, name: &str, pattern: &Regex) -> Self {
        if let Some(v) = self.present(name) {
            if !pattern.is_match(v) {
                self.fail(message);
            }
        }
        self
    }

    /// A present value must be one of `allowed`.
    #[must_use]
    pub fn one_of(mut self, message: &str, name: &str, allowed: &[&str]) -> Self {
        if let Some(v) = self.present(name) {
            if !allowed.contains(&v) {
                self.fail(message);
            }
        }
        self
    }

    /// Require at least `minimum` children among `templates`.
    #[must_use]
    pub fn child_minimum(mut self, message: &str, minimum: usize, templates: &[TemplateId]) -> Self {
        if self.count_children(templates) < minimum {
            self.fail(message);
        }
        self
    }

    /// Require exactly `count` children among `templates`.
    #[must_use]
    pub fn child_exact(mut self, message: &str, count: usize, templates: &[TemplateId]) -> Self {
        if self.count_children(templates) != count {
            self.fail(message);
        }
        self
    }

    /// Record a defect when `condition` does not hold.
    #[must_use]
    pub fn that(mut self, message: &str, condition: bool) -> Self {
        if !condition {
            self.fail(message);
        }
        self
    }

    fn count_children(&self, templates: &[TemplateId]) -> usize {
        self.node
            .children()
            .iter()
            .filter(|c| templates.contains(&c.template()))
            .count()
    }

    /// Number of defects recorded so far.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.details.len()
    }

    /// Finish and return the defects.
    #[must_use]
    pub fn into_details(self) -> Vec<Detail> {
        self.details
    }
}
