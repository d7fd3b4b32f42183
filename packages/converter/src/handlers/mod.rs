//! QRDA III business rules: the concrete decoders, validators and encoders.
//!
//! Each handler declares its registry keys through
//! [`Described`](crate::registry::Described) and is bound in
//! [`Registries::discover`](crate::registry::Registries::discover).

pub mod aci;
pub mod defaults;
pub mod document;
pub mod ia;
pub mod quality;
pub mod reporting;
pub mod section;

use crate::model::{Node, TemplateId};

/// Node value holding an aggregate count.
pub const AGGREGATE_COUNT: &str = "aggregateCount";

/// Node value holding a measure identifier.
pub const MEASURE_ID: &str = "measureId";

/// The aggregate count carried by a node's direct aggregate count child.
pub(crate) fn child_aggregate_count(node: &Node) -> Option<&str> {
    node.find_child(TemplateId::AciAggregateCount)
        .and_then(|count| count.value(AGGREGATE_COUNT))
}
