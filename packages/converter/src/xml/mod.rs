//! XML utilities for reading QRDA documents.

mod utils;

pub use utils::{
    absolute_path, attribute_at, element_children, find_all_by_path, find_by_path, find_child,
    find_id, get_tag_name, id_extension, template_roots,
};
