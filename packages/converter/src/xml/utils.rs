//! Helpers for navigating QRDA element trees.
//!
//! QRDA documents live in the `urn:hl7-org:v3` namespace; every lookup here
//! compares local names only.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use qpp_converter::xml::get_tag_name;
///
/// let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3"><component/></ClinicalDocument>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "ClinicalDocument");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find a descendant element matching a slash-separated path of tag names.
///
/// Each step takes the first matching child.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use qpp_converter::xml::find_by_path;
///
/// let xml = r#"<act><effectiveTime><low value="20170101"/></effectiveTime></act>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let low = find_by_path(doc.root_element(), "effectiveTime/low").unwrap();
/// assert_eq!(low.attribute("value"), Some("20170101"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .try_fold(node, |current, part| find_child(current, part))
}

/// Find all elements reached by a path, where the last step may match several
/// siblings and every intermediate step may match several elements too.
pub fn find_all_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];
    for part in path.split('/') {
        current = current
            .into_iter()
            .flat_map(|n| {
                n.children()
                    .filter(move |c| c.is_element() && get_tag_name(*c) == part)
            })
            .collect();
    }
    current
}

/// Get an attribute value from the element at `path` below `node`.
pub fn attribute_at<'a>(node: Node<'a, '_>, path: &str, name: &str) -> Option<&'a str> {
    find_by_path(node, path).and_then(|n| n.attribute(name))
}

/// Find the `extension` of the first element at `path` whose `root` matches.
///
/// QRDA identifies TINs, NPIs and measures by `<id root=".." extension=".."/>`
/// pairs; several ids with different roots may sit side by side.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use qpp_converter::xml::id_extension;
///
/// let xml = r#"<assignedEntity>
///     <id root="2.16.840.1.113883.4.6" extension="2567891421"/>
///     <representedOrganization>
///         <id root="2.16.840.1.113883.4.2" extension="123456789"/>
///     </representedOrganization>
/// </assignedEntity>"#;
/// let doc = Document::parse(xml).unwrap();
/// let entity = doc.root_element();
///
/// assert_eq!(id_extension(entity, "id", "2.16.840.1.113883.4.6"), Some("2567891421"));
/// assert_eq!(
///     id_extension(entity, "representedOrganization/id", "2.16.840.1.113883.4.2"),
///     Some("123456789")
/// );
/// assert_eq!(id_extension(entity, "id", "2.16.840.1.113883.4.2"), None);
/// ```
pub fn id_extension<'a>(node: Node<'a, '_>, path: &str, root: &str) -> Option<&'a str> {
    find_id(node, path, root).and_then(|n| n.attribute("extension"))
}

/// Find the first element at `path` whose `root` matches, with or without an
/// `extension`.
pub fn find_id<'a, 'input>(
    node: Node<'a, 'input>,
    path: &str,
    root: &str,
) -> Option<Node<'a, 'input>> {
    find_all_by_path(node, path)
        .into_iter()
        .find(|n| n.attribute("root").map(str::trim) == Some(root))
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Collect the `root` attributes of an element's `templateId` children.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use qpp_converter::xml::template_roots;
///
/// let xml = r#"<section>
///     <templateId root="2.16.840.1.113883.10.20.27.2.1" extension="2017-06-01"/>
///     <templateId root="2.16.840.1.113883.10.20.27.2.5"/>
/// </section>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(
///     template_roots(doc.root_element()),
///     vec!["2.16.840.1.113883.10.20.27.2.1", "2.16.840.1.113883.10.20.27.2.5"]
/// );
/// ```
pub fn template_roots<'a>(node: Node<'a, '_>) -> Vec<&'a str> {
    node.children()
        .filter(|c| c.is_element() && get_tag_name(*c) == "templateId")
        .filter_map(|c| c.attribute("root"))
        .collect()
}

/// Build an absolute location path for an element.
///
/// Steps use local names; every step below the document root carries its
/// 1-based position among same-named siblings.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use qpp_converter::xml::absolute_path;
///
/// let xml = r#"<doc><component/><component><section/></component></doc>"#;
/// let doc = Document::parse(xml).unwrap();
/// let section = doc.descendants().find(|n| n.has_tag_name("section")).unwrap();
///
/// assert_eq!(absolute_path(section), "/doc/component[2]/section[1]");
/// ```
pub fn absolute_path(node: Node<'_, '_>) -> String {
    let mut steps: Vec<String> = node
        .ancestors()
        .filter(|n| n.is_element())
        .map(|n| {
            let name = get_tag_name(n);
            match n.parent_element() {
                Some(_) => {
                    // prev_siblings() starts at the node itself
                    let position = n
                        .prev_siblings()
                        .filter(|s| s.is_element() && get_tag_name(*s) == name)
                        .count();
                    format!("{name}[{position}]")
                }
                None => name.to_string(),
            }
        })
        .collect();
    steps.reverse();
    format!("/{}", steps.join("/"))
}
