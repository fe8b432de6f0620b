//! Tree queries
//!
//! Read-only lookups over a [`Template`]. Results are in source order
//! (depth-first, pre-order), including elements nested inside blocks and
//! other elements.

use super::{Attribute, Block, Element, ElementName, Node, PlainAttribute, Template};

/// Visitor over template nodes. The default methods walk into children, so
/// implementors only override what they care about.
pub trait Visitor<'t> {
    fn visit_node(&mut self, node: &'t Node) {
        match node {
            Node::Element(element) => self.visit_element(element),
            Node::Block(block) => self.visit_block(block),
            Node::Text(_) | Node::Expression(_) => {}
        }
    }

    fn visit_element(&mut self, element: &'t Element) {
        visit_all(self, &element.children);
    }

    fn visit_block(&mut self, block: &'t Block) {
        visit_all(self, &block.children);
    }
}

pub fn visit_all<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, nodes: &'t [Node]) {
    for node in nodes {
        visitor.visit_node(node);
    }
}

struct ElementCollector<'t, F> {
    predicate: F,
    found: Vec<&'t Element>,
}

impl<'t, F: Fn(&Element) -> bool> Visitor<'t> for ElementCollector<'t, F> {
    fn visit_element(&mut self, element: &'t Element) {
        if (self.predicate)(element) {
            self.found.push(element);
        }
        visit_all(self, &element.children);
    }
}

fn collect_elements<'t>(template: &'t Template, predicate: impl Fn(&Element) -> bool) -> Vec<&'t Element> {
    let mut collector = ElementCollector {
        predicate,
        found: Vec::new(),
    };
    visit_all(&mut collector, &template.fragment);
    collector.found
}

/// Elements whose literal tag name is exactly `name`.
///
/// Dynamic elements never match, even when `name` is `svelte:element`; use
/// [`find_dynamic_elements`] for those.
pub fn find_elements<'t>(template: &'t Template, name: &str) -> Vec<&'t Element> {
    collect_elements(template, |element| {
        matches!(&element.name, ElementName::Static(tag) if tag == name)
    })
}

/// Elements whose tag is computed at runtime.
pub fn find_dynamic_elements(template: &Template) -> Vec<&Element> {
    collect_elements(template, Element::is_dynamic)
}

/// The first plain attribute called `name`.
pub fn find_attribute<'e>(element: &'e Element, name: &str) -> Option<&'e PlainAttribute> {
    element.attributes.iter().find_map(|attribute| match attribute {
        Attribute::Plain(plain) if plain.name == name => Some(plain),
        _ => None,
    })
}
