//! Turns fetched markup into detached nodes
//!
//! The markup is run through html5ever as a document; whatever the tree builder placed in the
//! head and the body is handed back in document order. Doctypes and processing instructions are
//! dropped.

use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::BTreeMap;

/// A parsed node that is not part of any document yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedNode {
    Element {
        name: String,
        attributes: BTreeMap<String, String>,
        children: Vec<ParsedNode>,
    },
    Text(String),
    Comment(String),
}

/// Parses `markup` into its top level nodes
#[must_use]
pub fn parse_fragment(markup: &str) -> Vec<ParsedNode> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    let dom = parse_document(RcDom::default(), opts).one(markup);

    let mut nodes = Vec::new();
    for child in dom.document.children.borrow().iter() {
        let NodeData::Element { name, .. } = &child.data else {
            continue;
        };
        if &*name.local != "html" {
            continue;
        }

        // html > head, body
        for section in child.children.borrow().iter() {
            match &section.data {
                NodeData::Element { name, .. } if matches!(&*name.local, "head" | "body") => {
                    nodes.extend(section.children.borrow().iter().filter_map(convert));
                }
                _ => nodes.extend(convert(section)),
            }
        }
    }

    nodes
}

fn convert(handle: &Handle) -> Option<ParsedNode> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let attributes = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();

            let children = handle.children.borrow().iter().filter_map(convert).collect();

            Some(ParsedNode::Element {
                name: name.local.to_string(),
                attributes,
                children,
            })
        }
        NodeData::Text { contents } => Some(ParsedNode::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(ParsedNode::Comment(contents.to_string())),
        _ => None,
    }
}
