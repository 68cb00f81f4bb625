use crate::node::{ElementData, Node, NodeData, Style};
use crate::parser::{parse_fragment, ParsedNode};
use ajaxkit_shared::color::Rgb;
use ajaxkit_shared::errors::Error;
use ajaxkit_shared::node::NodeId;
use ajaxkit_shared::traits::dom::{Dom, Insertion};
use ajaxkit_shared::types::Result;
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Defines a document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Holds and owns all nodes in the document
    nodes: HashMap<NodeId, Node>,
    /// Elements with an ID (e.g., <div id="myid">)
    named_id_elements: HashMap<String, NodeId>,
    /// Id handed to the next registered node
    next_id: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document holding only the document node
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId::root();

        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(root, NodeData::Document));

        Self {
            nodes,
            named_id_elements: HashMap::new(),
            next_id: root.next(),
        }
    }

    /// Creates an element as the last child of `parent`. When another element already claims the
    /// same id, the first one keeps it.
    pub fn create_element(&mut self, parent: NodeId, name: &str, id: Option<&str>) -> Result<NodeId> {
        self.container(parent)?;

        let mut attributes = BTreeMap::new();
        if let Some(id) = id {
            attributes.insert("id".to_string(), id.to_string());
        }

        let data = NodeData::Element(ElementData {
            name: name.to_string(),
            attributes,
            style: Style::default(),
        });

        let node_id = self.register_node(data);
        self.attach_node(node_id, parent, None);

        Ok(node_id)
    }

    /// Appends a text node to `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.container(parent)?;

        let node_id = self.register_node(NodeData::Text(text.to_string()));
        self.attach_node(node_id, parent, None);

        Ok(node_id)
    }

    /// Return a node by its node ID
    #[must_use]
    pub fn node_by_id(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    #[must_use]
    pub fn get_root(&self) -> NodeId {
        NodeId::root()
    }

    /// Return number of nodes in the document, the document node included
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Serialized children of the node
    pub fn inner_html(&self, node_id: NodeId) -> Result<String> {
        let node = self.existing(node_id)?;

        let mut out = String::new();
        for child in &node.children {
            self.write_node(*child, &mut out);
        }
        Ok(out)
    }

    /// Serialized node, itself included
    pub fn outer_html(&self, node_id: NodeId) -> Result<String> {
        self.existing(node_id)?;

        let mut out = String::new();
        self.write_node(node_id, &mut out);
        Ok(out)
    }

    /// Serializes the whole document
    #[must_use]
    pub fn write(&self) -> String {
        self.inner_html(NodeId::root()).unwrap_or_default()
    }

    fn existing(&self, node_id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&node_id)
            .ok_or_else(|| Error::Dom(format!("node {node_id} does not exist")).into())
    }

    fn container(&self, node_id: NodeId) -> Result<&Node> {
        let node = self.existing(node_id)?;
        if !node.is_container() {
            return Err(Error::Dom(format!("node {node_id} cannot hold children")).into());
        }
        Ok(node)
    }

    fn style(&self, node_id: NodeId) -> Result<Style> {
        self.existing(node_id)?
            .element()
            .map(|element| element.style)
            .ok_or_else(|| Error::Dom(format!("node {node_id} is not an element")).into())
    }

    fn style_mut(&mut self, node_id: NodeId) -> Result<&mut Style> {
        self.nodes
            .get_mut(&node_id)
            .ok_or_else(|| Error::Dom(format!("node {node_id} does not exist")))?
            .element_mut()
            .map(|element| &mut element.style)
            .ok_or_else(|| Error::Dom(format!("node {node_id} is not an element")).into())
    }

    /// Parent of the node and the node's index in the parent's children
    fn position_in_parent(&self, node_id: NodeId) -> Result<(NodeId, usize)> {
        let parent_id = self
            .existing(node_id)?
            .parent
            .ok_or_else(|| Error::Dom(format!("node {node_id} has no parent")))?;

        let idx = self
            .existing(parent_id)?
            .children
            .iter()
            .position(|&child| child == node_id)
            .ok_or_else(|| Error::Dom(format!("node {node_id} is not a child of {parent_id}")))?;

        Ok((parent_id, idx))
    }

    /// Register a node. It is not connected to anything yet, but it does receive a nodeId
    fn register_node(&mut self, data: NodeData) -> NodeId {
        let node_id = self.next_id;
        self.next_id = node_id.next();

        let node = Node::new(node_id, data);
        if let Some(named_id) = node.named_id() {
            if let Entry::Vacant(entry) = self.named_id_elements.entry(named_id.to_string()) {
                entry.insert(node_id);
            }
        }

        self.nodes.insert(node_id, node);
        node_id
    }

    /// Attaches a registered node to the parent at the given position (or at the end). Positions past
    /// the end append.
    fn attach_node(&mut self, node_id: NodeId, parent_id: NodeId, position: Option<usize>) {
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            match position {
                Some(position) if position <= parent.children.len() => parent.children.insert(position, node_id),
                _ => parent.children.push(node_id),
            }
        }

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.parent = Some(parent_id);
        }
    }

    /// Detaches the node from its parent and deletes it with all its descendants
    fn remove_subtree(&mut self, node_id: NodeId) {
        let parent = self.nodes.get(&node_id).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|parent_id| self.nodes.get_mut(&parent_id)) {
            parent.children.retain(|&child| child != node_id);
        }

        let mut stack = vec![node_id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                self.named_id_elements.retain(|_, id| *id != current);
            }
        }
    }

    /// Parses `content` and attaches its top level nodes to `parent`, starting at `position` (or at
    /// the end). Returns the top level nodes in order.
    fn insert_fragment(&mut self, parent: NodeId, position: Option<usize>, content: &str) -> Vec<NodeId> {
        let mut inserted = Vec::new();
        for (offset, parsed) in parse_fragment(content).into_iter().enumerate() {
            let node_id = self.build_node(parsed);
            self.attach_node(node_id, parent, position.map(|position| position + offset));
            inserted.push(node_id);
        }
        inserted
    }

    /// Registers a parsed node and its descendants, returns the detached root
    fn build_node(&mut self, parsed: ParsedNode) -> NodeId {
        match parsed {
            ParsedNode::Text(text) => self.register_node(NodeData::Text(text)),
            ParsedNode::Comment(text) => self.register_node(NodeData::Comment(text)),
            ParsedNode::Element {
                name,
                attributes,
                children,
            } => {
                let node_id = self.register_node(NodeData::Element(ElementData {
                    name,
                    attributes,
                    style: Style::default(),
                }));
                for child in children {
                    let child_id = self.build_node(child);
                    self.attach_node(child_id, node_id, None);
                }
                node_id
            }
        }
    }

    fn write_node(&self, node_id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(&node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                for child in &node.children {
                    self.write_node(*child, out);
                }
            }
            NodeData::Text(value) => out.push_str(&escape(value, false)),
            NodeData::Comment(value) => out.push_str(&format!("<!--{value}-->")),
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (key, value) in &element.attributes {
                    if key != "style" {
                        out.push_str(&format!(r#" {key}="{}""#, escape(value, true)));
                    }
                }
                if let Some(css) = element.inline_style() {
                    out.push_str(&format!(r#" style="{}""#, escape(&css, true)));
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&element.name.as_str()) {
                    return;
                }

                for child in &node.children {
                    self.write_node(*child, out);
                }

                out.push_str(&format!("</{}>", element.name));
            }
        }
    }

    /// Print a node and all its children in a tree-like structure
    fn print_tree(&self, node_id: NodeId, prefix: String, last: bool, f: &mut Formatter) -> fmt::Result {
        let Some(node) = self.nodes.get(&node_id) else {
            return Ok(());
        };

        let mut buffer = prefix.clone();
        buffer.push_str(if last { "└─ " } else { "├─ " });

        match &node.data {
            NodeData::Document => writeln!(f, "{buffer}Document")?,
            NodeData::Text(value) => writeln!(f, r#"{buffer}"{value}""#)?,
            NodeData::Comment(value) => writeln!(f, "{buffer}<!-- {value} -->")?,
            NodeData::Element(element) => {
                write!(f, "{}<{}", buffer, element.name)?;
                for (key, value) in &element.attributes {
                    write!(f, " {key}={value}")?;
                }
                writeln!(f, ">")?;
            }
        }

        let mut buffer = prefix;
        buffer.push_str(if last { "   " } else { "│  " });

        let len = node.children.len();
        for (i, child_id) in node.children.iter().enumerate() {
            self.print_tree(*child_id, buffer.clone(), i == len - 1, f)?;
        }

        Ok(())
    }
}

/// Elements written without a closing tag
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

fn escape(value: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.print_tree(NodeId::root(), String::new(), true, f)
    }
}

impl Dom for Document {
    fn node_by_named_id(&self, id: &str) -> Option<NodeId> {
        self.named_id_elements.get(id).copied()
    }

    fn insert(&mut self, node: NodeId, insertion: Insertion, content: &str) -> Result<Vec<NodeId>> {
        debug!("dom: {insertion} into node {node} ({} bytes)", content.len());

        let inserted = match insertion {
            Insertion::Inside => {
                let children = self.container(node)?.children.clone();
                for child in children {
                    self.remove_subtree(child);
                }
                self.insert_fragment(node, None, content)
            }
            Insertion::Replace => {
                let (parent, idx) = self.position_in_parent(node)?;
                self.remove_subtree(node);
                self.insert_fragment(parent, Some(idx), content)
            }
            Insertion::Before => {
                let (parent, idx) = self.position_in_parent(node)?;
                self.insert_fragment(parent, Some(idx), content)
            }
            Insertion::After => {
                let (parent, idx) = self.position_in_parent(node)?;
                self.insert_fragment(parent, Some(idx + 1), content)
            }
            Insertion::Top => {
                self.container(node)?;
                self.insert_fragment(node, Some(0), content)
            }
            Insertion::Bottom => {
                self.container(node)?;
                self.insert_fragment(node, None, content)
            }
        };

        Ok(inserted
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(|node| node.element().is_some()))
            .collect())
    }

    fn background_color(&self, node: NodeId) -> Result<Option<Rgb>> {
        Ok(self.style(node)?.background_color)
    }

    fn set_background_color(&mut self, node: NodeId, color: Option<Rgb>) -> Result<()> {
        self.style_mut(node)?.background_color = color;
        Ok(())
    }

    fn opacity(&self, node: NodeId) -> Result<f32> {
        Ok(self.style(node)?.opacity)
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f32) -> Result<()> {
        self.style_mut(node)?.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    /// <ul id="list"><li>one</li></ul><p id="note"></p>
    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let list = doc.create_element(doc.get_root(), "ul", Some("list")).unwrap();
        let li = doc.create_element(list, "li", None).unwrap();
        doc.append_text(li, "one").unwrap();
        doc.create_element(doc.get_root(), "p", Some("note")).unwrap();

        (doc, list)
    }

    #[test]
    fn write_serializes_tree() {
        let (doc, list) = sample();

        assert_eq!(doc.write(), r#"<ul id="list"><li>one</li></ul><p id="note"></p>"#);
        assert_eq!(doc.inner_html(list).unwrap(), "<li>one</li>");
        assert_eq!(doc.node_by_named_id("list"), Some(list));
        assert_eq!(doc.node_by_named_id("nope"), None);
    }

    #[test_case(Insertion::Inside, r#"<ul id="list"><li>new</li></ul><p id="note"></p>"#)]
    #[test_case(Insertion::Replace, r#"<li>new</li><p id="note"></p>"#)]
    #[test_case(Insertion::Before, r#"<li>new</li><ul id="list"><li>one</li></ul><p id="note"></p>"#)]
    #[test_case(Insertion::After, r#"<ul id="list"><li>one</li></ul><li>new</li><p id="note"></p>"#)]
    #[test_case(Insertion::Top, r#"<ul id="list"><li>new</li><li>one</li></ul><p id="note"></p>"#)]
    #[test_case(Insertion::Bottom, r#"<ul id="list"><li>one</li><li>new</li></ul><p id="note"></p>"#)]
    fn insertion_primitives(insertion: Insertion, expected: &str) {
        let (mut doc, list) = sample();

        doc.insert(list, insertion, "<li>new</li>").unwrap();
        assert_eq!(doc.write(), expected);
    }

    #[test]
    fn replace_forgets_named_ids_of_removed_nodes() {
        let (mut doc, list) = sample();
        let before = doc.node_count();

        doc.insert(list, Insertion::Replace, "<ol></ol>").unwrap();
        assert_eq!(doc.node_by_named_id("list"), None);
        assert!(doc.node_by_id(list).is_none());
        // ul, li and text are gone, the ol came in
        assert_eq!(doc.node_count(), before - 3 + 1);

        assert!(doc.insert(list, Insertion::Inside, "x").is_err());
    }

    #[test]
    fn inside_replaces_previous_update() {
        let (mut doc, list) = sample();

        doc.insert(list, Insertion::Inside, "<li>a</li>").unwrap();
        doc.insert(list, Insertion::Inside, "<li>b</li>").unwrap();
        assert_eq!(doc.inner_html(list).unwrap(), "<li>b</li>");
    }

    #[test]
    fn sibling_insertions_need_a_parent() {
        let (mut doc, _) = sample();
        let root = doc.get_root();

        assert!(doc.insert(root, Insertion::Before, "x").is_err());
        assert!(doc.insert(root, Insertion::Replace, "x").is_err());
        assert!(doc.insert(root, Insertion::Bottom, "<p>x</p>").is_ok());
    }

    #[test]
    fn text_cannot_hold_children() {
        let (mut doc, list) = sample();
        let li = doc.node_by_id(list).unwrap().children[0];
        let text = doc.node_by_id(li).unwrap().children[0];

        assert!(doc.insert(text, Insertion::Inside, "x").is_err());
        assert!(doc.create_element(text, "b", None).is_err());
        assert!(doc.insert(text, Insertion::After, "!").is_ok());
        assert_eq!(doc.inner_html(li).unwrap(), "one!");
    }

    #[test]
    fn first_element_keeps_duplicate_id() {
        let (mut doc, list) = sample();
        doc.create_element(doc.get_root(), "div", Some("list")).unwrap();

        assert_eq!(doc.node_by_named_id("list"), Some(list));
    }

    #[test]
    fn style_accessors() {
        let (mut doc, list) = sample();

        assert_eq!(doc.background_color(list).unwrap(), None);
        assert_eq!(doc.opacity(list).unwrap(), 1.0);

        doc.set_background_color(list, Some(Rgb::new(0xDC, 0x85, 0x85))).unwrap();
        doc.set_opacity(list, 0.2).unwrap();
        assert_eq!(
            doc.outer_html(list).unwrap(),
            r#"<ul id="list" style="background-color: #DC8585; opacity: 0.2"><li>one</li></ul>"#
        );

        doc.set_opacity(list, 7.0).unwrap();
        assert_eq!(doc.opacity(list).unwrap(), 1.0);

        assert!(doc.opacity(doc.get_root()).is_err());
        assert!(doc.set_background_color(NodeId::from(999usize), None).is_err());
    }

    #[test]
    fn text_is_escaped_markup_is_parsed() {
        let mut doc = Document::new();
        let p = doc.create_element(doc.get_root(), "p", Some("a\"b")).unwrap();
        doc.append_text(p, "1 < 2 & 3").unwrap();
        doc.insert(p, Insertion::Bottom, "<b>raw</b> &amp; <br>").unwrap();

        assert_eq!(doc.write(), r#"<p id="a&quot;b">1 &lt; 2 &amp; 3<b>raw</b> &amp; <br></p>"#);
    }

    #[test]
    fn replace_registers_ids_of_new_content() {
        let (mut doc, list) = sample();

        let inserted = doc
            .insert(list, Insertion::Replace, r#"<ul id="list"><li id="first">x</li></ul>"#)
            .unwrap();
        assert_eq!(inserted.len(), 1);

        let new_list = doc.node_by_named_id("list").unwrap();
        assert_eq!(inserted[0], new_list);
        assert_ne!(new_list, list);
        assert!(doc.node_by_named_id("first").is_some());

        doc.insert(new_list, Insertion::Replace, r#"<ul id="list"><li>y</li></ul>"#)
            .unwrap();
        assert_eq!(doc.write(), r#"<ul id="list"><li>y</li></ul><p id="note"></p>"#);
        assert_eq!(doc.node_by_named_id("first"), None);
    }

    #[test]
    fn insert_returns_top_level_elements_in_order() {
        let (mut doc, list) = sample();

        let inserted = doc
            .insert(list, Insertion::Top, "<li>a</li> text <li>b</li><!-- c -->")
            .unwrap();
        assert_eq!(inserted.len(), 2);
        assert_eq!(doc.outer_html(inserted[0]).unwrap(), "<li>a</li>");
        assert_eq!(doc.outer_html(inserted[1]).unwrap(), "<li>b</li>");
        assert_eq!(
            doc.inner_html(list).unwrap(),
            "<li>a</li> text <li>b</li><!-- c --><li>one</li>"
        );

        assert!(doc.insert(list, Insertion::Inside, "just text").unwrap().is_empty());
    }

    #[test]
    fn effect_style_merges_with_declared_style() {
        let (mut doc, list) = sample();

        let p = doc.insert(list, Insertion::After, r#"<p style="color: red">x</p>"#).unwrap()[0];
        doc.set_opacity(p, 0.2).unwrap();

        assert_eq!(
            doc.outer_html(p).unwrap(),
            r#"<p style="color: red; opacity: 0.2">x</p>"#
        );
    }

    #[test]
    fn display_prints_tree() {
        let (doc, _) = sample();

        let s = format!("{doc}");
        assert!(s.starts_with("└─ Document\n"));
        assert!(s.contains("<ul id=list>"));
        assert!(s.contains(r#""one""#));
    }
}
