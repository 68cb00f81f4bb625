use ajaxkit_shared::color::Rgb;
use ajaxkit_shared::node::NodeId;
use std::collections::BTreeMap;

/// Inline style of an element, limited to what effects touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// `None` is transparent
    pub background_color: Option<Rgb>,
    pub opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background_color: None,
            opacity: 1.0,
        }
    }
}

impl Style {
    /// The style as an inline css declaration list, `None` when nothing differs from the default
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        let mut declarations = Vec::new();

        if let Some(color) = self.background_color {
            declarations.push(format!("background-color: {color}"));
        }
        if (self.opacity - 1.0).abs() > f32::EPSILON {
            declarations.push(format!("opacity: {}", self.opacity));
        }

        if declarations.is_empty() {
            None
        } else {
            Some(declarations.join("; "))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub style: Style,
}

impl ElementData {
    /// The "style" attribute with the effect style appended
    #[must_use]
    pub fn inline_style(&self) -> Option<String> {
        let declared = self
            .attributes
            .get("style")
            .map(|css| css.trim().trim_end_matches(';').trim())
            .filter(|css| !css.is_empty());

        match (declared, self.style.to_css()) {
            (Some(declared), Some(css)) => Some(format!("{declared}; {css}")),
            (Some(declared), None) => Some(declared.to_string()),
            (None, css) => css,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(id: NodeId, data: NodeData) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    /// Only documents and elements can hold children
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element(_))
    }

    #[must_use]
    pub fn element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Value of the "id" attribute, if this is an element carrying one
    #[must_use]
    pub fn named_id(&self) -> Option<&str> {
        self.element()?.attributes.get("id").map(String::as_str)
    }
}
