//! Generic labeled tree for the XML documents returned by OpenNebula.
//!
//! Only element names and text are kept. OpenNebula puts every piece of data
//! in child elements, so attributes are dropped while parsing.

use crate::error::{OnegoError, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

pub mod path;

pub use path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    pub name: String,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a document and return its root element
    pub fn parse(input: &str) -> Result<Node> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Node> = Vec::new();
        let mut root: Option<Node> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| OnegoError::XmlParse(e.to_string()))?;

            match event {
                Event::Start(e) => {
                    stack.push(Node::new(String::from_utf8_lossy(e.name().as_ref())));
                }
                Event::Empty(e) => {
                    let node = Node::new(String::from_utf8_lossy(e.name().as_ref()));
                    attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| OnegoError::XmlParse("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| OnegoError::XmlParse(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(OnegoError::XmlParse(format!(
                "element <{}> is never closed",
                open.name
            )));
        }

        root.ok_or_else(|| OnegoError::XmlParse("document has no root element".to_string()))
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first direct child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// All nodes matching `path`, in document order.
    ///
    /// The first step of the path is matched against `self`, so paths are
    /// written from the document root (`/VM/TEMPLATE/NIC`).
    pub fn select_all<'a>(&'a self, path: &Path) -> Vec<&'a Node> {
        let mut steps = path.steps().iter();
        let Some(first) = steps.next() else {
            return Vec::new();
        };
        if !first.matches(self) {
            return Vec::new();
        }

        let mut current = vec![self];
        for step in steps {
            current = current
                .into_iter()
                .flat_map(|node| node.children.iter().filter(move |c| step.matches(c)))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    pub fn select_first<'a>(&'a self, path: &Path) -> Option<&'a Node> {
        self.select_all(path).into_iter().next()
    }

    /// Text of the first node matching `path`
    pub fn value(&self, path: &Path) -> Option<&str> {
        self.select_first(path).map(|n| n.text.as_str())
    }
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(OnegoError::XmlParse(
                "document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}
