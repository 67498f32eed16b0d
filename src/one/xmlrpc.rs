//! Minimal XML-RPC codec for the OpenNebula API.
//!
//! Every OpenNebula call answers with an array of
//! `[success: boolean, body: string, error_code: int, ...]`.

use crate::error::{OnegoError, Result};
use crate::xml::{Node, Path};
use quick_xml::escape::escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Str(String),
    Int(i64),
}

impl Param {
    fn encode(&self) -> String {
        match self {
            Param::Str(s) => format!("<string>{}</string>", escape(s.as_str())),
            Param::Int(i) => format!("<int>{}</int>", i),
        }
    }
}

/// Build a `methodCall` document
pub fn encode_call(method: &str, params: &[Param]) -> String {
    let mut body = String::from("<?xml version=\"1.0\"?>\n<methodCall>");
    body.push_str(&format!("<methodName>{}</methodName><params>", escape(method)));
    for param in params {
        body.push_str(&format!("<param><value>{}</value></param>", param.encode()));
    }
    body.push_str("</params></methodCall>");
    body
}

/// Decode a `methodResponse` into the OpenNebula body string.
///
/// A `false` success flag or an XML-RPC fault becomes [`OnegoError::Api`].
pub fn decode_response(input: &str) -> Result<String> {
    let doc = Node::parse(input)?;
    if doc.name != "methodResponse" {
        return Err(OnegoError::XmlParse(format!(
            "expected methodResponse, got <{}>",
            doc.name
        )));
    }

    let fault = Path::root("methodResponse").child("fault").child("value");
    if let Some(value) = doc.select_first(&fault) {
        return Err(OnegoError::Api(fault_message(value)));
    }

    let values_path = Path::root("methodResponse")
        .child("params")
        .child("param")
        .child("value")
        .child("array")
        .child("data")
        .child("value");
    let values = doc.select_all(&values_path);

    let (Some(success), Some(body)) = (values.first(), values.get(1)) else {
        return Err(OnegoError::XmlParse(
            "response array is missing success flag or body".to_string(),
        ));
    };

    let body = scalar(body);
    match scalar(success).as_str() {
        "1" | "true" => Ok(body),
        _ => Err(OnegoError::Api(body)),
    }
}

/// Text of a `<value>`, with or without a type element.
///
/// XML-RPC allows untyped values, which are strings.
fn scalar(value: &Node) -> String {
    match value.children.first() {
        Some(typed) => typed.text.clone(),
        None => value.text.clone(),
    }
}

fn fault_message(value: &Node) -> String {
    let members = value
        .child("struct")
        .map(|s| s.children.as_slice())
        .unwrap_or_default();

    members
        .iter()
        .find(|m| m.child_text("name") == Some("faultString"))
        .and_then(|m| m.child("value"))
        .map(scalar)
        .unwrap_or_else(|| "unknown XML-RPC fault".to_string())
}
