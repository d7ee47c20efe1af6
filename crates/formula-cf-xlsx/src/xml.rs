//! Minimal namespace-aware element tree.
//!
//! Parsing goes through `roxmltree` (names are resolved to namespace URIs, namespace
//! declarations are dropped). Serialization goes through `quick-xml`'s writer and
//! re-declares every namespace used in the subtree on its root element, so any element
//! can be written out standalone.

use std::collections::BTreeMap;
use std::fmt;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::{Document, Node, NodeType};

pub const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub const NS_X14: &str = "http://schemas.microsoft.com/office/spreadsheetml/2009/9/main";
pub const NS_XM: &str = "http://schemas.microsoft.com/office/excel/2006/main";
pub const NS_XML: &str = "http://www.w3.org/XML/1998/namespace";
const NS_XMLNS: &str = "http://www.w3.org/2000/xmlns/";

#[derive(Debug, thiserror::Error)]
pub enum XmlDomError {
    #[error("xml is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("xml parse error: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("xml write error: {0}")]
    Write(#[from] quick_xml::Error),
    #[error("serialized xml is not valid utf-8: {0}")]
    Output(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: QName,
    pub attrs: BTreeMap<QName, String>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct QName {
    pub ns: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(ns: Option<&str>, local: &str) -> Self {
        Self {
            ns: ns.map(str::to_string),
            local: local.to_string(),
        }
    }

    /// Unqualified name, as used by almost every SpreadsheetML attribute.
    pub fn local(local: &str) -> Self {
        Self::new(None, local)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.ns {
            write!(f, "{{{}}}{}", ns, self.local)
        } else {
            f.write_str(&self.local)
        }
    }
}

/// Element in the SpreadsheetML main namespace.
pub fn empty_element(local: &str) -> XmlElement {
    XmlElement::new(Some(NS_MAIN), local)
}

/// Element in the Excel 2010 (`x14`) namespace.
pub fn x14_element(local: &str) -> XmlElement {
    XmlElement::new(Some(NS_X14), local)
}

/// Element in the Excel `xm` namespace (`xm:f`, `xm:sqref`).
pub fn xm_element(local: &str) -> XmlElement {
    XmlElement::new(Some(NS_XM), local)
}

impl XmlElement {
    pub fn new(ns: Option<&str>, local: &str) -> Self {
        Self {
            name: QName::new(ns, local),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, XmlDomError> {
        let text = std::str::from_utf8(bytes)?;
        let doc = Document::parse(text)?;
        Ok(build_element(doc.root_element()))
    }

    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name.ns.is_none() && name.local == local)
            .map(|(_, value)| value.as_str())
    }

    pub fn attr_ns(&self, ns: &str, local: &str) -> Option<&str> {
        self.attrs
            .get(&QName::new(Some(ns), local))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, local: &str, value: impl Into<String>) {
        self.attrs.insert(QName::local(local), value.into());
    }

    pub fn set_attr_ns(&mut self, ns: &str, local: &str, value: impl Into<String>) {
        self.attrs.insert(QName::new(Some(ns), local), value.into());
    }

    pub fn with_attr(mut self, local: &str, value: impl Into<String>) -> Self {
        self.set_attr(local, value);
        self
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given local name, in any namespace.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.child_elements().find(|el| el.name.local == local)
    }

    /// Child elements with the given local name. `local` must outlive the borrow of
    /// `self`, which string literals always do.
    pub fn children_by_local<'a>(
        &'a self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.child_elements().filter(move |el| el.name.local == local)
    }

    /// Concatenated text content of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    pub fn to_xml_string(&self) -> Result<String, XmlDomError> {
        let mut namespaces = Vec::new();
        collect_namespaces(self, &mut namespaces);
        let prefixes = assign_prefixes(&namespaces);

        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self, &prefixes, true)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

fn build_element(node: Node<'_, '_>) -> XmlElement {
    let mut el = XmlElement::new(node.tag_name().namespace(), node.tag_name().name());

    for attr in node.attributes() {
        if attr.name() == "xmlns" || attr.namespace() == Some(NS_XMLNS) {
            continue;
        }
        el.attrs.insert(
            QName::new(attr.namespace(), attr.name()),
            attr.value().to_string(),
        );
    }

    for child in node.children() {
        match child.node_type() {
            NodeType::Element => el.push_child(build_element(child)),
            NodeType::Text => {
                let text = child.text().unwrap_or_default();
                if !text.is_empty() {
                    el.push_text(text);
                }
            }
            _ => {}
        }
    }
    el
}

fn collect_namespaces(el: &XmlElement, out: &mut Vec<String>) {
    let names = std::iter::once(&el.name).chain(el.attrs.keys());
    for ns in names.filter_map(|name| name.ns.as_deref()) {
        if ns != NS_XML && !out.iter().any(|seen| seen == ns) {
            out.push(ns.to_string());
        }
    }
    for child in el.child_elements() {
        collect_namespaces(child, out);
    }
}

/// `(namespace, prefix)` pairs; an empty prefix is the default namespace.
fn assign_prefixes(namespaces: &[String]) -> Vec<(String, String)> {
    let mut next = 0;
    namespaces
        .iter()
        .map(|ns| {
            let prefix = match ns.as_str() {
                NS_MAIN => String::new(),
                NS_X14 => "x14".to_string(),
                NS_XM => "xm".to_string(),
                _ => {
                    next += 1;
                    format!("ns{next}")
                }
            };
            (ns.clone(), prefix)
        })
        .collect()
}

fn qualified(name: &QName, prefixes: &[(String, String)]) -> String {
    let prefix = match name.ns.as_deref() {
        None => "",
        Some(NS_XML) => "xml",
        Some(ns) => prefixes
            .iter()
            .find(|(uri, _)| uri == ns)
            .map(|(_, prefix)| prefix.as_str())
            .unwrap_or(""),
    };
    if prefix.is_empty() {
        name.local.clone()
    } else {
        format!("{prefix}:{}", name.local)
    }
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    el: &XmlElement,
    prefixes: &[(String, String)],
    is_root: bool,
) -> Result<(), XmlDomError> {
    let name = qualified(&el.name, prefixes);
    let mut start = BytesStart::new(name.as_str());
    if is_root {
        for (ns, prefix) in prefixes {
            let decl = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{prefix}")
            };
            start.push_attribute((decl.as_str(), ns.as_str()));
        }
    }
    for (attr, value) in &el.attrs {
        let attr_name = qualified(attr, prefixes);
        start.push_attribute((attr_name.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(quick_xml::Error::from)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(quick_xml::Error::from)?;
    for child in &el.children {
        match child {
            XmlNode::Element(child) => write_element(writer, child, prefixes, false)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(quick_xml::Error::from)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(quick_xml::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_prefixes_and_declarations_on_root() {
        let mut cf = x14_element("conditionalFormatting");
        let mut rule = x14_element("cfRule");
        rule.set_attr("type", "dataBar");
        cf.push_child(rule);
        cf.push_child(xm_element("sqref").with_text("A1:A10"));

        let xml = cf.to_xml_string().unwrap();
        assert_eq!(
            xml,
            format!(
                r#"<x14:conditionalFormatting xmlns:x14="{NS_X14}" xmlns:xm="{NS_XM}"><x14:cfRule type="dataBar"/><xm:sqref>A1:A10</xm:sqref></x14:conditionalFormatting>"#
            )
        );
    }

    #[test]
    fn parse_resolves_namespaces_and_keeps_text() {
        let xml = format!(
            r#"<r xmlns="{NS_MAIN}" xmlns:x14="{NS_X14}"><x14:id>{{ABC}}</x14:id><formula xml:space="preserve"> A1 &amp; "x" </formula></r>"#
        );
        let el = XmlElement::parse(xml.as_bytes()).unwrap();
        assert_eq!(el.name, QName::new(Some(NS_MAIN), "r"));
        let id = el.child("id").unwrap();
        assert_eq!(id.name.ns.as_deref(), Some(NS_X14));
        assert_eq!(id.text(), "{ABC}");
        let formula = el.child("formula").unwrap();
        assert_eq!(formula.text(), r#" A1 & "x" "#);
        assert_eq!(formula.attr_ns(NS_XML, "space"), Some("preserve"));
        assert!(el.attrs.is_empty());
    }

    #[test]
    fn child_lookup_with_borrowed_name() {
        let el = XmlElement::parse(format!(r#"<r xmlns="{NS_MAIN}"><a/><b>x</b></r>"#).as_bytes())
            .unwrap();
        let name = String::from("b");
        let found = el.child(&name);
        drop(name);
        assert_eq!(found.map(XmlElement::text).as_deref(), Some("x"));
    }

    #[test]
    fn write_then_parse_preserves_tree() {
        let mut root = empty_element("conditionalFormatting");
        root.set_attr("sqref", "A1:B2");
        let mut formula = empty_element("formula").with_text("\"<&>\"");
        formula.set_attr_ns(NS_XML, "space", "preserve");
        root.push_child(formula);

        let xml = root.to_xml_string().unwrap();
        assert_eq!(XmlElement::parse(xml.as_bytes()).unwrap(), root);
    }
}
