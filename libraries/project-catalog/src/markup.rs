//! A small typed markup tree.
//!
//! Card markup is built as a tree of [`Node`]s and serialized in one pass;
//! text and attribute values are escaped centrally at write time, so no
//! call site can forget to.

use std::fmt;

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "source"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Escaped on serialization.
    Text(String),
}

impl Node {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => element.fmt(formatter),
            Self::Text(text) => escape_text(formatter, text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    /// A value-less attribute like `hidden`.
    #[must_use]
    pub fn flag(mut self, name: &'static str) -> Self {
        self.attributes.push((name, String::new()));
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Node::Text(content.into()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            if value.is_empty() {
                write!(formatter, " {name}")?;
            } else {
                write!(formatter, " {name}=\"")?;
                escape_attribute(formatter, value)?;
                write!(formatter, "\"")?;
            }
        }
        write!(formatter, ">")?;

        if VOID_TAGS.contains(&self.tag) {
            return Ok(());
        }

        for child in &self.children {
            child.fmt(formatter)?;
        }
        write!(formatter, "</{}>", self.tag)
    }
}

fn escape_text(formatter: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for character in text.chars() {
        match character {
            '&' => formatter.write_str("&amp;")?,
            '<' => formatter.write_str("&lt;")?,
            '>' => formatter.write_str("&gt;")?,
            other => fmt::Write::write_char(formatter, other)?,
        }
    }
    Ok(())
}

fn escape_attribute(formatter: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    for character in value.chars() {
        match character {
            '&' => formatter.write_str("&amp;")?,
            '"' => formatter.write_str("&quot;")?,
            '\'' => formatter.write_str("&#39;")?,
            '<' => formatter.write_str("&lt;")?,
            '>' => formatter.write_str("&gt;")?,
            other => fmt::Write::write_char(formatter, other)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_elements_serialize_in_order() {
        let node: Node = Element::new("article")
            .attr("class", "project-card")
            .child(Element::new("h3").text("Rover"))
            .child(Element::new("p").text("A mars rover"))
            .into();
        assert_eq!(
            node.to_html(),
            "<article class=\"project-card\"><h3>Rover</h3><p>A mars rover</p></article>"
        );
    }

    #[test]
    fn text_content_is_escaped() {
        let node = Node::text("<script>alert('x')</script> & more");
        assert_eq!(
            node.to_html(),
            "&lt;script&gt;alert('x')&lt;/script&gt; &amp; more"
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let node: Node = Element::new("img")
            .attr("alt", "a \"quoted\" <name> & co")
            .into();
        assert_eq!(
            node.to_html(),
            "<img alt=\"a &quot;quoted&quot; &lt;name&gt; &amp; co\">"
        );
    }

    #[test]
    fn void_tags_have_no_closing_tag() {
        let node: Node = Element::new("img").attr("src", "/i.png").into();
        assert_eq!(node.to_html(), "<img src=\"/i.png\">");
    }

    #[test]
    fn flags_serialize_without_a_value() {
        let node: Node = Element::new("div").flag("hidden").into();
        assert_eq!(node.to_html(), "<div hidden></div>");
    }
}
