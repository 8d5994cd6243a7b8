use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::{FormError, FormResult};
use crate::translate::Translator;

/// A lightweight HTML element prototype: tag name, classes, attributes and
/// child content. Templates read it; this crate only decorates it.
///
/// An element without a name is a bare attribute carrier (its attributes are
/// merged onto whatever tag the template chooses).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Markup>,
}

/// Either plain text (translated and escaped by the consumer) or a pre-built
/// fragment that must be passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Markup {
    Text(String),
    Html(Element),
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// An element with no tag name.
    pub fn bare() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Add a class once; repeated calls leave a single entry.
    pub fn add_class(&mut self, class: &str) {
        for part in class.split_whitespace() {
            if !self.has_class(part) {
                self.classes.push(part.to_string());
            }
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Space separated class list, `None` when there are no classes.
    pub fn class_string(&self) -> Option<String> {
        if self.classes.is_empty() {
            None
        } else {
            Some(self.classes.join(" "))
        }
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        if name == "class" {
            self.classes.clear();
            self.add_class(&value.into());
        } else {
            self.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Replace the content with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![Markup::Text(text.to_string())];
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Append a child node.
    pub fn add(&mut self, child: Markup) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: Markup) -> Self {
        self.add(child);
        self
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Markup::Text(t) => out.push_str(t),
                Markup::Html(el) => out.push_str(&el.text_content()),
            }
        }
        out
    }

    /// Drop the tag name, keeping attributes and content.
    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    /// Merge attributes into this element. Classes accumulate, any other
    /// attribute is overwritten.
    pub fn merge_attrs(&mut self, attrs: &BTreeMap<String, String>) {
        for (name, value) in attrs {
            if name == "class" {
                self.add_class(value);
            } else {
                self.attrs.insert(name.clone(), value.clone());
            }
        }
    }

    /// Add attributes that are not already present. Existing values win.
    pub fn add_missing_attrs(&mut self, attrs: &BTreeMap<String, String>) {
        for (name, value) in attrs {
            if name == "class" {
                if self.classes.is_empty() {
                    self.add_class(value);
                }
            } else if !self.attrs.contains_key(name) {
                self.attrs.insert(name.clone(), value.clone());
            }
        }
    }
}

impl Markup {
    pub fn text(text: &str) -> Self {
        Markup::Text(text.to_string())
    }

    pub fn is_html(&self) -> bool {
        matches!(self, Markup::Html(_))
    }

    /// Translate plain text; fragments pass through untouched.
    pub fn translated(&self, translator: Option<&dyn Translator>) -> Markup {
        match (self, translator) {
            (Markup::Text(text), Some(t)) => Markup::Text(t.translate(text)),
            _ => self.clone(),
        }
    }

    /// Plain text view, used where only a string fits (e.g. attribute values).
    pub fn as_plain_text(&self) -> String {
        match self {
            Markup::Text(text) => text.clone(),
            Markup::Html(el) => el.text_content(),
        }
    }

    /// Wrap into `el`: text becomes its text content, a fragment becomes its
    /// child.
    pub fn wrap_in(&self, mut el: Element) -> Element {
        match self {
            Markup::Text(text) => el.set_text(text),
            Markup::Html(inner) => el.add(Markup::Html(inner.clone())),
        }
        el
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup::text(text)
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Markup::Text(text)
    }
}

impl From<Element> for Markup {
    fn from(el: Element) -> Self {
        Markup::Html(el)
    }
}

/// Check that `name` is usable as an HTML attribute name.
pub fn validate_attribute_name(name: &str) -> FormResult<()> {
    static ATTR_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ATTR_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z_:][-a-zA-Z0-9_:.]*$").unwrap());

    if !re.is_match(name) {
        return Err(FormError::InvalidAttribute {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_class_deduplicates() {
        let mut el = Element::new("div");
        el.add_class("control-group");
        el.add_class("control-group required");
        assert_eq!(el.class_string(), Some("control-group required".to_string()));
    }

    #[test]
    fn test_set_class_attr_replaces_classes() {
        let mut el = Element::new("div").with_class("a");
        el.set_attr("class", "b c");
        assert_eq!(el.classes, vec!["b".to_string(), "c".to_string()]);
        assert!(el.attrs.is_empty());
    }

    #[test]
    fn test_add_missing_attrs_keeps_existing() {
        let mut el = Element::bare().with_attr("id", "box");
        let mut extra = BTreeMap::new();
        extra.insert("id".to_string(), "other".to_string());
        extra.insert("data-role".to_string(), "group".to_string());
        el.add_missing_attrs(&extra);
        assert_eq!(el.id(), Some("box"));
        assert_eq!(el.attr("data-role"), Some("group"));
    }

    #[test]
    fn test_merge_attrs_accumulates_classes() {
        let mut el = Element::new("input").with_class("span3");
        let mut extra = BTreeMap::new();
        extra.insert("class".to_string(), "input-xl".to_string());
        extra.insert("size".to_string(), "20".to_string());
        el.merge_attrs(&extra);
        assert_eq!(el.class_string(), Some("span3 input-xl".to_string()));
        assert_eq!(el.attr("size"), Some("20"));
    }

    #[test]
    fn test_markup_wrap_in() {
        let span = Element::new("span").with_class("add-on");
        let wrapped = Markup::text("@").wrap_in(span.clone());
        assert_eq!(wrapped.text_content(), "@");

        let icon = Element::new("i").with_class("icon-user");
        let wrapped = Markup::Html(icon.clone()).wrap_in(span);
        assert_eq!(wrapped.children, vec![Markup::Html(icon)]);
    }

    #[test]
    fn test_translated_skips_fragments() {
        let upper = |s: &str| s.to_uppercase();
        let fragment = Markup::Html(Element::new("b").with_text("keep"));
        assert_eq!(fragment.translated(Some(&upper)), fragment);
        assert_eq!(Markup::text("name").translated(Some(&upper)), Markup::text("NAME"));
        assert_eq!(Markup::text("name").translated(None), Markup::text("name"));
    }

    #[test]
    fn test_validate_attribute_name() {
        assert!(validate_attribute_name("data-toggle").is_ok());
        assert!(validate_attribute_name("aria-label").is_ok());
        assert!(matches!(
            validate_attribute_name("bad name"),
            Err(FormError::InvalidAttribute { .. })
        ));
        assert!(validate_attribute_name("").is_err());
    }
}
