use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::control::{Control, ControlKind, ControlOptions};
use crate::element::{validate_attribute_name, Element, Markup};
use crate::error::{FormError, FormResult};
use crate::form::{Container, ContainerId, Form, Group, GroupOptions};

/// A form described in YAML.
///
/// ```yaml
/// name: signup
/// children:
///   - control: { name: email, kind: email, required: true }
///   - container:
///       name: address
///       label: Address
///       children:
///         - control: { name: street }
/// groups:
///   - name: contact
///     label: Contact
///     controls: [email, address-street]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub name: String,
    /// Classes of the `<form>` element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub children: Vec<NodeDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeDefinition {
    Control(ControlDefinition),
    Container(ContainerDefinition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDefinition {
    pub name: String,
    #[serde(default)]
    pub kind: ControlKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<Markup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(flatten)]
    pub options: ControlOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Markup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Markup>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<NodeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,
    /// Control paths (`container-control`).
    #[serde(default)]
    pub controls: Vec<String>,
    #[serde(default = "default_visual")]
    pub visual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Markup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Markup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Element>,
    /// Any other key is a caller-defined entry.
    #[serde(flatten)]
    pub attrs: BTreeMap<String, String>,
}

fn default_visual() -> bool {
    true
}

/// Parse and build a form from YAML.
pub fn parse_form(yaml: &str) -> FormResult<Form> {
    let definition: FormDefinition = serde_yaml::from_str(yaml)?;
    definition.build()
}

impl FormDefinition {
    pub fn build(&self) -> FormResult<Form> {
        validate_name(&self.name)?;

        let mut form = Form::new(&self.name);
        if let Some(class) = &self.class {
            form.element.add_class(class);
        }
        form.errors = self.errors.clone();

        let root = form.root();
        for node in &self.children {
            add_node(&mut form, root, node)?;
        }

        for def in &self.groups {
            let mut group = Group::new(&def.name);
            for path in &def.controls {
                let id = form
                    .control_by_path(path)
                    .ok_or_else(|| FormError::UnknownControl {
                        group: def.name.clone(),
                        path: path.clone(),
                    })?;
                group.controls.push(id);
            }
            group.options = GroupOptions {
                visual: def.visual,
                label: def.label.clone(),
                description: def.description.clone(),
                container: def.container.clone(),
                attrs: BTreeMap::new(),
            };
            for (name, value) in &def.attrs {
                group.set_attr(name, value)?;
            }
            form.add_group(group)?;
        }

        Ok(form)
    }
}

fn add_node(form: &mut Form, parent: ContainerId, node: &NodeDefinition) -> FormResult<()> {
    match node {
        NodeDefinition::Control(def) => {
            validate_name(&def.name)?;
            for name in def.options.attrs.keys() {
                validate_attribute_name(name)?;
            }

            let mut control = Control::new(&def.name, def.kind);
            control.required = def.required;
            control.caption = def.caption.clone();
            control.errors = def.errors.clone();
            control.options = def.options.clone();
            control.prototype.merge_attrs(&def.options.attrs);
            form.add_control_to(parent, control)?;
        }
        NodeDefinition::Container(def) => {
            validate_name(&def.name)?;

            let mut container = Container::new(&def.name);
            container.options.label = def.label.clone();
            container.options.description = def.description.clone();
            for (name, value) in &def.attrs {
                container.set_attr(name, value)?;
            }
            let id = form.add_container_to(parent, container)?;
            for child in &def.children {
                add_node(form, id, child)?;
            }
        }
    }
    Ok(())
}

/// Component names are identifiers: they end up in paths and html ids.
fn validate_name(name: &str) -> FormResult<()> {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

    if !re.is_match(name) {
        return Err(FormError::InvalidName {
            name: name.to_string(),
            reason: "must start with a letter or underscore and contain only letters, digits and underscores"
                .to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Child;
    use pretty_assertions::assert_eq;

    const SIGNUP: &str = r#"
name: signup
class: well
errors: ["Please try again"]
children:
  - control: { name: name, required: true, placeholder: "Your name" }
  - control: { name: email, kind: email, input-append: ".com" }
  - container:
      name: address
      label: Address
      attrs: { class: nested }
      children:
        - control: { name: street }
  - control: { name: token, kind: hidden }
  - control: { name: send, kind: submit, caption: Sign up }
groups:
  - name: personal
    label: Personal data
    controls: [name, address-street]
    data-step: "1"
  - name: hidden_stuff
    visual: false
    controls: [token]
"#;

    #[test]
    fn test_parse_signup() {
        let form = parse_form(SIGNUP).unwrap();
        assert_eq!(form.name, "signup");
        assert!(form.element.has_class("well"));
        assert_eq!(form.errors, vec!["Please try again".to_string()]);

        let root = form.container(form.root());
        assert_eq!(root.children.len(), 5);
        assert!(matches!(root.children[2], Child::Container(_)));

        let name = form.control(form.control_by_path("name").unwrap());
        assert!(name.required);
        assert_eq!(name.options.placeholder, Some(Markup::text("Your name")));

        let email = form.control(form.control_by_path("email").unwrap());
        assert_eq!(email.kind, ControlKind::Email);
        assert_eq!(email.options.input_append, Some(Markup::text(".com")));

        let send = form.control(form.control_by_path("send").unwrap());
        assert!(send.kind.is_submitter());
        assert_eq!(send.caption, Some(Markup::text("Sign up")));
    }

    #[test]
    fn test_parse_groups() {
        let form = parse_form(SIGNUP).unwrap();
        let personal = form.group(form.group_by_name("personal").unwrap()).unwrap();
        assert_eq!(personal.options.label, Some(Markup::text("Personal data")));
        assert!(personal.options.visual);
        assert_eq!(personal.options.attrs.get("data-step"), Some(&"1".to_string()));
        assert_eq!(
            personal.controls,
            vec![
                form.control_by_path("name").unwrap(),
                form.control_by_path("address-street").unwrap()
            ]
        );

        let hidden = form.group(form.group_by_name("hidden_stuff").unwrap()).unwrap();
        assert!(!hidden.options.visual);
    }

    #[test]
    fn test_unknown_group_control() {
        let yaml = "name: f\ngroups:\n  - name: g\n    controls: [missing]\n";
        assert_eq!(
            parse_form(yaml).unwrap_err(),
            FormError::UnknownControl {
                group: "g".to_string(),
                path: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_names() {
        let yaml = "name: f\nchildren:\n  - control: { name: \"first name\" }\n";
        assert!(matches!(parse_form(yaml), Err(FormError::InvalidName { .. })));
    }

    #[test]
    fn test_invalid_container_attr() {
        let yaml = "name: f\nchildren:\n  - container: { name: c, attrs: { \"bad attr\": x } }\n";
        assert!(matches!(parse_form(yaml), Err(FormError::InvalidAttribute { .. })));
    }

    #[test]
    fn test_duplicate_names() {
        let yaml = "name: f\nchildren:\n  - control: { name: a }\n  - control: { name: a }\n";
        assert!(matches!(parse_form(yaml), Err(FormError::DuplicateComponent { .. })));
    }

    #[test]
    fn test_nested_container_children() {
        let yaml = r#"
name: f
children:
  - container:
      name: outer
      children:
        - container:
            name: inner
            children:
              - control: { name: deep, kind: number }
"#;
        let form = parse_form(yaml).unwrap();
        let deep = form.control(form.control_by_path("outer-inner-deep").unwrap());
        assert_eq!(deep.kind, ControlKind::Number);
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(parse_form("name: [oops"), Err(FormError::YamlError(_))));
    }
}
