use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::control::{Control, ControlId};
use crate::element::{validate_attribute_name, Element, Markup};
use crate::error::{FormError, FormResult};

/// Option names that are typed fields of groups and containers and therefore
/// never valid as free-form attributes.
pub const RESERVED_OPTIONS: &[&str] = &["container", "label", "description", "visual"];

/// Index of a container inside its form. The root container is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub(crate) usize);

impl ContainerId {
    pub const ROOT: ContainerId = ContainerId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a named group inside its form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub(crate) usize);

/// A direct child of a container, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Control(ControlId),
    Container(ContainerId),
}

/// Options of a container used as an implicit group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Markup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Markup>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Container {
    pub name: String,
    pub path: String,
    pub options: ContainerOptions,
    pub children: Vec<Child>,
}

impl Container {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            options: ContainerOptions::default(),
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<Markup>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<Markup>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    pub fn set_attr(&mut self, name: &str, value: &str) -> FormResult<()> {
        check_attr_name(name)?;
        self.options.attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

fn default_visual() -> bool {
    true
}

/// Options of a named group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupOptions {
    /// Non-visual groups only collect controls and never render chrome.
    #[serde(default = "default_visual")]
    pub visual: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Markup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Markup>,
    /// Prototype of the wrapping element; its tag name is ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<Element>,
    /// Free-form entries, passed to templates verbatim and used as attributes.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            visual: true,
            label: None,
            description: None,
            container: None,
            attrs: BTreeMap::new(),
        }
    }
}

/// A flat, named selection of controls, orthogonal to container nesting.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub controls: Vec<ControlId>,
    pub options: GroupOptions,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            controls: Vec::new(),
            options: GroupOptions::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<Markup>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<Markup>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    pub fn with_controls(mut self, controls: impl IntoIterator<Item = ControlId>) -> Self {
        self.controls.extend(controls);
        self
    }

    pub fn with_container(mut self, container: Element) -> Self {
        self.options.container = Some(container);
        self
    }

    pub fn non_visual(mut self) -> Self {
        self.options.visual = false;
        self
    }

    pub fn set_attr(&mut self, name: &str, value: &str) -> FormResult<()> {
        check_attr_name(name)?;
        self.options.attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> FormResult<Self> {
        self.set_attr(name, value)?;
        Ok(self)
    }
}

fn check_attr_name(name: &str) -> FormResult<()> {
    if RESERVED_OPTIONS.contains(&name) {
        return Err(FormError::ReservedOption {
            key: name.to_string(),
        });
    }
    validate_attribute_name(name)
}

/// Reference to a group, either by name or by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Name(String),
    Id(GroupId),
}

impl From<&str> for GroupRef {
    fn from(name: &str) -> Self {
        GroupRef::Name(name.to_string())
    }
}

impl From<String> for GroupRef {
    fn from(name: String) -> Self {
        GroupRef::Name(name)
    }
}

impl From<GroupId> for GroupRef {
    fn from(id: GroupId) -> Self {
        GroupRef::Id(id)
    }
}

/// Root aggregate: control and container arenas plus the named groups.
///
/// Ids handed out by a form are only meaningful for that form; passing an id
/// from another form to the accessors panics like an out-of-range index.
#[derive(Debug, Clone)]
pub struct Form {
    pub name: String,
    /// `<form>` element prototype.
    pub element: Element,
    /// Errors not tied to a particular control.
    pub errors: Vec<String>,
    controls: Vec<Control>,
    containers: Vec<Container>,
    groups: Vec<Group>,
    paths: HashSet<String>,
    /// Id of the renderer that last annotated the form.
    prepared_by: Option<u64>,
}

impl Form {
    pub fn new(name: &str) -> Self {
        let mut root = Container::new(name);
        root.path = String::new();

        Self {
            name: name.to_string(),
            element: Element::new("form"),
            errors: Vec::new(),
            controls: Vec::new(),
            containers: vec![root],
            groups: Vec::new(),
            paths: HashSet::new(),
            prepared_by: None,
        }
    }

    pub fn root(&self) -> ContainerId {
        ContainerId::ROOT
    }

    /// Add a control directly to the form.
    pub fn add_control(&mut self, control: Control) -> FormResult<ControlId> {
        self.add_control_to(ContainerId::ROOT, control)
    }

    pub fn add_control_to(&mut self, parent: ContainerId, mut control: Control) -> FormResult<ControlId> {
        let parent_path = self.container_checked(parent)?.path.clone();
        control.attach(&parent_path);
        self.claim_path(&control.path)?;

        let id = ControlId(self.controls.len());
        self.controls.push(control);
        self.containers[parent.0].children.push(Child::Control(id));
        Ok(id)
    }

    pub fn add_container(&mut self, container: Container) -> FormResult<ContainerId> {
        self.add_container_to(ContainerId::ROOT, container)
    }

    pub fn add_container_to(&mut self, parent: ContainerId, mut container: Container) -> FormResult<ContainerId> {
        let parent_path = self.container_checked(parent)?.path.clone();
        container.path = if parent_path.is_empty() {
            container.name.clone()
        } else {
            format!("{}-{}", parent_path, container.name)
        };
        self.claim_path(&container.path)?;
        container.children.clear();

        let id = ContainerId(self.containers.len());
        self.containers.push(container);
        self.containers[parent.0].children.push(Child::Container(id));
        Ok(id)
    }

    /// Declare a named group. Group names are unique and every member must
    /// belong to this form.
    pub fn add_group(&mut self, group: Group) -> FormResult<GroupId> {
        if self.group_by_name(&group.name).is_some() {
            return Err(FormError::DuplicateComponent { path: group.name });
        }
        if let Some(bad) = group.controls.iter().find(|id| id.0 >= self.controls.len()) {
            return Err(FormError::UnknownControl {
                group: group.name.clone(),
                path: format!("#{}", bad.0),
            });
        }

        let id = GroupId(self.groups.len());
        self.groups.push(group);
        Ok(id)
    }

    fn claim_path(&mut self, path: &str) -> FormResult<()> {
        if !self.paths.insert(path.to_string()) {
            return Err(FormError::DuplicateComponent {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    fn container_checked(&self, id: ContainerId) -> FormResult<&Container> {
        self.containers
            .get(id.0)
            .ok_or(FormError::UnknownContainer { index: id.0 })
    }

    pub fn control(&self, id: ControlId) -> &Control {
        &self.controls[id.0]
    }

    pub fn control_mut(&mut self, id: ControlId) -> &mut Control {
        &mut self.controls[id.0]
    }

    pub fn control_by_path(&self, path: &str) -> Option<ControlId> {
        self.controls
            .iter()
            .position(|c| c.path == path)
            .map(ControlId)
    }

    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.0]
    }

    pub fn container_mut(&mut self, id: ContainerId) -> &mut Container {
        &mut self.containers[id.0]
    }

    /// All controls, depth first in declaration order.
    pub fn control_ids(&self) -> Vec<ControlId> {
        let mut out = Vec::with_capacity(self.controls.len());
        self.collect_controls(ContainerId::ROOT, &mut out);
        out
    }

    fn collect_controls(&self, container: ContainerId, out: &mut Vec<ControlId>) {
        for child in &self.containers[container.0].children {
            match *child {
                Child::Control(id) => out.push(id),
                Child::Container(nested) => self.collect_controls(nested, out),
            }
        }
    }

    pub fn controls(&self) -> impl Iterator<Item = (ControlId, &Control)> + '_ {
        self.control_ids()
            .into_iter()
            .map(move |id| (id, &self.controls[id.0]))
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.groups.iter().enumerate().map(|(i, g)| (GroupId(i), g))
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.groups.iter().position(|g| g.name == name).map(GroupId)
    }

    /// Form errors followed by control errors, without duplicates.
    pub fn all_errors(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let control_errors = self.controls().flat_map(|(_, c)| c.errors.iter());
        for error in self.errors.iter().chain(control_errors) {
            if !out.contains(error) {
                out.push(error.clone());
            }
        }
        out
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.controls.iter().any(Control::has_errors)
    }

    /// Mark every control as not yet rendered.
    pub fn reset_rendered(&self) {
        for control in &self.controls {
            control.set_rendered(false);
        }
    }

    pub(crate) fn is_prepared_by(&self, renderer: u64) -> bool {
        self.prepared_by == Some(renderer)
    }

    pub(crate) fn mark_prepared(&mut self, renderer: u64) {
        self.prepared_by = Some(renderer);
    }
}
