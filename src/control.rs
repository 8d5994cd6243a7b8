use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;

use crate::element::{Element, Markup};

/// Index of a control inside its [`Form`](crate::form::Form).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub(crate) usize);

impl ControlId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Capability tag of a control, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    #[default]
    Text,
    Email,
    Password,
    Number,
    TextArea,
    Select,
    MultiSelect,
    Upload,
    Checkbox,
    CheckboxList,
    RadioList,
    Hidden,
    Submit,
    ImageButton,
    Button,
}

impl ControlKind {
    /// Plain (non-submitting) button.
    pub fn is_button(self) -> bool {
        matches!(self, ControlKind::Button)
    }

    /// Control that submits the form.
    pub fn is_submitter(self) -> bool {
        matches!(self, ControlKind::Submit | ControlKind::ImageButton)
    }

    pub fn is_button_like(self) -> bool {
        self.is_button() || self.is_submitter()
    }

    pub fn is_checkbox(self) -> bool {
        matches!(self, ControlKind::Checkbox)
    }

    pub fn is_radio_list(self) -> bool {
        matches!(self, ControlKind::RadioList)
    }

    pub fn is_checkbox_list(self) -> bool {
        matches!(self, ControlKind::CheckboxList)
    }

    pub fn is_hidden(self) -> bool {
        matches!(self, ControlKind::Hidden)
    }

    /// Native `type` attribute of the widget, if it is an `<input>`.
    pub fn input_type(self) -> Option<&'static str> {
        match self {
            ControlKind::Text => Some("text"),
            ControlKind::Email => Some("email"),
            ControlKind::Password => Some("password"),
            ControlKind::Number => Some("number"),
            ControlKind::Upload => Some("file"),
            ControlKind::Checkbox => Some("checkbox"),
            ControlKind::RadioList => Some("radio"),
            ControlKind::CheckboxList => Some("checkbox"),
            ControlKind::Hidden => Some("hidden"),
            ControlKind::Submit => Some("submit"),
            ControlKind::ImageButton => Some("image"),
            ControlKind::Button => Some("button"),
            ControlKind::TextArea | ControlKind::Select | ControlKind::MultiSelect => None,
        }
    }

    fn tag_name(self) -> &'static str {
        match self {
            ControlKind::TextArea => "textarea",
            ControlKind::Select | ControlKind::MultiSelect => "select",
            _ => "input",
        }
    }
}

/// Caller-set render options of a control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ControlOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Markup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Markup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_prepend: Option<Markup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_append: Option<Markup>,
    /// Custom template for this control, consulted by the templating layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

/// Render metadata derived by the annotator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControlMeta {
    pub required: bool,
    /// Wrapper element around label + widget; absent for submit buttons.
    pub pair: Option<Element>,
    pub prepend: Option<Element>,
    pub append: Option<Element>,
}

/// A leaf form field or button.
#[derive(Debug, Clone)]
pub struct Control {
    pub name: String,
    /// Names of the enclosing containers and the control, joined by `-`.
    pub path: String,
    pub html_id: String,
    pub kind: ControlKind,
    pub required: bool,
    pub caption: Option<Markup>,
    pub errors: Vec<String>,
    pub options: ControlOptions,
    pub label: Element,
    pub prototype: Element,
    pub meta: ControlMeta,
    rendered: Cell<bool>,
}

impl Control {
    pub fn new(name: &str, kind: ControlKind) -> Self {
        let mut prototype = Element::new(kind.tag_name());
        if let Some(input_type) = kind.input_type() {
            prototype.set_attr("type", input_type);
        }

        Self {
            name: name.to_string(),
            path: name.to_string(),
            html_id: format!("frm-{}", name),
            kind,
            required: false,
            caption: None,
            errors: Vec::new(),
            options: ControlOptions::default(),
            label: Element::new("label"),
            prototype,
            meta: ControlMeta::default(),
            rendered: Cell::new(false),
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, ControlKind::Text)
    }

    pub fn submit(name: &str) -> Self {
        Self::new(name, ControlKind::Submit)
    }

    pub fn hidden(name: &str) -> Self {
        Self::new(name, ControlKind::Hidden)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<Markup>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<Markup>) -> Self {
        self.options.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<Markup>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    pub fn with_prepend(mut self, prepend: impl Into<Markup>) -> Self {
        self.options.input_prepend = Some(prepend.into());
        self
    }

    pub fn with_append(mut self, append: impl Into<Markup>) -> Self {
        self.options.input_append = Some(append.into());
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.errors.push(error.to_string());
        self
    }

    pub fn add_error(&mut self, error: &str) {
        self.errors.push(error.to_string());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered.get()
    }

    /// Flip the rendered flag. Takes `&self` so templates can mark controls
    /// while a render pass holds the form shared.
    pub fn set_rendered(&self, rendered: bool) {
        self.rendered.set(rendered);
    }

    /// Called when the control is attached to a form under `parent_path`.
    pub(crate) fn attach(&mut self, parent_path: &str) {
        self.path = if parent_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}-{}", parent_path, self.name)
        };
        self.html_id = format!("frm-{}", self.path);
        self.prototype.set_attr("id", self.html_id.clone());
        self.prototype.set_attr("name", self.path.clone());
        self.label.set_attr("for", self.html_id.clone());
    }
}
