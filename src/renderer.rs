//! # Render Passes
//!
//! [`FormRenderer`] holds the configuration and the optional translator;
//! [`FormRenderer::begin`] opens a [`RenderPass`] over one form. Opening a
//! pass needs `&mut Form`, so only one pass per form can be in flight. While
//! the pass is open the form is shared and templates mark emitted controls
//! through [`RenderPass::mark_rendered`].
//!
//! ```ignore
//! let renderer = FormRenderer::new(RendererConfig::default())?;
//! let pass = renderer.begin(&mut form, PassMode::Reset);
//! for group in pass.find_groups()? {
//!     for id in group.controls() {
//!         if pass.mark_rendered(id) {
//!             // emit the control
//!         }
//!     }
//! }
//! ```

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use tracing::debug;

use crate::annotate::annotate_form;
use crate::config::RendererConfig;
use crate::control::{Control, ControlId};
use crate::element::{Element, Markup};
use crate::error::FormResult;
use crate::filter::{filter_controls, ButtonMode, ControlFilter};
use crate::form::{ContainerId, Form, Group, GroupRef};
use crate::grid::SubColumns;
use crate::grouper::build_group_tree;
use crate::render_group::RenderGroup;
use crate::resolver::{process_group, resolve_groups};
use crate::translate::{translate_all, Translator};

/// What to do with `rendered` flags of an already prepared form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Keep the flags: controls emitted earlier stay excluded.
    Continue,
    /// Clear every flag before resolving.
    Reset,
}

/// Grid parameters handed to templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub col_left: u32,
    pub col_right: u32,
    pub sub_col_left: i64,
    pub sub_col_right: i64,
    pub sub_offset: i64,
    pub sub_width: u32,
}

static NEXT_RENDERER_ID: AtomicU64 = AtomicU64::new(1);

pub struct FormRenderer {
    id: u64,
    config: RendererConfig,
    columns: SubColumns,
    translator: Option<Box<dyn Translator>>,
}

impl fmt::Debug for FormRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRenderer")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("columns", &self.columns)
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

impl FormRenderer {
    /// Fails with `InvalidConfiguration` before any form is touched.
    pub fn new(config: RendererConfig) -> FormResult<Self> {
        let columns = config.sub_columns()?;
        Ok(Self {
            id: NEXT_RENDERER_ID.fetch_add(1, Ordering::Relaxed),
            config,
            columns,
            translator: None,
        })
    }

    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Some(Box::new(translator));
        self
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn translator(&self) -> Option<&dyn Translator> {
        self.translator.as_deref()
    }

    /// Open a render pass. A form this renderer has not prepared yet is
    /// annotated with its translator (which also clears the flags); a form it
    /// already prepared is reset only with [`PassMode::Reset`].
    pub fn begin<'f>(&self, form: &'f mut Form, mode: PassMode) -> RenderPass<'_, 'f> {
        if !form.is_prepared_by(self.id) {
            annotate_form(form, self.translator());
            form.mark_prepared(self.id);
        } else if mode == PassMode::Reset {
            form.reset_rendered();
        }
        debug!(form = %form.name, ?mode, "render pass started");

        let form: &'f Form = form;
        RenderPass {
            renderer: self,
            form,
        }
    }
}

/// One in-flight resolution over a form.
#[derive(Debug)]
pub struct RenderPass<'r, 'f> {
    renderer: &'r FormRenderer,
    form: &'f Form,
}

impl<'r, 'f> RenderPass<'r, 'f> {
    pub fn form(&self) -> &'f Form {
        self.form
    }

    pub fn control(&self, id: ControlId) -> &'f Control {
        self.form.control(id)
    }

    /// Controls of `container` (the form root when `None`) still to render.
    pub fn find_controls(&self, container: Option<ContainerId>, mode: ButtonMode) -> ControlFilter<'f> {
        filter_controls(self.form, container.unwrap_or_else(|| self.form.root()), mode)
    }

    /// Group tree of the container hierarchy, grouped `group_level` deep.
    /// `level` is the nesting depth of `container` (0 for the form root).
    pub fn group_tree(&self, container: Option<ContainerId>, level: usize) -> RenderGroup {
        build_group_tree(self.form, container, level, self.renderer.config.group_level)
    }

    /// Named groups, configured priority groups first.
    pub fn find_groups(&self) -> FormResult<Vec<RenderGroup>> {
        let priority: Vec<GroupRef> = self
            .renderer
            .config
            .prior_groups
            .iter()
            .map(|name| GroupRef::from(name.as_str()))
            .collect();
        self.resolve_groups(&priority)
    }

    pub fn resolve_groups(&self, priority: &[GroupRef]) -> FormResult<Vec<RenderGroup>> {
        resolve_groups(self.form, priority, self.renderer.translator())
    }

    pub fn process_group(&self, group: &Group) -> Option<RenderGroup> {
        process_group(self.form, group, self.renderer.translator())
    }

    /// Mark a control as emitted. Returns `false` when it already was, in
    /// which case it must not be emitted again.
    pub fn mark_rendered(&self, id: ControlId) -> bool {
        let control = self.form.control(id);
        if control.is_rendered() {
            return false;
        }
        control.set_rendered(true);
        true
    }

    pub fn layout(&self) -> TemplateParams {
        let config = &self.renderer.config;
        let columns = self.renderer.columns;
        TemplateParams {
            col_left: config.col_left,
            col_right: config.col_right,
            sub_col_left: columns.sub_left,
            sub_col_right: columns.sub_right,
            sub_offset: columns.offset,
            sub_width: config.sub_width,
        }
    }

    /// Errors for the form-level error list. When errors are shown at their
    /// inputs, control errors are left out.
    pub fn find_errors(&self) -> Vec<String> {
        let errors = if self.renderer.config.errors_at_inputs {
            let control_errors: Vec<&String> = self
                .form
                .controls()
                .flat_map(|(_, c)| c.errors.iter())
                .collect();
            self.form
                .errors
                .iter()
                .filter(|e| !control_errors.contains(e))
                .cloned()
                .collect()
        } else {
            self.form.all_errors()
        };
        translate_all(&errors, self.renderer.translator())
    }

    /// First error of a control as an inline help element.
    pub fn control_error(&self, id: ControlId) -> Option<Element> {
        if !self.renderer.config.errors_at_inputs {
            return None;
        }
        let error = self.form.control(id).errors.first()?;
        let text = Markup::text(error).translated(self.renderer.translator());
        Some(text.wrap_in(Element::new("p").with_class("help-inline")))
    }

    /// Description of a control as a help block.
    pub fn control_description(&self, id: ControlId) -> Option<Element> {
        let description = match &self.form.control(id).options.description {
            Some(Markup::Text(text)) if text.is_empty() => return None,
            Some(description) => description.translated(self.renderer.translator()),
            None => return None,
        };
        Some(description.wrap_in(Element::new("p").with_class("help-block")))
    }

    pub fn control_has_class(&self, id: ControlId, class: &str) -> bool {
        self.form.control(id).prototype.has_class(class)
    }
}

/// Attribute overrides for rendering a single part of a form, split from
/// arguments such as `input-class` and `label-title`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartAttrs {
    pub input: BTreeMap<String, String>,
    pub label: BTreeMap<String, String>,
}

impl PartAttrs {
    /// Arguments without an `input-` or `label-` prefix are ignored.
    pub fn from_args<'a>(args: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        static PART_ARG_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = PART_ARG_REGEX.get_or_init(|| Regex::new(r"(?i)^(input|label)-(.+)$").unwrap());

        let mut attrs = PartAttrs::default();
        for (key, value) in args {
            let Some(caps) = re.captures(key) else {
                continue;
            };
            let target = if caps[1].eq_ignore_ascii_case("input") {
                &mut attrs.input
            } else {
                &mut attrs.label
            };
            target.insert(caps[2].to_string(), value.to_string());
        }
        attrs
    }
}
