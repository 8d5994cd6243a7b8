//! # gridform
//!
//! Layout resolution for forms rendered on a 12-unit grid.
//!
//! Given a form model (controls, nested containers and named groups) this
//! crate decides which controls end up in which visual group, in what order
//! and with what column spans. Emitting markup is left to templates; they
//! consume the [`RenderGroup`] trees and element prototypes produced here.
//!
//! ## Features
//! - One-time control annotation (required markers, placeholders, input
//!   add-ons, pair wrappers)
//! - Lazy filtering of controls that are not yet rendered or hidden
//! - Container hierarchy turned into nested render groups, `group_level` deep
//! - Named groups resolved in priority order, empty groups suppressed
//! - Sub-layout column math for nested fieldsets
//! - YAML form definitions and renderer configuration
//!
//! ## Example
//! ```ignore
//! use gridform::{parse_form, FormRenderer, PassMode, RendererConfig};
//!
//! let mut form = parse_form(r#"
//! name: signup
//! children:
//!   - control: { name: name, required: true }
//!   - control: { name: email, kind: email }
//! groups:
//!   - name: contact
//!     label: Contact
//!     controls: [email]
//! "#)?;
//!
//! let renderer = FormRenderer::new(RendererConfig::default())?;
//! let pass = renderer.begin(&mut form, PassMode::Reset);
//! for group in pass.find_groups()? {
//!     println!("{}: {} controls", group.name(), group.controls().count());
//! }
//! ```
//!
//! A form must only have one render pass in flight; `FormRenderer::begin`
//! takes the form mutably to enforce that.

pub mod annotate;
pub mod config;
pub mod control;
pub mod definition;
pub mod element;
pub mod error;
pub mod filter;
pub mod form;
pub mod grid;
pub mod grouper;
pub mod render_group;
pub mod renderer;
pub mod resolver;
pub mod translate;

// --- Core types ---
pub use config::RendererConfig;
pub use control::{Control, ControlId, ControlKind, ControlMeta, ControlOptions};
pub use element::{Element, Markup};
pub use error::{FormError, FormResult};
pub use filter::{ButtonMode, ControlFilter};
pub use form::{Child, Container, ContainerId, Form, Group, GroupId, GroupOptions, GroupRef};
pub use grid::SubColumns;
pub use render_group::{GroupEntry, GroupOrigin, RenderGroup};
pub use renderer::{FormRenderer, PartAttrs, PassMode, RenderPass, TemplateParams};
pub use translate::Translator;

// --- Definition types ---
pub use definition::{ContainerDefinition, ControlDefinition, FormDefinition, GroupDefinition, NodeDefinition};

/// Parse a YAML form definition into a form.
pub fn parse_form(yaml: &str) -> FormResult<Form> {
    definition::parse_form(yaml)
}

/// Parse and validate a YAML renderer configuration.
pub fn parse_config(yaml: &str) -> FormResult<RendererConfig> {
    RendererConfig::from_yaml(yaml)
}

/// Column spans of a nested sub-layout.
pub fn compute_sub_columns(col_left: u32, col_right: u32, sub_width: u32) -> FormResult<SubColumns> {
    grid::compute_sub_columns(col_left, col_right, sub_width)
}
