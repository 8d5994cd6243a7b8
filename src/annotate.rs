use tracing::{debug, trace};

use crate::control::{Control, ControlMeta};
use crate::element::{Element, Markup};
use crate::form::Form;
use crate::translate::Translator;

/// Suffix appended to a control's html id to form the id of its pair wrapper.
pub const PAIR_ID_SUFFIX: &str = "-pair";

/// Derive render metadata for one control. Safe to run repeatedly: derived
/// state is recomputed from the control's options every time.
pub fn annotate_control(control: &mut Control, translator: Option<&dyn Translator>) {
    control.set_rendered(false);
    control.meta = ControlMeta::default();

    if control.required {
        control.label.add_class("required");
        control.meta.required = true;
    }

    if let Some(placeholder) = non_empty(&control.options.placeholder) {
        if !control.kind.is_button_like() {
            let text = placeholder.translated(translator).as_plain_text();
            control.prototype.set_attr("placeholder", text);
        }
    }

    if control.prototype.attr("type") == Some("email") && control.options.input_prepend.is_none() {
        control.options.input_prepend = Some(Markup::text("@"));
    }

    if control.kind.is_submitter() {
        control.prototype.add_class("btn");
        trace!(control = %control.path, "annotated submitter");
        return;
    }

    if control.kind.is_checkbox() {
        control.label.add_class("checkbox");
    } else if !control.kind.is_radio_list() {
        control.label.add_class("control-label");
    }

    let mut pair = Element::new("div")
        .with_attr("id", format!("{}{}", control.html_id, PAIR_ID_SUFFIX))
        .with_class("control-group");
    if control.meta.required {
        pair.add_class("required");
    }
    if control.has_errors() {
        pair.add_class("error");
    }
    control.meta.pair = Some(pair);

    control.meta.prepend = non_empty(&control.options.input_prepend).map(add_on);
    control.meta.append = non_empty(&control.options.input_append).map(add_on);

    trace!(control = %control.path, "annotated control");
}

/// Annotate every control of the form and make sure the form element carries
/// a layout class.
pub fn annotate_form(form: &mut Form, translator: Option<&dyn Translator>) {
    let ids = form.control_ids();
    for &id in &ids {
        annotate_control(form.control_mut(id), translator);
    }

    let has_layout_class = form
        .element
        .classes
        .iter()
        .any(|c| c.to_ascii_lowercase().contains("form-"));
    if !has_layout_class {
        form.element.add_class("form-horizontal");
    }

    debug!(form = %form.name, controls = ids.len(), "annotated form");
}

fn add_on(decoration: &Markup) -> Element {
    decoration.wrap_in(Element::new("span").with_class("add-on"))
}

fn non_empty(markup: &Option<Markup>) -> Option<&Markup> {
    match markup {
        Some(Markup::Text(text)) if text.is_empty() => None,
        other => other.as_ref(),
    }
}
