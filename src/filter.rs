use std::slice;

use crate::control::{Control, ControlId};
use crate::form::{Child, ContainerId, Form};

/// Which controls a filter lets through, by button-ness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonMode {
    ButtonsOnly,
    NonButtonsOnly,
    #[default]
    Any,
}

impl ButtonMode {
    pub fn accepts(self, control: &Control) -> bool {
        let is_button = control.kind.is_button_like();
        match self {
            ButtonMode::ButtonsOnly => is_button,
            ButtonMode::NonButtonsOnly => !is_button,
            ButtonMode::Any => true,
        }
    }
}

/// A control can still be emitted when it is neither rendered nor hidden.
pub fn is_eligible(control: &Control) -> bool {
    !control.is_rendered() && !control.kind.is_hidden()
}

/// Lazy view over the controls of one container. A shallow filter skips
/// nested containers; a deep one walks them in document order. The
/// `rendered` flags are read when the iterator advances, so controls marked
/// rendered mid-iteration drop out.
#[derive(Debug, Clone)]
pub struct ControlFilter<'f> {
    form: &'f Form,
    stack: Vec<slice::Iter<'f, Child>>,
    mode: ButtonMode,
    deep: bool,
}

impl<'f> ControlFilter<'f> {
    fn new(form: &'f Form, container: ContainerId, mode: ButtonMode, deep: bool) -> Self {
        Self {
            form,
            stack: vec![form.container(container).children.iter()],
            mode,
            deep,
        }
    }
}

impl<'f> Iterator for ControlFilter<'f> {
    type Item = ControlId;

    fn next(&mut self) -> Option<ControlId> {
        loop {
            let child = match self.stack.last_mut()?.next() {
                Some(child) => *child,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            match child {
                Child::Control(id) => {
                    let control = self.form.control(id);
                    if is_eligible(control) && self.mode.accepts(control) {
                        return Some(id);
                    }
                }
                Child::Container(nested) if self.deep => {
                    self.stack.push(self.form.container(nested).children.iter());
                }
                Child::Container(_) => {}
            }
        }
    }
}

/// Filter the direct controls of `container`.
pub fn filter_controls(form: &Form, container: ContainerId, mode: ButtonMode) -> ControlFilter<'_> {
    ControlFilter::new(form, container, mode, false)
}

/// Filter every control below `container`, nested containers included.
pub fn filter_controls_deep(form: &Form, container: ContainerId, mode: ButtonMode) -> ControlFilter<'_> {
    ControlFilter::new(form, container, mode, true)
}
