use tracing::{debug, trace};

use crate::control::ControlId;
use crate::element::Element;
use crate::error::{FormError, FormResult};
use crate::filter::is_eligible;
use crate::form::{Form, Group, GroupId, GroupRef};
use crate::render_group::{GroupEntry, GroupOrigin, RenderGroup};
use crate::translate::Translator;

/// Resolve the form's named groups into render groups.
///
/// Groups listed in `priority` come first, in that order and each once; the
/// remaining groups follow in declaration order. Every reference is checked
/// before any group is processed, so an unknown name fails the whole call.
/// Groups with nothing left to show are omitted.
pub fn resolve_groups(
    form: &Form,
    priority: &[GroupRef],
    translator: Option<&dyn Translator>,
) -> FormResult<Vec<RenderGroup>> {
    let mut order: Vec<GroupId> = Vec::new();
    for reference in priority {
        let id = lookup_group(form, reference)?;
        if !order.contains(&id) {
            order.push(id);
        }
    }
    for (id, _) in form.groups() {
        if !order.contains(&id) {
            order.push(id);
        }
    }

    let resolved: Vec<RenderGroup> = order
        .into_iter()
        .filter_map(|id| form.group(id))
        .filter_map(|group| process_group(form, group, translator))
        .collect();

    debug!(
        form = %form.name,
        prioritized = priority.len(),
        resolved = resolved.len(),
        "resolved groups"
    );
    Ok(resolved)
}

fn lookup_group(form: &Form, reference: &GroupRef) -> FormResult<GroupId> {
    match reference {
        GroupRef::Name(name) => form
            .group_by_name(name)
            .ok_or_else(|| FormError::GroupNotFound { name: name.clone() }),
        GroupRef::Id(id) => form
            .group(*id)
            .map(|_| *id)
            .ok_or_else(|| FormError::GroupNotFound {
                name: format!("#{}", id.0),
            }),
    }
}

/// Build the render group for one named group, or `None` when it is
/// non-visual or none of its controls can still be shown.
pub fn process_group(
    form: &Form,
    group: &Group,
    translator: Option<&dyn Translator>,
) -> Option<RenderGroup> {
    if !group.options.visual || group.controls.is_empty() {
        trace!(group = %group.name, "skipping non-visual or empty group");
        return None;
    }

    let mut controls: Vec<ControlId> = Vec::with_capacity(group.controls.len());
    for &id in &group.controls {
        if is_eligible(form.control(id)) && !controls.contains(&id) {
            controls.push(id);
        }
    }
    if controls.is_empty() {
        trace!(group = %group.name, "all controls rendered or hidden");
        return None;
    }

    let mut attrs = group
        .options
        .container
        .clone()
        .unwrap_or_else(Element::bare)
        .without_name();
    attrs.add_missing_attrs(&group.options.attrs);

    Some(RenderGroup {
        origin: GroupOrigin::Named(group.name.clone()),
        entries: controls.into_iter().map(GroupEntry::Control).collect(),
        label: group.options.label.as_ref().map(|l| l.translated(translator)),
        description: group
            .options
            .description
            .as_ref()
            .map(|d| d.translated(translator)),
        attrs,
        level: 0,
        root: false,
        options: group.options.attrs.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Control;
    use crate::element::Markup;
    use pretty_assertions::assert_eq;

    fn names(groups: &[RenderGroup]) -> Vec<&str> {
        groups.iter().map(RenderGroup::name).collect()
    }

    fn three_groups() -> Form {
        let mut form = Form::new("f");
        let a = form.add_control(Control::text("a")).unwrap();
        let b = form.add_control(Control::text("b")).unwrap();
        let c = form.add_control(Control::text("c")).unwrap();
        form.add_group(Group::new("one").with_controls([a])).unwrap();
        form.add_group(Group::new("two").with_controls([b])).unwrap();
        form.add_group(Group::new("three").with_controls([c])).unwrap();
        form
    }

    #[test]
    fn test_declaration_order_without_priority() {
        let form = three_groups();
        let groups = resolve_groups(&form, &[], None).unwrap();
        assert_eq!(names(&groups), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_priority_prefix_then_rest() {
        let form = three_groups();
        let priority = vec![GroupRef::from("three"), GroupRef::from("one")];
        let groups = resolve_groups(&form, &priority, None).unwrap();
        assert_eq!(names(&groups), vec!["three", "one", "two"]);
    }

    #[test]
    fn test_duplicate_priority_entries_resolved_once() {
        let form = three_groups();
        let two = form.group_by_name("two").unwrap();
        let priority = vec![GroupRef::Id(two), GroupRef::from("two")];
        let groups = resolve_groups(&form, &priority, None).unwrap();
        assert_eq!(names(&groups), vec!["two", "one", "three"]);
    }

    #[test]
    fn test_unknown_priority_group() {
        let form = three_groups();
        let priority = vec![GroupRef::from("one"), GroupRef::from("nonexistent")];
        let result = resolve_groups(&form, &priority, None);
        assert_eq!(
            result,
            Err(FormError::GroupNotFound {
                name: "nonexistent".to_string()
            })
        );
    }

    #[test]
    fn test_non_visual_group_skipped() {
        let mut form = Form::new("f");
        let a = form.add_control(Control::text("a")).unwrap();
        form.add_group(Group::new("meta").with_controls([a]).non_visual()).unwrap();
        form.add_group(Group::new("empty")).unwrap();
        assert!(resolve_groups(&form, &[], None).unwrap().is_empty());
    }

    #[test]
    fn test_exhausted_group_resolves_to_nothing() {
        let mut form = Form::new("f");
        let token = form.add_control(Control::hidden("token")).unwrap();
        let a = form.add_control(Control::text("a")).unwrap();
        form.add_group(Group::new("g").with_controls([token, a])).unwrap();

        form.control(a).set_rendered(true);
        let group = form.group(form.group_by_name("g").unwrap()).unwrap();
        assert_eq!(process_group(&form, group, None), None);
    }

    #[test]
    fn test_process_group_contents() {
        let mut form = Form::new("f");
        let token = form.add_control(Control::hidden("token")).unwrap();
        let a = form.add_control(Control::text("a")).unwrap();
        let group = Group::new("personal")
            .with_label("Personal")
            .with_description(Element::new("em").with_text("as on your ID"))
            .with_container(Element::new("fieldset").with_attr("id", "personal-box"))
            .with_controls([token, a, a])
            .with_attr("id", "ignored")
            .unwrap()
            .with_attr("data-step", "1")
            .unwrap();
        form.add_group(group).unwrap();

        let translator = |s: &str| s.to_uppercase();
        let group = form.group(form.group_by_name("personal").unwrap()).unwrap();
        let resolved = process_group(&form, group, Some(&translator)).unwrap();

        assert_eq!(resolved.entries, vec![GroupEntry::Control(a)]);
        assert_eq!(resolved.label, Some(Markup::text("PERSONAL")));
        assert_eq!(
            resolved.description,
            Some(Markup::Html(Element::new("em").with_text("as on your ID")))
        );
        assert_eq!(resolved.attrs.name, None);
        assert_eq!(resolved.attrs.id(), Some("personal-box"));
        assert_eq!(resolved.attrs.attr("data-step"), Some("1"));
        assert_eq!(resolved.options.get("data-step"), Some(&"1".to_string()));
        assert_eq!(resolved.level, 0);
        assert!(!resolved.root);
    }
}
