use std::collections::BTreeMap;

use tracing::trace;

use crate::element::{Element, Markup};
use crate::filter::{filter_controls_deep, ButtonMode};
use crate::form::{Child, ContainerId, Form};
use crate::render_group::{GroupEntry, GroupOrigin, RenderGroup};

/// Turn the container hierarchy into render groups.
///
/// `container == None` starts at the form root and produces the root group.
/// Containers nested up to `group_level` levels deep become subgroups; deeper
/// containers are flattened into their nearest grouped ancestor, keeping only
/// controls that are neither rendered nor hidden. Controls placed directly in
/// a grouped container are always listed.
pub fn build_group_tree(
    form: &Form,
    container: Option<ContainerId>,
    level: usize,
    group_level: usize,
) -> RenderGroup {
    let root = container.is_none();
    let id = container.unwrap_or_else(|| form.root());
    let node = form.container(id);

    let label = if root {
        None
    } else {
        Some(
            node.options
                .label
                .clone()
                .unwrap_or_else(|| Markup::text(&node.name)),
        )
    };

    let mut attrs = Element::bare();
    attrs.merge_attrs(&node.options.attrs);

    let mut entries = Vec::with_capacity(node.children.len());
    for child in &node.children {
        match *child {
            Child::Container(nested) if level < group_level => {
                entries.push(GroupEntry::Group(build_group_tree(
                    form,
                    Some(nested),
                    level + 1,
                    group_level,
                )));
            }
            Child::Container(nested) => {
                trace!(container = %form.container(nested).path, level, "flattening container");
                entries.extend(
                    filter_controls_deep(form, nested, ButtonMode::Any).map(GroupEntry::Control),
                );
            }
            Child::Control(control) => entries.push(GroupEntry::Control(control)),
        }
    }

    RenderGroup {
        origin: GroupOrigin::Container(node.name.clone()),
        entries,
        label,
        description: node.options.description.clone(),
        attrs,
        level,
        root,
        options: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Control, ControlId};
    use crate::form::Container;
    use pretty_assertions::assert_eq;

    struct Nested {
        form: Form,
        name: ControlId,
        street: ControlId,
        lat: ControlId,
        send: ControlId,
    }

    // root: name, address { street, geo { lat } }, send
    fn nested() -> Nested {
        let mut form = Form::new("order");
        let name = form.add_control(Control::text("name")).unwrap();
        let address = form
            .add_container(Container::new("address").with_label("Address"))
            .unwrap();
        let street = form.add_control_to(address, Control::text("street")).unwrap();
        let geo = form.add_container_to(address, Container::new("geo")).unwrap();
        let lat = form.add_control_to(geo, Control::text("lat")).unwrap();
        let send = form.add_control(Control::submit("send")).unwrap();
        Nested {
            form,
            name,
            street,
            lat,
            send,
        }
    }

    #[test]
    fn test_group_level_zero_flattens_everything() {
        let n = nested();
        let tree = build_group_tree(&n.form, None, 0, 0);

        assert!(tree.root);
        assert_eq!(tree.label, None);
        assert_eq!(tree.level, 0);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.all_controls(), vec![n.name, n.street, n.lat, n.send]);
    }

    #[test]
    fn test_group_level_one_flattens_second_level() {
        let n = nested();
        let tree = build_group_tree(&n.form, None, 0, 1);

        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.controls().collect::<Vec<_>>(), vec![n.name, n.send]);

        let address = tree.subgroups().next().unwrap();
        assert!(!address.root);
        assert_eq!(address.level, 1);
        assert_eq!(address.label, Some(Markup::text("Address")));
        assert_eq!(address.entries, vec![GroupEntry::Control(n.street), GroupEntry::Control(n.lat)]);
    }

    #[test]
    fn test_deep_group_level_keeps_full_tree() {
        let n = nested();
        let tree = build_group_tree(&n.form, None, 0, 5);

        assert_eq!(tree.depth(), 3);
        let address = tree.subgroups().next().unwrap();
        let geo = address.subgroups().next().unwrap();
        assert_eq!(geo.level, 2);
        assert_eq!(geo.label, Some(Markup::text("geo")));
        assert_eq!(geo.controls().collect::<Vec<_>>(), vec![n.lat]);
    }

    #[test]
    fn test_flattening_skips_rendered_controls() {
        let n = nested();
        n.form.control(n.lat).set_rendered(true);
        let tree = build_group_tree(&n.form, None, 0, 1);
        let address = tree.subgroups().next().unwrap();
        assert_eq!(address.controls().collect::<Vec<_>>(), vec![n.street]);
    }

    #[test]
    fn test_empty_container_still_grouped() {
        let mut form = Form::new("f");
        let mut empty = Container::new("empty").with_description("Nothing here");
        empty.set_attr("class", "well").unwrap();
        form.add_container(empty).unwrap();

        let tree = build_group_tree(&form, None, 0, 1);
        let group = tree.subgroups().next().unwrap();
        assert!(group.is_empty());
        assert_eq!(group.description, Some(Markup::text("Nothing here")));
        assert!(group.attrs.has_class("well"));
        assert_eq!(group.attrs.name, None);
    }
}
