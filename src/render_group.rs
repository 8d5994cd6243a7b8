use serde::Serialize;
use std::collections::BTreeMap;

use crate::control::ControlId;
use crate::element::{Element, Markup};

/// Where a render group came from. Consumers treat both alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum GroupOrigin {
    /// Built from the container hierarchy.
    Container(String),
    /// Built from a named group.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupEntry {
    Control(ControlId),
    Group(RenderGroup),
}

/// One visual grouping, ready for a template. Created fresh by every
/// resolution and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderGroup {
    pub origin: GroupOrigin,
    pub entries: Vec<GroupEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Markup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Markup>,
    /// Attributes for the wrapping element; never has a tag name.
    pub attrs: Element,
    pub level: usize,
    pub root: bool,
    /// Caller-defined option entries, passed through verbatim.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl RenderGroup {
    pub fn name(&self) -> &str {
        match &self.origin {
            GroupOrigin::Container(name) | GroupOrigin::Named(name) => name,
        }
    }

    /// Controls listed directly in this group.
    pub fn controls(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            GroupEntry::Control(id) => Some(*id),
            GroupEntry::Group(_) => None,
        })
    }

    /// Nested groups listed directly in this group.
    pub fn subgroups(&self) -> impl Iterator<Item = &RenderGroup> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            GroupEntry::Group(group) => Some(group),
            GroupEntry::Control(_) => None,
        })
    }

    /// Every control in this group and its subgroups, depth first.
    pub fn all_controls(&self) -> Vec<ControlId> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match entry {
                GroupEntry::Control(id) => out.push(*id),
                GroupEntry::Group(group) => out.extend(group.all_controls()),
            }
        }
        out
    }

    /// Number of group levels in this tree, counting this one.
    pub fn depth(&self) -> usize {
        1 + self.subgroups().map(RenderGroup::depth).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
