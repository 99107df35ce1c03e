/// Builds the nested tree from the flat lists the browser reports
use std::collections::HashMap;

use crate::tab_data::{HostGroup, HostSnapshot, HostWindow};
use crate::tree::{GroupItem, TabItem, Tree, TreeItem, WindowItem};

/// Project windows (with their flat tabs) and tab groups into a tree.
///
/// Each run of consecutive tabs carrying the same group id collapses into
/// one group node at the position of the run's first tab. A tab whose
/// group is not in `groups` stays in the window as an ungrouped tab.
pub fn project(windows: &[HostWindow], groups: &[HostGroup]) -> Tree {
    let known_groups: HashMap<i32, &HostGroup> = groups.iter().map(|g| (g.id, g)).collect();

    Tree::new(
        windows
            .iter()
            .map(|window| TreeItem::Window(project_window(window, &known_groups)))
            .collect(),
    )
}

pub fn project_snapshot(snapshot: &HostSnapshot) -> Tree {
    project(&snapshot.windows, &snapshot.groups)
}

fn project_window(window: &HostWindow, known_groups: &HashMap<i32, &HostGroup>) -> WindowItem {
    let mut children = Vec::new();
    let tabs = &window.tabs;
    let mut i = 0;

    while i < tabs.len() {
        let tab = &tabs[i];

        let group = if tab.is_grouped() {
            let found = known_groups.get(&tab.group_id).copied();
            if found.is_none() {
                log::warn!(
                    "tab {} references unknown group {}, showing it ungrouped",
                    tab.id,
                    tab.group_id
                );
            }
            found
        } else {
            None
        };

        match group {
            Some(group) => {
                let run: Vec<TreeItem> = tabs[i..]
                    .iter()
                    .take_while(|t| t.group_id == group.id)
                    .map(|t| TreeItem::Tab(TabItem::from_host(t)))
                    .collect();
                i += run.len();
                children.push(TreeItem::Group(GroupItem::from_host(group, run)));
            }
            None => {
                children.push(TreeItem::Tab(TabItem::from_host(tab)));
                i += 1;
            }
        }
    }

    WindowItem::from_host(window, children)
}
