/// Tree rows: one component renders a window, group or tab and its children

use std::collections::HashSet;
use std::rc::Rc;

use yew::prelude::*;

use crate::operations::favicon_url;
use crate::tab_data::GroupColor;
use crate::tree::{GroupItem, NodeId, TabItem, TreeItem, WindowItem};

/// Drag events bubbled up from the rows to the side panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSignal {
    Start(NodeId),
    Over(NodeId),
    Drop(Option<NodeId>),
    End,
}

#[derive(Properties, PartialEq)]
pub struct TreeNodeProps {
    pub item: TreeItem,
    pub extension_id: AttrValue,
    pub matches: Rc<HashSet<i32>>,
    #[prop_or_default]
    pub dragged: Option<NodeId>,
    pub on_drag: Callback<DragSignal>,
}

#[function_component(TreeNode)]
pub fn tree_node(props: &TreeNodeProps) -> Html {
    let id = props.item.id();

    let ondragstart = {
        let on_drag = props.on_drag.clone();
        Callback::from(move |e: DragEvent| {
            e.stop_propagation();
            // Firefox only starts a drag when some data is set
            if let Some(transfer) = e.data_transfer() {
                if let Err(err) = transfer.set_data("text/plain", &id.to_string()) {
                    log::debug!("could not set drag data for {}: {:?}", id, err);
                }
            }
            on_drag.emit(DragSignal::Start(id));
        })
    };

    let ondragover = {
        let on_drag = props.on_drag.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            on_drag.emit(DragSignal::Over(id));
        })
    };

    let ondrop = {
        let on_drag = props.on_drag.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            on_drag.emit(DragSignal::Drop(Some(id)));
        })
    };

    let ondragend = {
        let on_drag = props.on_drag.clone();
        Callback::from(move |e: DragEvent| {
            e.stop_propagation();
            on_drag.emit(DragSignal::End);
        })
    };

    let dragging = props.dragged == Some(id);

    let (row, row_class) = match &props.item {
        TreeItem::Window(window) => (window_row(window), window_class(window)),
        TreeItem::Group(group) => (group_row(group), group_class(group)),
        TreeItem::Tab(tab) => {
            let matched = props.matches.contains(&tab.id);
            (tab_row(tab, &props.extension_id), tab_class(tab, matched))
        }
    };

    html! {
        <li class={classes!("tree-node", dragging.then_some("dragging"))}>
            <div
                class={row_class}
                draggable="true"
                {ondragstart}
                {ondragover}
                {ondrop}
                {ondragend}
            >
                {row}
            </div>
            if !props.item.children().is_empty() {
                <ul class="tree-children">
                    {for props.item.children().iter().map(|child| html! {
                        <TreeNode
                            key={child.id().to_string()}
                            item={child.clone()}
                            extension_id={props.extension_id.clone()}
                            matches={props.matches.clone()}
                            dragged={props.dragged}
                            on_drag={props.on_drag.clone()}
                        />
                    })}
                </ul>
            }
        </li>
    }
}

fn window_class(window: &WindowItem) -> Classes {
    classes!(
        "tree-row",
        "window-row",
        window.incognito.then_some("incognito"),
        window.focused.then_some("focused")
    )
}

fn window_row(window: &WindowItem) -> Html {
    let label = if window.incognito {
        format!("Incognito window ({} tabs)", window.tab_count())
    } else {
        format!("Window ({} tabs)", window.tab_count())
    };
    html! { <span class="window-title">{label}</span> }
}

fn group_class(group: &GroupItem) -> Classes {
    classes!("tree-row", "group-row", color_class(group.color))
}

fn group_row(group: &GroupItem) -> Html {
    let title = if group.title.is_empty() {
        "Unnamed group"
    } else {
        group.title.as_str()
    };
    html! {
        <>
            <span class="group-title">{title}</span>
            <span class="group-count">{group.children.len()}</span>
        </>
    }
}

fn tab_class(tab: &TabItem, matched: bool) -> Classes {
    classes!(
        "tree-row",
        "tab-row",
        tab.active.then_some("active"),
        matched.then_some("search-match")
    )
}

fn tab_row(tab: &TabItem, extension_id: &str) -> Html {
    let icon = match &tab.fav_icon_url {
        Some(icon) if !icon.is_empty() => icon.clone(),
        _ => favicon_url(extension_id, &tab.url),
    };
    html! {
        <>
            <img class="tab-favicon" src={icon} alt="" width="16" height="16" />
            <span class="tab-title" title={tab.url.clone()}>{&tab.title}</span>
        </>
    }
}

/// CSS class for a group's color tag
pub fn color_class(color: GroupColor) -> &'static str {
    match color {
        GroupColor::Grey => "group-grey",
        GroupColor::Blue => "group-blue",
        GroupColor::Red => "group-red",
        GroupColor::Yellow => "group-yellow",
        GroupColor::Green => "group-green",
        GroupColor::Pink => "group-pink",
        GroupColor::Purple => "group-purple",
        GroupColor::Cyan => "group-cyan",
        GroupColor::Orange => "group-orange",
    }
}
