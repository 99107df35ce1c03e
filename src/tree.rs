/// Tree model: windows hold tabs and tab groups, tab groups hold tabs
use std::fmt;

use crate::tab_data::{GroupColor, HostGroup, HostTab, HostWindow, TAB_GROUP_ID_NONE};

/// Identifier of a node in the tree.
///
/// The browser numbers windows, groups and tabs independently, so the
/// kind is part of the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Window(i32),
    Group(i32),
    Tab(i32),
}

impl NodeId {
    /// The browser's own identifier
    pub fn raw(&self) -> i32 {
        match self {
            NodeId::Window(id) | NodeId::Group(id) | NodeId::Tab(id) => *id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeId::Window(_) => NodeKind::Window,
            NodeId::Group(_) => NodeKind::Group,
            NodeId::Tab(_) => NodeKind::Tab,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Window(id) => write!(f, "window:{}", id),
            NodeId::Group(id) => write!(f, "group:{}", id),
            NodeId::Tab(id) => write!(f, "tab:{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Window,
    Group,
    Tab,
}

/// Leaf node for one browser tab
#[derive(Debug, Clone, PartialEq)]
pub struct TabItem {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub fav_icon_url: Option<String>,
    pub active: bool,
    pub window_id: i32,
    pub group_id: i32,
}

impl TabItem {
    pub fn from_host(tab: &HostTab) -> TabItem {
        TabItem {
            id: tab.id,
            title: tab.title.clone(),
            url: tab.url.clone(),
            fav_icon_url: tab.fav_icon_url.clone(),
            active: tab.active,
            window_id: tab.window_id,
            group_id: tab.group_id,
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.group_id != TAB_GROUP_ID_NONE
    }
}

/// A tab group and its tabs
#[derive(Debug, Clone, PartialEq)]
pub struct GroupItem {
    pub id: i32,
    pub title: String,
    pub color: GroupColor,
    /// Window the group was in when the snapshot was taken
    pub window_id: i32,
    pub children: Vec<TreeItem>,
}

impl GroupItem {
    pub fn from_host(group: &HostGroup, children: Vec<TreeItem>) -> GroupItem {
        GroupItem {
            id: group.id,
            title: group.title.clone(),
            color: group.color,
            window_id: group.window_id,
            children,
        }
    }
}

/// A browser window, root of one subtree
#[derive(Debug, Clone, PartialEq)]
pub struct WindowItem {
    pub id: i32,
    pub incognito: bool,
    pub focused: bool,
    pub children: Vec<TreeItem>,
}

impl WindowItem {
    pub fn from_host(window: &HostWindow, children: Vec<TreeItem>) -> WindowItem {
        WindowItem {
            id: window.id,
            incognito: window.incognito,
            focused: window.focused,
            children,
        }
    }

    /// Tabs in the order the browser sees them, groups expanded in place
    pub fn flat_tabs(&self) -> Vec<&TabItem> {
        let mut tabs = Vec::new();
        for child in &self.children {
            collect_tabs(child, &mut tabs);
        }
        tabs
    }

    /// Number of tabs in the window, counting tabs inside groups
    pub fn tab_count(&self) -> usize {
        self.children.iter().map(TreeItem::tab_count).sum()
    }
}

fn collect_tabs<'a>(item: &'a TreeItem, out: &mut Vec<&'a TabItem>) {
    match item {
        TreeItem::Tab(tab) => out.push(tab),
        TreeItem::Group(group) => group.children.iter().for_each(|c| collect_tabs(c, out)),
        TreeItem::Window(window) => window.children.iter().for_each(|c| collect_tabs(c, out)),
    }
}

/// One node of the tree
#[derive(Debug, Clone, PartialEq)]
pub enum TreeItem {
    Window(WindowItem),
    Group(GroupItem),
    Tab(TabItem),
}

impl TreeItem {
    pub fn id(&self) -> NodeId {
        match self {
            TreeItem::Window(window) => NodeId::Window(window.id),
            TreeItem::Group(group) => NodeId::Group(group.id),
            TreeItem::Tab(tab) => NodeId::Tab(tab.id),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TreeItem::Window(_) => NodeKind::Window,
            TreeItem::Group(_) => NodeKind::Group,
            TreeItem::Tab(_) => NodeKind::Tab,
        }
    }

    /// Title shown for the node; windows have none
    pub fn title(&self) -> Option<&str> {
        match self {
            TreeItem::Window(_) => None,
            TreeItem::Group(group) => Some(&group.title),
            TreeItem::Tab(tab) => Some(&tab.title),
        }
    }

    pub fn children(&self) -> &[TreeItem] {
        match self {
            TreeItem::Window(window) => &window.children,
            TreeItem::Group(group) => &group.children,
            TreeItem::Tab(_) => &[],
        }
    }

    /// Copy of this node with its children replaced. Tabs stay leaves.
    pub fn with_children(&self, children: Vec<TreeItem>) -> TreeItem {
        match self {
            TreeItem::Window(window) => TreeItem::Window(WindowItem {
                children,
                ..window.clone()
            }),
            TreeItem::Group(group) => TreeItem::Group(GroupItem {
                children,
                ..group.clone()
            }),
            TreeItem::Tab(tab) => TreeItem::Tab(tab.clone()),
        }
    }

    /// Whether `child` may be placed directly under this node
    pub fn can_contain(&self, child: &TreeItem) -> bool {
        matches!(
            (self, child),
            (TreeItem::Window(_), TreeItem::Group(_) | TreeItem::Tab(_))
                | (TreeItem::Group(_), TreeItem::Tab(_))
        )
    }

    fn tab_count(&self) -> usize {
        match self {
            TreeItem::Tab(_) => 1,
            TreeItem::Group(_) | TreeItem::Window(_) => {
                self.children().iter().map(TreeItem::tab_count).sum()
            }
        }
    }

    fn is_well_formed(&self) -> bool {
        match self {
            TreeItem::Tab(_) => true,
            TreeItem::Group(group) => group
                .children
                .iter()
                .all(|child| matches!(child, TreeItem::Tab(_))),
            TreeItem::Window(window) => window
                .children
                .iter()
                .all(|child| self.can_contain(child) && child.is_well_formed()),
        }
    }
}

/// The whole model: one root per browser window, in browser order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    items: Vec<TreeItem>,
}

impl Tree {
    pub fn new(items: Vec<TreeItem>) -> Tree {
        Tree { items }
    }

    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<TreeItem> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn windows(&self) -> impl Iterator<Item = &WindowItem> {
        self.items.iter().filter_map(|item| match item {
            TreeItem::Window(window) => Some(window),
            TreeItem::Group(_) | TreeItem::Tab(_) => None,
        })
    }

    pub fn window(&self, window_id: i32) -> Option<&WindowItem> {
        self.windows().find(|window| window.id == window_id)
    }

    /// Every node id, depth first
    pub fn node_ids(&self) -> Vec<NodeId> {
        fn walk(item: &TreeItem, out: &mut Vec<NodeId>) {
            out.push(item.id());
            item.children().iter().for_each(|child| walk(child, out));
        }

        let mut ids = Vec::new();
        self.items.iter().for_each(|item| walk(item, &mut ids));
        ids
    }

    /// Windows at the root, tabs and groups under windows, only tabs under groups
    pub fn is_well_formed(&self) -> bool {
        self.items
            .iter()
            .all(|item| matches!(item, TreeItem::Window(_)) && item.is_well_formed())
    }
}
