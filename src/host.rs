/// Commands sent to the browser and notifications received from it
use serde::{Deserialize, Serialize};

/// A command for the browser's tabs / tabGroups API.
///
/// Serialized with a `kind` tag for the JS bridge. A `window_id` of `None`
/// is left out of the payload entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCommand {
    MoveTab {
        tab_id: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window_id: Option<i32>,
        index: usize,
    },
    UngroupTab {
        tab_id: i32,
    },
    GroupTabs {
        tab_ids: Vec<i32>,
        group_id: i32,
    },
    MoveGroup {
        group_id: i32,
        // the browser rejects a windowId equal to the group's current window
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window_id: Option<i32>,
        index: usize,
    },
    /// `index` of -1 moves the tabs to the end of their window
    MoveTabs {
        tab_ids: Vec<i32>,
        index: i32,
    },
    RemoveTabs {
        tab_ids: Vec<i32>,
    },
    UngroupTabs {
        tab_ids: Vec<i32>,
    },
    CreateGroup {
        tab_ids: Vec<i32>,
        title: String,
    },
}

impl HostCommand {
    /// Name of the browser call, for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            HostCommand::MoveTab { .. } => "moveTab",
            HostCommand::UngroupTab { .. } => "ungroupTab",
            HostCommand::GroupTabs { .. } => "groupTabs",
            HostCommand::MoveGroup { .. } => "moveGroup",
            HostCommand::MoveTabs { .. } => "moveTabs",
            HostCommand::RemoveTabs { .. } => "removeTabs",
            HostCommand::UngroupTabs { .. } => "ungroupTabs",
            HostCommand::CreateGroup { .. } => "createGroup",
        }
    }
}

/// Receives commands. Commands are fire-and-forget: implementations start
/// the browser call and return without waiting for it.
pub trait Host {
    fn dispatch(&self, command: HostCommand);
}

/// Something changed in the browser's windows, tabs or groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Init,
    TabActivated,
    TabAttached,
    TabCreated,
    TabDetached,
    TabHighlighted,
    TabMoved,
    TabRemoved,
    TabReplaced,
    TabUpdated,
    GroupCreated,
    GroupMoved,
    GroupRemoved,
    GroupUpdated,
    WindowCreated,
    WindowRemoved,
    WindowFocusChanged,
}

impl ChangeEvent {
    /// Parse the event name the bridge reports
    pub fn from_name(name: &str) -> Option<ChangeEvent> {
        let event = match name {
            "init" => ChangeEvent::Init,
            "activated" => ChangeEvent::TabActivated,
            "attached" => ChangeEvent::TabAttached,
            "created" => ChangeEvent::TabCreated,
            "detached" => ChangeEvent::TabDetached,
            "highlighted" => ChangeEvent::TabHighlighted,
            "moved" => ChangeEvent::TabMoved,
            "removed" => ChangeEvent::TabRemoved,
            "replaced" => ChangeEvent::TabReplaced,
            "updated" => ChangeEvent::TabUpdated,
            "groupCreated" => ChangeEvent::GroupCreated,
            "groupMoved" => ChangeEvent::GroupMoved,
            "groupRemoved" => ChangeEvent::GroupRemoved,
            "groupUpdated" => ChangeEvent::GroupUpdated,
            "windowCreated" => ChangeEvent::WindowCreated,
            "windowRemoved" => ChangeEvent::WindowRemoved,
            "focusChanged" => ChangeEvent::WindowFocusChanged,
            _ => return None,
        };
        Some(event)
    }
}
