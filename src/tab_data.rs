/// Host records for Tabby: windows, tab groups and tabs as the browser reports them
use serde::{Deserialize, Serialize};

/// Group id the browser reports for a tab that is not in any group
pub const TAB_GROUP_ID_NONE: i32 = -1;

/// Information about a browser tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostTab {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
    #[serde(default)]
    pub active: bool,
    pub window_id: i32,
    #[serde(default = "ungrouped")]
    pub group_id: i32,
}

fn ungrouped() -> i32 {
    TAB_GROUP_ID_NONE
}

impl HostTab {
    pub fn new(id: i32, window_id: i32, url: String, title: String) -> HostTab {
        HostTab {
            id,
            title,
            url,
            fav_icon_url: None,
            active: false,
            window_id,
            group_id: TAB_GROUP_ID_NONE,
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.group_id != TAB_GROUP_ID_NONE
    }
}

/// Color tag of a tab group. Colors this build does not know show as grey.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
    #[default]
    #[serde(other)]
    Grey,
}

/// Information about a tab group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostGroup {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: GroupColor,
    pub window_id: i32,
}

/// A browser window with its tabs in host order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostWindow {
    pub id: i32,
    #[serde(default)]
    pub incognito: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub tabs: Vec<HostTab>,
}

/// Everything one refresh fetches from the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    #[serde(default)]
    pub windows: Vec<HostWindow>,
    #[serde(default)]
    pub groups: Vec<HostGroup>,
}
