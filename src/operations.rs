/// Bulk tab operations: dedupe, ungroup, sort by URL, search, grouping plans

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::host::HostCommand;
use crate::tree::{TabItem, Tree, TreeItem, WindowItem};

static URL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?://[^/]+/)(.*)$").expect("valid regex"));
static LONG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9]{10,}").expect("valid regex"));

/// Tabs to close so that every URL stays open once (first occurrence kept)
pub fn duplicate_tab_ids(tree: &Tree) -> Vec<i32> {
    let mut seen_urls = HashSet::new();
    let mut remove_ids = Vec::new();

    for window in tree.windows() {
        for tab in window.flat_tabs() {
            if !seen_urls.insert(tab.url.as_str()) {
                remove_ids.push(tab.id);
            }
        }
    }

    remove_ids
}

/// Every tab of the window, for ungrouping all of them at once
pub fn window_tab_ids(window: &WindowItem) -> Vec<i32> {
    window.flat_tabs().iter().map(|tab| tab.id).collect()
}

/// Sort key of a URL: hostname labels from the TLD inwards, then the path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSortKey {
    labels: Vec<String>,
    path: String,
}

impl UrlSortKey {
    pub fn parse(url: &str) -> Option<UrlSortKey> {
        let parsed = Url::parse(url).ok()?;
        let labels = parsed
            .host_str()
            .unwrap_or_default()
            .split('.')
            .rev()
            .map(str::to_string)
            .collect();

        Some(UrlSortKey {
            labels,
            path: parsed.path().to_string(),
        })
    }
}

impl Ord for UrlSortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec ordering compares label by label, then shorter first
        self.labels
            .cmp(&other.labels)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for UrlSortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Order tabs by URL sort key. Tabs whose URL does not parse go last.
pub fn sort_tabs_by_url<'a>(tabs: &[&'a TabItem]) -> Vec<&'a TabItem> {
    let mut keyed: Vec<(Option<UrlSortKey>, &TabItem)> = tabs
        .iter()
        .map(|tab| (UrlSortKey::parse(&tab.url), *tab))
        .collect();

    keyed.sort_by(|a, b| match (&a.0, &b.0) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, tab)| tab).collect()
}

/// Commands that sort a window: each group's tabs in place, then the
/// ungrouped tabs at the end of the window
pub fn sort_window_commands(window: &WindowItem) -> Vec<HostCommand> {
    let mut commands = Vec::new();
    let mut offset = 0;
    let mut ungrouped = Vec::new();

    for child in &window.children {
        match child {
            TreeItem::Tab(tab) => {
                ungrouped.push(tab);
                offset += 1;
            }
            TreeItem::Group(group) => {
                let tabs: Vec<&TabItem> = group
                    .children
                    .iter()
                    .filter_map(|item| match item {
                        TreeItem::Tab(tab) => Some(tab),
                        TreeItem::Group(_) | TreeItem::Window(_) => None,
                    })
                    .collect();
                if !tabs.is_empty() {
                    commands.push(HostCommand::MoveTabs {
                        tab_ids: sort_tabs_by_url(&tabs).iter().map(|t| t.id).collect(),
                        index: offset as i32,
                    });
                }
                offset += tabs.len();
            }
            TreeItem::Window(_) => {}
        }
    }

    if !ungrouped.is_empty() {
        commands.push(HostCommand::MoveTabs {
            tab_ids: sort_tabs_by_url(&ungrouped).iter().map(|t| t.id).collect(),
            index: -1,
        });
    }

    commands
}

/// Case-insensitive match of the query against title and URL. The URL is
/// percent-decoded first so non-ASCII paths match what the user types.
pub fn is_tab_matched(tab: &TabItem, query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    let query = query.to_lowercase();
    let url = percent_decode_str(&tab.url).decode_utf8_lossy();
    tab.title.to_lowercase().contains(&query) || url.to_lowercase().contains(&query)
}

/// Drop long alphanumeric tokens (ids, hashes) from the part of the URL
/// after the host
pub fn clean_url(url: &str) -> String {
    match URL_PREFIX.captures(url) {
        Some(caps) => format!("{}{}", &caps[1], LONG_TOKEN.replace_all(&caps[2], "")),
        None => url.to_string(),
    }
}

/// Favicon served by the extension's `_favicon` endpoint
pub fn favicon_url(extension_id: &str, page_url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(page_url.as_bytes()).collect();
    format!(
        "chrome-extension://{}/_favicon/?pageUrl={}&size=32",
        extension_id, encoded
    )
}

/// One tab as described to the grouping service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSummary {
    pub title: String,
    pub url: String,
}

/// Request payload for the grouping service; tabs are referred to by position
pub fn grouping_request(window: &WindowItem) -> Vec<TabSummary> {
    window
        .flat_tabs()
        .iter()
        .map(|tab| TabSummary {
            title: tab.title.clone(),
            url: clean_url(&tab.url),
        })
        .collect()
}

/// Groups proposed by the grouping service
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroupingPlan {
    #[serde(default)]
    pub groups: Vec<PlannedGroup>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedGroup {
    #[serde(default)]
    pub title: String,
    /// Positions in the window's flat tab list
    #[serde(default)]
    pub tab_ids: Vec<i64>,
}

impl GroupingPlan {
    pub fn parse(json: &str) -> Result<GroupingPlan, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One `CreateGroup` per planned group, with positions mapped to tab ids.
/// Positions outside the window are dropped, and so are groups left empty.
pub fn grouping_commands(plan: &GroupingPlan, window: &WindowItem) -> Vec<HostCommand> {
    let tabs = window.flat_tabs();

    plan.groups
        .iter()
        .filter_map(|group| {
            let tab_ids: Vec<i32> = group
                .tab_ids
                .iter()
                .filter_map(|&position| usize::try_from(position).ok())
                .filter_map(|position| tabs.get(position).map(|tab| tab.id))
                .collect();
            if tab_ids.is_empty() {
                log::debug!("skipping planned group {:?}: no known tabs", group.title);
                return None;
            }
            Some(HostCommand::CreateGroup {
                tab_ids,
                title: group.title.clone(),
            })
        })
        .collect()
}
