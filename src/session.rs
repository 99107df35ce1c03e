/// Session context: the host, the settings and the drag driver, owned together
/// by whoever renders the tree. Replaces process-wide listener state.
use std::collections::HashSet;

use crate::driver::DragDriver;
use crate::error::TreeError;
use crate::host::{ChangeEvent, Host, HostCommand};
use crate::operations::{
    duplicate_tab_ids, grouping_commands, grouping_request, is_tab_matched, sort_window_commands,
    window_tab_ids, GroupingPlan, TabSummary,
};
use crate::projector::project_snapshot;
use crate::settings::Settings;
use crate::tab_data::HostSnapshot;
use crate::tree::{NodeId, Tree, WindowItem};

pub struct Session<H: Host> {
    host: H,
    settings: Settings,
    driver: DragDriver,
    listening: bool,
}

impl<H: Host> Session<H> {
    pub fn new(host: H, settings: Settings) -> Self {
        Session {
            host,
            settings,
            driver: DragDriver::default(),
            listening: false,
        }
    }

    /// Start reacting to change events. The caller fetches the first snapshot next.
    pub fn init(&mut self) {
        log::info!("session started");
        self.listening = true;
    }

    pub fn teardown(&mut self) {
        log::info!("session stopped");
        self.listening = false;
        self.driver.cancel();
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Whether the event calls for a fresh snapshot
    pub fn on_change(&mut self, event: ChangeEvent) -> bool {
        if !self.listening {
            log::debug!("ignoring {:?}: session not listening", event);
            return false;
        }
        log::debug!("browser changed: {:?}", event);
        true
    }

    pub fn apply_snapshot(&mut self, snapshot: &HostSnapshot) {
        self.driver.replace_canonical(project_snapshot(snapshot));
    }

    pub fn tree(&self) -> &Tree {
        self.driver.tree()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn visible_windows(&self) -> Vec<&WindowItem> {
        self.tree()
            .windows()
            .filter(|window| self.settings.is_window_visible(window))
            .collect()
    }

    pub fn matching_tabs(&self, query: &str) -> HashSet<i32> {
        self.visible_windows()
            .into_iter()
            .flat_map(|window| window.flat_tabs())
            .filter(|tab| is_tab_matched(tab, query))
            .map(|tab| tab.id)
            .collect()
    }

    pub fn is_dragging(&self) -> bool {
        self.driver.is_dragging()
    }

    pub fn dragged(&self) -> Option<NodeId> {
        self.driver.active()
    }

    pub fn drag_start(&mut self, active: NodeId) -> bool {
        match self.driver.drag_start(active) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("cannot drag {}: {}", active, e);
                false
            }
        }
    }

    pub fn drag_over(&mut self, over: NodeId) -> bool {
        self.driver.drag_over(over)
    }

    /// Finish the drag and send the resulting commands. Returns how many were sent.
    pub fn drop_on(&mut self, over: Option<NodeId>) -> usize {
        let commands = self.driver.drop_on(over);
        self.dispatch_all(commands)
    }

    pub fn cancel_drag(&mut self) {
        self.driver.cancel();
    }

    /// Close tabs whose URL is already open elsewhere
    pub fn deduplicate(&self) -> usize {
        let tab_ids = duplicate_tab_ids(self.driver.canonical());
        if tab_ids.is_empty() {
            log::info!("no duplicate tabs");
            return 0;
        }
        self.dispatch_all(vec![HostCommand::RemoveTabs { tab_ids }])
    }

    pub fn ungroup_window(&self, window_id: i32) -> Result<usize, TreeError> {
        let tab_ids = window_tab_ids(self.window(window_id)?);
        Ok(self.dispatch_all(vec![HostCommand::UngroupTabs { tab_ids }]))
    }

    pub fn sort_window(&self, window_id: i32) -> Result<usize, TreeError> {
        let commands = sort_window_commands(self.window(window_id)?);
        Ok(self.dispatch_all(commands))
    }

    /// Tabs of the window as sent to the grouping service
    pub fn grouping_request(&self, window_id: i32) -> Result<Vec<TabSummary>, TreeError> {
        Ok(grouping_request(self.window(window_id)?))
    }

    pub fn apply_grouping_plan(
        &self,
        window_id: i32,
        plan: &GroupingPlan,
    ) -> Result<usize, TreeError> {
        let commands = grouping_commands(plan, self.window(window_id)?);
        Ok(self.dispatch_all(commands))
    }

    fn window(&self, window_id: i32) -> Result<&WindowItem, TreeError> {
        self.driver
            .canonical()
            .window(window_id)
            .ok_or(TreeError::NotFound(NodeId::Window(window_id)))
    }

    fn dispatch_all(&self, commands: Vec<HostCommand>) -> usize {
        let count = commands.len();
        for command in commands {
            log::debug!("dispatching {}", command.name());
            self.host.dispatch(command);
        }
        count
    }
}
