/// Drag-and-drop reconciliation.
///
/// The driver keeps the canonical tree (the last browser snapshot) and,
/// while a drag is running, an optimistic copy that follows the pointer
/// plus the copy taken when the drag started. Only the drop produces
/// browser commands.
use crate::error::TreeError;
use crate::host::HostCommand;
use crate::locator::{index_path, linear_tab_offset, node_at};
use crate::mutator::move_item;
use crate::tree::{NodeId, Tree, TreeItem};

#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub active: NodeId,
    /// Tree at drag start, restored on cancel
    pub rollback: Tree,
    pub optimistic: Tree,
    /// Last hover target that went through `move_item`
    pub last_over: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragGesture),
}

#[derive(Debug, Clone, Default)]
pub struct DragDriver {
    canonical: Tree,
    phase: DragPhase,
}

impl DragDriver {
    pub fn new(canonical: Tree) -> Self {
        DragDriver {
            canonical,
            phase: DragPhase::Idle,
        }
    }

    pub fn canonical(&self) -> &Tree {
        &self.canonical
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// The tree to render: the optimistic one while dragging
    pub fn tree(&self) -> &Tree {
        match &self.phase {
            DragPhase::Idle => &self.canonical,
            DragPhase::Dragging(gesture) => &gesture.optimistic,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn active(&self) -> Option<NodeId> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging(gesture) => Some(gesture.active),
        }
    }

    /// A fresh snapshot always wins, including over a drag in progress
    pub fn replace_canonical(&mut self, tree: Tree) {
        if let DragPhase::Dragging(gesture) = &mut self.phase {
            log::debug!("snapshot arrived while dragging {}", gesture.active);
            gesture.rollback = tree.clone();
            gesture.optimistic = tree.clone();
            gesture.last_over = None;
        }
        self.canonical = tree;
    }

    pub fn drag_start(&mut self, active: NodeId) -> Result<(), TreeError> {
        index_path(&self.canonical, active)?;

        if self.is_dragging() {
            log::warn!("drag of {} started while another drag was running", active);
        }
        self.phase = DragPhase::Dragging(DragGesture {
            active,
            rollback: self.canonical.clone(),
            optimistic: self.canonical.clone(),
            last_over: None,
        });
        Ok(())
    }

    /// Follow the pointer over `over`. Returns true when the optimistic
    /// tree changed.
    ///
    /// The browser repeats `dragover` while the pointer rests on a row, so
    /// only a change of target moves anything.
    pub fn drag_over(&mut self, over: NodeId) -> bool {
        let DragPhase::Dragging(gesture) = &mut self.phase else {
            return false;
        };
        if gesture.last_over == Some(over) {
            return false;
        }
        gesture.last_over = Some(over);
        if gesture.active == over {
            return false;
        }

        match move_item(&gesture.optimistic, gesture.active, over) {
            Ok(moved) => {
                if moved == gesture.optimistic {
                    return false;
                }
                gesture.optimistic = moved;
                true
            }
            Err(e) => {
                log::debug!("ignoring hover of {} over {}: {}", gesture.active, over, e);
                false
            }
        }
    }

    /// Finish the drag. Returns the commands that carry the move over to
    /// the browser. Dropping over nothing behaves like `cancel`.
    pub fn drop_on(&mut self, over: Option<NodeId>) -> Vec<HostCommand> {
        let DragPhase::Dragging(gesture) = std::mem::take(&mut self.phase) else {
            return Vec::new();
        };
        let Some(over) = over else {
            self.canonical = gesture.rollback;
            return Vec::new();
        };

        let final_tree = if gesture.last_over == Some(over) {
            gesture.optimistic
        } else {
            match move_item(&gesture.optimistic, gesture.active, over) {
                Ok(moved) => moved,
                Err(e) => {
                    log::debug!(
                        "drop of {} over {} kept the hover state: {}",
                        gesture.active,
                        over,
                        e
                    );
                    gesture.optimistic
                }
            }
        };

        let commands = match commit_commands(&gesture.rollback, &final_tree, gesture.active) {
            Ok(commands) => commands,
            Err(e) => {
                log::warn!("could not compute browser commands for {}: {}", gesture.active, e);
                Vec::new()
            }
        };
        self.canonical = final_tree;
        commands
    }

    pub fn cancel(&mut self) {
        if let DragPhase::Dragging(gesture) = std::mem::take(&mut self.phase) {
            log::debug!("drag of {} cancelled", gesture.active);
            self.canonical = gesture.rollback;
        }
    }
}

/// Browser commands that turn `before` into `after` for the node `active`.
///
/// Windows only move locally. A tab is moved to its flat index and then
/// grouped into its enclosing group, or ungrouped. A group is moved to
/// its flat index, naming the window only when it changed.
pub fn commit_commands(
    before: &Tree,
    after: &Tree,
    active: NodeId,
) -> Result<Vec<HostCommand>, TreeError> {
    let path = index_path(after, active)?;
    if placement(before, active).ok() == Some(placement(after, active)?) {
        return Ok(Vec::new());
    }

    let window_id = match node_at(after, &path[..1])? {
        TreeItem::Window(window) => window.id,
        _ => return Err(TreeError::invalid_path(&path, "first index is not a window")),
    };

    match node_at(after, &path)? {
        TreeItem::Window(_) => Ok(Vec::new()),
        TreeItem::Tab(tab) => {
            let index = linear_tab_offset(&path, after)?;
            let mut commands = vec![HostCommand::MoveTab {
                tab_id: tab.id,
                window_id: Some(window_id),
                index,
            }];
            if path.len() == 3 {
                match node_at(after, &path[..2])? {
                    TreeItem::Group(group) => commands.push(HostCommand::GroupTabs {
                        tab_ids: vec![tab.id],
                        group_id: group.id,
                    }),
                    _ => return Err(TreeError::invalid_path(&path, "tab parent is not a group")),
                }
            } else {
                commands.push(HostCommand::UngroupTab { tab_id: tab.id });
            }
            Ok(commands)
        }
        TreeItem::Group(group) => {
            let index = linear_tab_offset(&path, after)?;
            Ok(vec![HostCommand::MoveGroup {
                group_id: group.id,
                window_id: (group.window_id != window_id).then_some(window_id),
                index,
            }])
        }
    }
}

/// Parent and position among siblings
fn placement(tree: &Tree, id: NodeId) -> Result<(Option<NodeId>, usize), TreeError> {
    let path = index_path(tree, id)?;
    let (&index, parent_path) = path
        .split_last()
        .ok_or_else(|| TreeError::invalid_path(&path, "path is empty"))?;
    let parent = if parent_path.is_empty() {
        None
    } else {
        Some(node_at(tree, parent_path)?.id())
    };
    Ok((parent, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::project;
    use crate::tab_data::{GroupColor, HostGroup, HostTab, HostWindow};

    fn host_tab(id: i32, window_id: i32, group_id: i32) -> HostTab {
        HostTab {
            group_id,
            ..HostTab::new(id, window_id, format!("https://example.com/{}", id), String::new())
        }
    }

    fn host_group(id: i32, window_id: i32) -> HostGroup {
        HostGroup {
            id,
            title: "G".to_string(),
            color: GroupColor::Blue,
            window_id,
        }
    }

    /// W1: [T1, G100{T2, T3}], W2: [T4, G200{T5}]
    fn sample_tree() -> Tree {
        let windows = vec![
            HostWindow {
                id: 1,
                incognito: false,
                focused: true,
                tabs: vec![host_tab(1, 1, -1), host_tab(2, 1, 100), host_tab(3, 1, 100)],
            },
            HostWindow {
                id: 2,
                incognito: false,
                focused: false,
                tabs: vec![host_tab(4, 2, -1), host_tab(5, 2, 200)],
            },
        ];
        project(&windows, &[host_group(100, 1), host_group(200, 2)])
    }

    #[test]
    fn test_tab_dropped_on_group_joins_it() {
        let mut driver = DragDriver::new(sample_tree());

        driver.drag_start(NodeId::Tab(1)).unwrap();
        assert!(driver.drag_over(NodeId::Group(100)));
        let commands = driver.drop_on(Some(NodeId::Group(100)));

        assert_eq!(
            commands,
            vec![
                HostCommand::MoveTab {
                    tab_id: 1,
                    window_id: Some(1),
                    index: 0
                },
                HostCommand::GroupTabs {
                    tab_ids: vec![1],
                    group_id: 100
                },
            ]
        );
        assert!(!driver.is_dragging());
        assert_eq!(index_path(driver.tree(), NodeId::Tab(1)).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_drop_without_hover_still_moves() {
        let mut driver = DragDriver::new(sample_tree());

        driver.drag_start(NodeId::Tab(3)).unwrap();
        let commands = driver.drop_on(Some(NodeId::Tab(4)));

        assert_eq!(
            commands,
            vec![
                HostCommand::MoveTab {
                    tab_id: 3,
                    window_id: Some(2),
                    index: 0
                },
                HostCommand::UngroupTab { tab_id: 3 },
            ]
        );
    }

    #[test]
    fn test_group_moved_within_window_omits_window() {
        let mut driver = DragDriver::new(sample_tree());

        driver.drag_start(NodeId::Group(100)).unwrap();
        driver.drag_over(NodeId::Tab(1));
        let commands = driver.drop_on(Some(NodeId::Tab(1)));

        assert_eq!(
            commands,
            vec![HostCommand::MoveGroup {
                group_id: 100,
                window_id: None,
                index: 0
            }]
        );
    }

    #[test]
    fn test_group_moved_to_other_window_names_it() {
        let mut driver = DragDriver::new(sample_tree());

        driver.drag_start(NodeId::Group(100)).unwrap();
        driver.drag_over(NodeId::Group(200));
        let commands = driver.drop_on(Some(NodeId::Group(200)));

        // W2 becomes [T4, G100{T2, T3}, G200{T5}]
        assert_eq!(
            commands,
            vec![HostCommand::MoveGroup {
                group_id: 100,
                window_id: Some(2),
                index: 1
            }]
        );
    }

    #[test]
    fn test_window_reorder_is_local_only() {
        let mut driver = DragDriver::new(sample_tree());

        driver.drag_start(NodeId::Window(2)).unwrap();
        driver.drag_over(NodeId::Window(1));
        let commands = driver.drop_on(Some(NodeId::Window(1)));

        assert!(commands.is_empty());
        let order: Vec<i32> = driver.tree().windows().map(|w| w.id).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_cancel_restores_rollback() {
        let tree = sample_tree();
        let mut driver = DragDriver::new(tree.clone());

        driver.drag_start(NodeId::Tab(1)).unwrap();
        driver.drag_over(NodeId::Tab(4));
        assert_ne!(driver.tree(), &tree);
        driver.cancel();

        assert_eq!(driver.tree(), &tree);
        assert_eq!(driver.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_drop_over_nothing_cancels() {
        let tree = sample_tree();
        let mut driver = DragDriver::new(tree.clone());

        driver.drag_start(NodeId::Tab(1)).unwrap();
        driver.drag_over(NodeId::Tab(5));

        assert!(driver.drop_on(None).is_empty());
        assert_eq!(driver.tree(), &tree);
    }

    #[test]
    fn test_failed_hover_keeps_gesture_alive() {
        let mut driver = DragDriver::new(sample_tree());

        driver.drag_start(NodeId::Tab(1)).unwrap();
        let before = driver.tree().clone();
        assert!(!driver.drag_over(NodeId::Tab(99)));
        assert_eq!(driver.tree(), &before);
        assert!(driver.is_dragging());

        assert!(driver.drag_over(NodeId::Tab(4)));
        assert_eq!(driver.active(), Some(NodeId::Tab(1)));
    }

    #[test]
    fn test_repeated_hover_moves_once() {
        let tree = project(
            &[HostWindow {
                id: 1,
                incognito: false,
                focused: true,
                tabs: vec![host_tab(1, 1, -1), host_tab(2, 1, -1), host_tab(3, 1, -1)],
            }],
            &[],
        );
        let mut driver = DragDriver::new(tree);

        driver.drag_start(NodeId::Tab(3)).unwrap();
        assert!(driver.drag_over(NodeId::Tab(2)));
        assert!(!driver.drag_over(NodeId::Tab(2)));
        assert_eq!(index_path(driver.tree(), NodeId::Tab(3)).unwrap(), vec![0, 1]);

        assert_eq!(
            driver.drop_on(Some(NodeId::Tab(2))),
            vec![
                HostCommand::MoveTab {
                    tab_id: 3,
                    window_id: Some(1),
                    index: 1
                },
                HostCommand::UngroupTab { tab_id: 3 },
            ]
        );
    }

    #[test]
    fn test_hover_over_self_or_parent_is_noop() {
        let mut driver = DragDriver::new(sample_tree());

        driver.drag_start(NodeId::Tab(2)).unwrap();
        assert!(!driver.drag_over(NodeId::Tab(2)));
        assert!(!driver.drag_over(NodeId::Group(100)));
        assert!(driver.drop_on(Some(NodeId::Group(100))).is_empty());
    }

    #[test]
    fn test_drag_start_unknown_node() {
        let mut driver = DragDriver::new(sample_tree());

        assert_eq!(
            driver.drag_start(NodeId::Tab(77)),
            Err(TreeError::NotFound(NodeId::Tab(77)))
        );
        assert!(!driver.is_dragging());
    }

    #[test]
    fn test_snapshot_during_drag_replaces_everything() {
        let mut driver = DragDriver::new(sample_tree());
        driver.drag_start(NodeId::Tab(1)).unwrap();
        driver.drag_over(NodeId::Tab(4));

        let fresh = project(
            &[HostWindow {
                id: 1,
                incognito: false,
                focused: true,
                tabs: vec![host_tab(1, 1, -1)],
            }],
            &[],
        );
        driver.replace_canonical(fresh.clone());

        assert_eq!(driver.tree(), &fresh);
        driver.cancel();
        assert_eq!(driver.tree(), &fresh);
    }

    #[test]
    fn test_idle_events_are_ignored() {
        let tree = sample_tree();
        let mut driver = DragDriver::new(tree.clone());

        assert!(!driver.drag_over(NodeId::Tab(1)));
        assert!(driver.drop_on(Some(NodeId::Tab(1))).is_empty());
        driver.cancel();
        assert_eq!(driver.tree(), &tree);
    }
}
