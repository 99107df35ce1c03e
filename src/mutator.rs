/// Structural edits that build a new tree from an old one
use crate::error::TreeError;
use crate::locator::{index_path, node_at};
use crate::tree::{NodeId, Tree, TreeItem};

/// Remove the node at `path`
pub fn delete_at_path(tree: &Tree, path: &[usize]) -> Result<Tree, TreeError> {
    Ok(Tree::new(delete_in(tree.items(), path, path)?))
}

/// Insert `node` before the child currently at the last index of `path`.
///
/// An index equal to the number of siblings appends. Fails when the
/// parent at that depth cannot hold a node of this kind.
pub fn insert_at_path(tree: &Tree, path: &[usize], node: TreeItem) -> Result<Tree, TreeError> {
    match path.len() {
        0 => return Err(TreeError::invalid_path(path, "path is empty")),
        1 if !matches!(node, TreeItem::Window(_)) => {
            return Err(TreeError::invalid_path(path, "only windows sit at the root"));
        }
        1 => {}
        _ => {
            let parent = node_at(tree, &path[..path.len() - 1])?;
            if !parent.can_contain(&node) {
                return Err(TreeError::invalid_path(path, "parent cannot hold this node"));
            }
        }
    }
    Ok(Tree::new(insert_in(tree.items(), path, node, path)?))
}

/// Move the element at `from` so that it ends up at `to`
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if from >= moved.len() || to >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}

/// Move `active` to where `over` is, as happens while dragging one node over another.
///
/// Siblings are reordered. A node dropped on a container that can hold it
/// (a tab on a group, a tab or group on a window) becomes that container's
/// first child. Otherwise the node is taken out of its parent and put in
/// front of `over` in `over`'s parent.
///
/// Returns the tree unchanged when `active` and `over` are the same node,
/// when one is the parent of the other, or when the result would not be
/// a well formed tree.
pub fn move_item(tree: &Tree, active: NodeId, over: NodeId) -> Result<Tree, TreeError> {
    let active_path = index_path(tree, active)?;
    let over_path = index_path(tree, over)?;

    if active == over
        || is_parent_path(&over_path, &active_path)
        || is_parent_path(&active_path, &over_path)
    {
        return Ok(tree.clone());
    }

    let moved = Tree::new(move_in(tree.items(), &active_path, &over_path)?);
    if !moved.is_well_formed() {
        log::debug!("skipping move of {} over {}: result is not a valid tree", active, over);
        return Ok(tree.clone());
    }
    Ok(moved)
}

fn is_parent_path(parent: &[usize], child: &[usize]) -> bool {
    child.len() == parent.len() + 1 && child.starts_with(parent)
}

fn move_in(
    items: &[TreeItem],
    active: &[usize],
    over: &[usize],
) -> Result<Vec<TreeItem>, TreeError> {
    let (&a, active_rest) = active
        .split_first()
        .ok_or_else(|| TreeError::invalid_path(active, "path is empty"))?;
    let (&o, over_rest) = over
        .split_first()
        .ok_or_else(|| TreeError::invalid_path(over, "path is empty"))?;

    if a == o {
        if active_rest.is_empty() || over_rest.is_empty() {
            // same node, or an ancestor of the other
            return Ok(items.to_vec());
        }
        let mut out = items.to_vec();
        let parent = items
            .get(a)
            .ok_or_else(|| TreeError::invalid_path(active, "index out of range"))?;
        out[a] = parent.with_children(move_in(parent.children(), active_rest, over_rest)?);
        return Ok(out);
    }

    let over_item = items
        .get(o)
        .ok_or_else(|| TreeError::invalid_path(over, "index out of range"))?;
    let active_item = item_at(items, active)?.clone();
    let over_takes_active = over_rest.is_empty() && over_item.can_contain(&active_item);

    if active_rest.is_empty() && over_rest.is_empty() && !over_takes_active {
        return Ok(array_move(items, a, o));
    }

    let mut out = Vec::with_capacity(items.len() + 1);
    for (i, item) in items.iter().enumerate() {
        if i == a {
            if active_rest.is_empty() {
                continue;
            }
            out.push(item.with_children(delete_in(item.children(), active_rest, active)?));
        } else if i == o {
            if over_takes_active {
                let mut children = item.children().to_vec();
                children.insert(0, active_item.clone());
                out.push(item.with_children(children));
            } else if over_rest.is_empty() {
                out.push(active_item.clone());
                out.push(item.clone());
            } else {
                out.push(item.with_children(insert_in(
                    item.children(),
                    over_rest,
                    active_item.clone(),
                    over,
                )?));
            }
        } else {
            out.push(item.clone());
        }
    }
    Ok(out)
}

fn item_at<'a>(items: &'a [TreeItem], path: &[usize]) -> Result<&'a TreeItem, TreeError> {
    let (&first, rest) = path
        .split_first()
        .ok_or_else(|| TreeError::invalid_path(path, "path is empty"))?;
    let item = items
        .get(first)
        .ok_or_else(|| TreeError::invalid_path(path, "index out of range"))?;
    if rest.is_empty() {
        Ok(item)
    } else {
        item_at(item.children(), rest)
    }
}

// `full` is the caller's whole path, kept for error reporting
fn delete_in(
    items: &[TreeItem],
    path: &[usize],
    full: &[usize],
) -> Result<Vec<TreeItem>, TreeError> {
    let (&index, rest) = path
        .split_first()
        .ok_or_else(|| TreeError::invalid_path(full, "path is empty"))?;
    if index >= items.len() {
        return Err(TreeError::invalid_path(full, "index out of range"));
    }

    let mut out = items.to_vec();
    if rest.is_empty() {
        out.remove(index);
    } else {
        out[index] = items[index].with_children(delete_in(items[index].children(), rest, full)?);
    }
    Ok(out)
}

fn insert_in(
    items: &[TreeItem],
    path: &[usize],
    node: TreeItem,
    full: &[usize],
) -> Result<Vec<TreeItem>, TreeError> {
    let (&index, rest) = path
        .split_first()
        .ok_or_else(|| TreeError::invalid_path(full, "path is empty"))?;

    let mut out = items.to_vec();
    if rest.is_empty() {
        if index > items.len() {
            return Err(TreeError::invalid_path(full, "index out of range"));
        }
        out.insert(index, node);
    } else {
        let parent = items
            .get(index)
            .ok_or_else(|| TreeError::invalid_path(full, "index out of range"))?;
        out[index] = parent.with_children(insert_in(parent.children(), rest, node, full)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::find_by_id;
    use crate::projector::project;
    use crate::tab_data::{GroupColor, HostGroup, HostTab, HostWindow};
    use crate::tree::{TabItem, WindowItem};

    fn host_tab(id: i32, window_id: i32, group_id: i32) -> HostTab {
        HostTab {
            group_id,
            ..HostTab::new(id, window_id, format!("https://example.com/{}", id), String::new())
        }
    }

    fn host_group(id: i32, window_id: i32) -> HostGroup {
        HostGroup {
            id,
            title: format!("Group {}", id),
            color: GroupColor::Cyan,
            window_id,
        }
    }

    /// W1: [T1, G100{T2, T3}, T4], W2: [G200{T5}, T6]
    fn sample_tree() -> Tree {
        let windows = vec![
            HostWindow {
                id: 1,
                incognito: false,
                focused: true,
                tabs: vec![
                    host_tab(1, 1, -1),
                    host_tab(2, 1, 100),
                    host_tab(3, 1, 100),
                    host_tab(4, 1, -1),
                ],
            },
            HostWindow {
                id: 2,
                incognito: false,
                focused: false,
                tabs: vec![host_tab(5, 2, 200), host_tab(6, 2, -1)],
            },
        ];
        project(&windows, &[host_group(100, 1), host_group(200, 2)])
    }

    fn ids(items: &[TreeItem]) -> Vec<NodeId> {
        items.iter().map(TreeItem::id).collect()
    }

    fn children_of(tree: &Tree, id: NodeId) -> Vec<NodeId> {
        ids(find_by_id(tree, id).unwrap().children())
    }

    fn loose_tab(id: i32) -> TreeItem {
        TreeItem::Tab(TabItem::from_host(&host_tab(id, 1, -1)))
    }

    #[test]
    fn test_array_move() {
        assert_eq!(array_move(&[1, 2, 3, 4], 3, 0), vec![4, 1, 2, 3]);
        assert_eq!(array_move(&[1, 2, 3, 4], 0, 2), vec![2, 3, 1, 4]);
        assert_eq!(array_move(&[1, 2, 3], 5, 0), vec![1, 2, 3]);
    }

    #[test]
    fn test_delete_at_path() {
        let tree = sample_tree();

        let tree = delete_at_path(&tree, &[0, 1, 0]).unwrap();
        assert_eq!(children_of(&tree, NodeId::Group(100)), vec![NodeId::Tab(3)]);

        let tree = delete_at_path(&tree, &[1]).unwrap();
        assert_eq!(tree.windows().count(), 1);
    }

    #[test]
    fn test_delete_at_path_out_of_range() {
        let tree = sample_tree();

        assert!(matches!(
            delete_at_path(&tree, &[0, 7]),
            Err(TreeError::InvalidPath { .. })
        ));
        assert!(matches!(
            delete_at_path(&tree, &[]),
            Err(TreeError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_insert_at_path_shifts_siblings() {
        let tree = sample_tree();

        let tree = insert_at_path(&tree, &[0, 1], loose_tab(9)).unwrap();
        assert_eq!(
            children_of(&tree, NodeId::Window(1)),
            vec![NodeId::Tab(1), NodeId::Tab(9), NodeId::Group(100), NodeId::Tab(4)]
        );

        let tree = insert_at_path(&tree, &[0, 2, 2], loose_tab(10)).unwrap();
        assert_eq!(
            children_of(&tree, NodeId::Group(100)),
            vec![NodeId::Tab(2), NodeId::Tab(3), NodeId::Tab(10)]
        );
    }

    #[test]
    fn test_insert_at_path_checks_parent_kind() {
        let tree = sample_tree();
        let window = TreeItem::Window(WindowItem {
            id: 3,
            incognito: false,
            focused: false,
            children: vec![],
        });

        assert!(insert_at_path(&tree, &[0, 0], window.clone()).is_err());
        assert!(insert_at_path(&tree, &[0], loose_tab(9)).is_err());
        assert!(insert_at_path(&tree, &[2], window).is_ok());
    }

    #[test]
    fn test_move_same_node_is_noop() {
        let tree = sample_tree();

        assert_eq!(move_item(&tree, NodeId::Tab(2), NodeId::Tab(2)).unwrap(), tree);
    }

    #[test]
    fn test_move_reorders_siblings() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Tab(4), NodeId::Tab(1)).unwrap();

        assert_eq!(
            children_of(&moved, NodeId::Window(1)),
            vec![NodeId::Tab(4), NodeId::Tab(1), NodeId::Group(100)]
        );
    }

    #[test]
    fn test_move_reorders_inside_group() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Tab(3), NodeId::Tab(2)).unwrap();

        assert_eq!(
            children_of(&moved, NodeId::Group(100)),
            vec![NodeId::Tab(3), NodeId::Tab(2)]
        );
    }

    #[test]
    fn test_move_tab_over_group_joins_group_first() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Tab(1), NodeId::Group(100)).unwrap();

        assert_eq!(
            children_of(&moved, NodeId::Window(1)),
            vec![NodeId::Group(100), NodeId::Tab(4)]
        );
        assert_eq!(
            children_of(&moved, NodeId::Group(100)),
            vec![NodeId::Tab(1), NodeId::Tab(2), NodeId::Tab(3)]
        );
    }

    #[test]
    fn test_move_tab_out_of_group() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Tab(3), NodeId::Tab(4)).unwrap();

        assert_eq!(
            children_of(&moved, NodeId::Window(1)),
            vec![NodeId::Tab(1), NodeId::Group(100), NodeId::Tab(3), NodeId::Tab(4)]
        );
        assert_eq!(children_of(&moved, NodeId::Group(100)), vec![NodeId::Tab(2)]);
    }

    #[test]
    fn test_move_tab_across_windows() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Tab(1), NodeId::Tab(6)).unwrap();

        assert_eq!(
            children_of(&moved, NodeId::Window(1)),
            vec![NodeId::Group(100), NodeId::Tab(4)]
        );
        assert_eq!(
            children_of(&moved, NodeId::Window(2)),
            vec![NodeId::Group(200), NodeId::Tab(1), NodeId::Tab(6)]
        );
    }

    #[test]
    fn test_move_tab_into_other_windows_group() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Tab(4), NodeId::Tab(5)).unwrap();

        assert_eq!(
            children_of(&moved, NodeId::Group(200)),
            vec![NodeId::Tab(4), NodeId::Tab(5)]
        );
    }

    #[test]
    fn test_move_tab_onto_other_window_goes_first() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Tab(4), NodeId::Window(2)).unwrap();

        assert_eq!(
            children_of(&moved, NodeId::Window(2)),
            vec![NodeId::Tab(4), NodeId::Group(200), NodeId::Tab(6)]
        );
    }

    #[test]
    fn test_move_onto_own_parent_is_noop() {
        let tree = sample_tree();

        assert_eq!(move_item(&tree, NodeId::Tab(2), NodeId::Group(100)).unwrap(), tree);
        assert_eq!(move_item(&tree, NodeId::Tab(1), NodeId::Window(1)).unwrap(), tree);
        assert_eq!(move_item(&tree, NodeId::Group(100), NodeId::Tab(2)).unwrap(), tree);
    }

    #[test]
    fn test_move_groups_reorder_instead_of_nesting() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Group(200), NodeId::Tab(6)).unwrap();
        assert_eq!(
            children_of(&moved, NodeId::Window(2)),
            vec![NodeId::Tab(6), NodeId::Group(200)]
        );

        // a group dropped on a tab inside another group would nest groups
        let moved = move_item(&tree, NodeId::Group(200), NodeId::Tab(3)).unwrap();
        assert_eq!(moved, tree);
    }

    #[test]
    fn test_move_group_to_other_window() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Group(100), NodeId::Tab(6)).unwrap();

        assert_eq!(
            children_of(&moved, NodeId::Window(2)),
            vec![NodeId::Group(200), NodeId::Group(100), NodeId::Tab(6)]
        );
        assert_eq!(
            children_of(&moved, NodeId::Group(100)),
            vec![NodeId::Tab(2), NodeId::Tab(3)]
        );
    }

    #[test]
    fn test_move_windows_reorders_root() {
        let tree = sample_tree();

        let moved = move_item(&tree, NodeId::Window(2), NodeId::Window(1)).unwrap();

        let order: Vec<i32> = moved.windows().map(|w| w.id).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_move_window_over_tab_is_skipped() {
        let tree = sample_tree();

        assert_eq!(move_item(&tree, NodeId::Window(1), NodeId::Tab(6)).unwrap(), tree);
    }

    #[test]
    fn test_move_unknown_id() {
        let tree = sample_tree();

        assert_eq!(
            move_item(&tree, NodeId::Tab(42), NodeId::Tab(1)),
            Err(TreeError::NotFound(NodeId::Tab(42)))
        );
    }
}
