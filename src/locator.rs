/// Finding nodes and their positions in the tree
use crate::error::TreeError;
use crate::tree::{NodeId, Tree, TreeItem};

/// Find the node carrying `id`, searching windows, groups and tabs alike
pub fn find_by_id(tree: &Tree, id: NodeId) -> Result<&TreeItem, TreeError> {
    fn find(item: &TreeItem, id: NodeId) -> Option<&TreeItem> {
        if item.id() == id {
            return Some(item);
        }
        item.children().iter().find_map(|child| find(child, id))
    }

    tree.items()
        .iter()
        .find_map(|item| find(item, id))
        .ok_or(TreeError::NotFound(id))
}

/// Position of the child taken at each level on the way from a window to `id`.
///
/// `[w]` is a window, `[w, i]` a direct child of a window and `[w, g, i]`
/// a tab inside a group.
pub fn index_path(tree: &Tree, id: NodeId) -> Result<Vec<usize>, TreeError> {
    fn search(items: &[TreeItem], id: NodeId, path: &mut Vec<usize>) -> bool {
        for (index, item) in items.iter().enumerate() {
            path.push(index);
            if item.id() == id || search(item.children(), id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    if search(tree.items(), id, &mut path) {
        Ok(path)
    } else {
        Err(TreeError::NotFound(id))
    }
}

/// The node an index path points at
pub fn node_at<'a>(tree: &'a Tree, path: &[usize]) -> Result<&'a TreeItem, TreeError> {
    let (&first, rest) = path
        .split_first()
        .ok_or_else(|| TreeError::invalid_path(path, "path is empty"))?;

    let mut node = tree
        .items()
        .get(first)
        .ok_or_else(|| TreeError::invalid_path(path, "index out of range"))?;
    for &index in rest {
        node = node
            .children()
            .get(index)
            .ok_or_else(|| TreeError::invalid_path(path, "index out of range"))?;
    }
    Ok(node)
}

/// Convert an index path into the offset the browser uses for the same
/// position, i.e. the index in the window's flat tab list.
pub fn linear_tab_offset(path: &[usize], tree: &Tree) -> Result<usize, TreeError> {
    if path.len() < 2 {
        return Err(TreeError::invalid_path(
            path,
            "needs a window and a child index",
        ));
    }

    let window = match tree.items().get(path[0]) {
        Some(TreeItem::Window(window)) => window,
        _ => return Err(TreeError::invalid_path(path, "first index is not a window")),
    };
    let before = window
        .children
        .get(..path[1])
        .ok_or_else(|| TreeError::invalid_path(path, "index out of range"))?;

    let offset: usize = before
        .iter()
        .map(|sibling| match sibling {
            TreeItem::Tab(_) => 1,
            TreeItem::Group(group) => group.children.len(),
            TreeItem::Window(_) => 0,
        })
        .sum();

    match path.get(2) {
        Some(within_group) => Ok(offset + within_group),
        None => Ok(offset),
    }
}
