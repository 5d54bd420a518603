//! Navigation tree construction from vault-relative file paths.

use crate::models::NavNode;

/// Build a folder-shaped forest from a flat list of paths.
///
/// Backslashes are treated as separators. Siblings keep the order in which
/// they were first seen; nothing is sorted. Folder nodes carry no `path`,
/// file nodes carry the input string they came from.
///
/// ```
/// use nodig_core::build_navigation_tree;
///
/// let tree = build_navigation_tree(["a.md", "b/c.md"]);
/// assert_eq!(tree[0].path.as_deref(), Some("a.md"));
/// assert_eq!(tree[1].name, "b");
/// assert_eq!(tree[1].children[0].path.as_deref(), Some("b/c.md"));
/// ```
pub fn build_navigation_tree<I, S>(paths: I) -> Vec<NavNode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut roots = Vec::new();
    for path in paths {
        insert_path(&mut roots, path.as_ref());
    }
    roots
}

fn insert_path(roots: &mut Vec<NavNode>, original: &str) {
    let normalized = original.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    let Some((last, folders)) = segments.split_last() else {
        tracing::debug!("Skipping empty navigation path {:?}", original);
        return;
    };

    let mut level = roots;
    for folder in folders {
        let idx = child_index(level, folder);
        level = &mut level[idx].children;
    }

    let idx = child_index(level, last);
    let leaf = &mut level[idx];
    // A folder that was seen first keeps its children and gains the file path
    if leaf.path.is_none() {
        leaf.path = Some(original.to_string());
    }
}

/// Index of the sibling named `name`, creating a folder node if absent
fn child_index(siblings: &mut Vec<NavNode>, name: &str) -> usize {
    match siblings.iter().position(|n| n.name == name) {
        Some(idx) => idx,
        None => {
            siblings.push(NavNode::folder(name));
            siblings.len() - 1
        }
    }
}
