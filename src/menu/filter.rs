use super::tree::{MenuItem, sort_siblings};

/// Dot-notation grammar: a granted permission matches a required one when it
/// is equal, is the universal `*`, or is a `prefix.*` wildcard covering it.
pub fn permission_grants(granted: &str, required: &str) -> bool {
    if granted == "*" {
        return true;
    }
    if let Some(prefix) = granted.strip_suffix(".*") {
        return required
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'));
    }
    granted == required
}

/// Legacy slash-delimited grammar: a granted path grants a node when it is a
/// path prefix of the node's URL (or id). Kept as an independent grammar,
/// OR-composed with the dot notation.
pub fn path_grants(granted: &str, path: &str) -> bool {
    if !granted.contains('/') {
        return false;
    }
    let granted = granted.trim_end_matches('/');
    path.strip_prefix(granted)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn node_accessible(item: &MenuItem, permissions: &[String]) -> bool {
    let Some(required) = item.permission.as_deref() else {
        return true;
    };
    permissions.iter().any(|granted| {
        permission_grants(granted, required)
            || item
                .url
                .as_deref()
                .is_some_and(|url| path_grants(granted, url))
            || path_grants(granted, &item.id)
    })
}

/// Prune the tree to what the permission set allows. Pure function: children
/// are filtered before their parent, a node with surviving children is always
/// kept, and a node without them survives only when it is navigable and its
/// own permission outcome allows it. Inactive nodes are dropped outright.
/// Siblings are re-sorted at every level on the way out.
pub fn filter_menu(items: &[MenuItem], permissions: &[String]) -> Vec<MenuItem> {
    let mut kept: Vec<MenuItem> = items
        .iter()
        .filter(|item| item.active)
        .filter_map(|item| {
            let children = filter_menu(&item.children, permissions);
            let keep = if !children.is_empty() {
                true
            } else {
                item.url.is_some() && node_accessible(item, permissions)
            };
            keep.then(|| {
                let mut item = item.clone();
                item.children = children;
                item
            })
        })
        .collect();
    sort_siblings(&mut kept);
    kept
}
