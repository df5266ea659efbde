//! Parent/child links between AST nodes.
//!
//! Links are stored on both sides: the parent holds an ordered [`CParent`]
//! child list and every linked child holds a [`CChild`] naming its parent.
//! The functions here are the only way to change either side, and they always
//! update both together, so an entity appears in a parent's child list iff its
//! `CChild` names that parent.
//!
//! A parent without children holds no `CParent`; an unlinked node holds no
//! `CChild`.

use smallvec::SmallVec;

use crate::{AstStore, Component, Id};

/// Ordered children of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CParent {
    children: SmallVec<[Id; 4]>,
}

impl CParent {
    pub fn children(&self) -> &[Id] {
        &self.children
    }
}

impl Component for CParent {
    const MANAGED: bool = true;
}

/// Parent of a linked node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CChild {
    parent: Id,
}

impl CChild {
    pub fn parent(&self) -> Id {
        self.parent
    }
}

impl Component for CChild {
    const MANAGED: bool = true;
}

/// Append `child` to the children of `parent`.
///
/// `child` must not already have a parent; move linked nodes with
/// [`transfer_children`].
pub fn add_child(ast: &mut AstStore, parent: Id, child: Id) {
    add_children(ast, parent, &[child]);
}

/// Append `children`, in order, to the children of `parent`.
pub fn add_children(ast: &mut AstStore, parent: Id, children: &[Id]) {
    assert!(ast.is_valid(parent), "stale or invalid parent {parent:?}");
    for &child in children {
        assert!(child != parent, "{child:?} cannot be its own parent");
        assert!(
            find_ancestor(ast, parent, |_, ancestor| ancestor == child).is_none(),
            "linking {child:?} under its own descendant {parent:?}"
        );
        if let Some(link) = ast.try_get::<CChild>(child) {
            panic!(
                "{child:?} is already linked to {:?}; use transfer_children",
                link.parent
            );
        }
        ast.insert_link(child, CChild { parent });
    }

    if let Some(list) = ast.link_mut::<CParent>(parent) {
        list.children.extend_from_slice(children);
    } else if !children.is_empty() {
        ast.insert_link(
            parent,
            CParent {
                children: SmallVec::from_slice(children),
            },
        );
    }
}

/// Unlink `child` from its parent. Returns the former parent.
pub fn remove_child(ast: &mut AstStore, child: Id) -> Option<Id> {
    let parent = ast.remove_link::<CChild>(child)?.parent;
    let now_empty = ast.link_mut::<CParent>(parent).is_some_and(|list| {
        list.children.retain(|id| *id != child);
        list.children.is_empty()
    });
    if now_empty {
        ast.remove_link::<CParent>(parent);
    }
    Some(parent)
}

/// Unlink every node in `children` from whatever parent it has.
pub fn remove_children(ast: &mut AstStore, children: &[Id]) {
    for &child in children {
        remove_child(ast, child);
    }
}

/// Unlink every child of `parent`.
pub fn remove_all_children(ast: &mut AstStore, parent: Id) {
    if let Some(list) = ast.remove_link::<CParent>(parent) {
        for child in list.children {
            ast.remove_link::<CChild>(child);
        }
    }
}

/// Move `children` under `destination`, unlinking them from their current parents.
pub fn transfer_children(ast: &mut AstStore, children: &[Id], destination: Id) {
    remove_children(ast, children);
    add_children(ast, destination, children);
}

/// Immediate children of `id` in insertion order.
pub fn children(ast: &AstStore, id: Id) -> &[Id] {
    ast.try_get::<CParent>(id)
        .map(CParent::children)
        .unwrap_or_default()
}

pub fn parent(ast: &AstStore, id: Id) -> Option<Id> {
    ast.try_get::<CChild>(id).map(CChild::parent)
}

/// Nearest ancestor of `id` for which `predicate` holds.
pub fn find_ancestor(
    ast: &AstStore,
    id: Id,
    predicate: impl Fn(&AstStore, Id) -> bool,
) -> Option<Id> {
    let mut current = parent(ast, id);
    while let Some(ancestor) = current {
        if predicate(ast, ancestor) {
            return Some(ancestor);
        }
        current = parent(ast, ancestor);
    }
    None
}

/// Every node below `root` down to `max_depth` levels, level by level.
///
/// `root` itself is depth 0 and is not included. Within a level, nodes keep
/// the child order of their parents. A module's functions live at most two
/// levels down (module, type, function), so `descendants(ast, module, 2)`
/// collects them without entering statement bodies.
pub fn descendants(ast: &AstStore, root: Id, max_depth: usize) -> Vec<Id> {
    let mut collected = Vec::new();
    let mut level: Vec<Id> = vec![root];
    let mut depth = 0;
    while !level.is_empty() && depth < max_depth {
        let next: Vec<Id> = level
            .iter()
            .flat_map(|&id| children(ast, id).iter().copied())
            .collect();
        collected.extend_from_slice(&next);
        level = next;
        depth += 1;
    }
    collected
}

/// Every node below `root`, level by level.
pub fn all_descendants(ast: &AstStore, root: Id) -> Vec<Id> {
    descendants(ast, root, usize::MAX)
}

/// Unlink `root` from its parent and destroy it with all its descendants.
pub fn destroy_subtree(ast: &mut AstStore, root: Id) {
    remove_child(ast, root);
    let mut nodes = all_descendants(ast, root);
    nodes.push(root);
    for &node in &nodes {
        remove_all_children(ast, node);
    }
    for node in nodes {
        ast.destroy(node);
    }
}
