//! Object arena and name-path resolution

use std::collections::HashMap;

use crate::object::{Coord, ObjId, Object, TreeSnapshot};

/// Owns every live object; parent/child links are stored as IDs
#[derive(Debug, Default)]
pub struct ObjectTree {
    objects: HashMap<ObjId, Object>,
    next_id: u32,
}

impl ObjectTree {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            next_id: 1,
        }
    }

    /// Create an object and append it to its parent's children
    pub fn insert(&mut self, class: &str, parent: Option<ObjId>, default_size: (Coord, Coord)) -> ObjId {
        let id = ObjId::new(self.next_id);
        self.next_id += 1;

        self.objects.insert(id, Object::new(id, class, parent, default_size));
        if let Some(parent) = parent.and_then(|p| self.objects.get_mut(&p)) {
            parent.children.push(id);
        }
        id
    }

    /// Look up an object
    #[must_use]
    pub fn get(&self, id: ObjId) -> Option<&Object> {
        self.objects.get(&id)
    }

    /// Look up an object for mutation
    pub fn get_mut(&mut self, id: ObjId) -> Option<&mut Object> {
        self.objects.get_mut(&id)
    }

    /// Whether `id` is live
    #[must_use]
    pub fn contains(&self, id: ObjId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Number of live objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the tree holds no objects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Delete an object with all its descendants and unlink it from its parent
    ///
    /// Returns the number of objects removed.
    pub fn remove(&mut self, id: ObjId) -> usize {
        let Some(parent) = self.objects.get(&id).map(Object::parent) else {
            return 0;
        };
        if let Some(parent) = parent.and_then(|p| self.objects.get_mut(&p)) {
            parent.children.retain(|child| *child != id);
        }
        self.remove_subtree(id)
    }

    /// Delete all children of an object, keeping the object itself
    pub fn clear_children(&mut self, id: ObjId) -> usize {
        let children = self
            .objects
            .get_mut(&id)
            .map(|obj| std::mem::take(&mut obj.children))
            .unwrap_or_default();
        children.into_iter().map(|child| self.remove_subtree(child)).sum()
    }

    fn remove_subtree(&mut self, id: ObjId) -> usize {
        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(obj) = self.objects.remove(&next) {
                stack.extend(obj.children);
                removed += 1;
            }
        }
        removed
    }

    /// Drop every object
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Name used for path lookups: the explicit name, or `<class>_<n>` where
    /// `n` counts earlier unnamed siblings of the same class
    #[must_use]
    pub fn resolved_name(&self, id: ObjId) -> Option<String> {
        let obj = self.objects.get(&id)?;
        if let Some(name) = &obj.name {
            return Some(name.clone());
        }

        let index = obj
            .parent
            .and_then(|p| self.objects.get(&p))
            .map_or(0, |parent| {
                parent
                    .children
                    .iter()
                    .take_while(|sibling| **sibling != id)
                    .filter_map(|sibling| self.objects.get(sibling))
                    .filter(|sibling| sibling.name.is_none() && sibling.class == obj.class)
                    .count()
            });

        Some(format!("{}_{}", obj.class, index))
    }

    /// Resolve a `/`-separated path of direct-child names below `parent`
    ///
    /// An empty path resolves to `parent` itself.
    #[must_use]
    pub fn child_by_name(&self, parent: ObjId, path: &str) -> Option<ObjId> {
        let mut current = parent;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self
                .objects
                .get(&current)?
                .children
                .iter()
                .copied()
                .find(|child| self.resolved_name(*child).as_deref() == Some(segment))?;
        }
        self.contains(current).then_some(current)
    }

    /// Serializable dump of a subtree
    #[must_use]
    pub fn snapshot(&self, id: ObjId) -> Option<TreeSnapshot> {
        let obj = self.objects.get(&id)?;
        Some(TreeSnapshot {
            name: self.resolved_name(id)?,
            class: obj.class.clone(),
            area: obj.area,
            layout_positioned: obj.layout_positioned,
            align: obj.align.code(),
            text: obj.text.clone(),
            children: obj
                .children
                .iter()
                .filter_map(|child| self.snapshot(*child))
                .collect(),
        })
    }
}
