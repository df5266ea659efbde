//! Typed queries over the component store.
//!
//! A query names its component set as a tuple type, so the set is known at
//! compile time:
//!
//! ```text
//! let functions = ast.query::<(CIdentifier, CFunctionDecl)>();
//! for id in &functions { ... }
//! ```
//!
//! Iteration walks the table of the first component in ascending slot order
//! and keeps the ids that hold the rest, so every match is visited exactly
//! once per pass and a pass can be restarted by calling `iter()` again. The
//! order depends only on entity slots, never on the order components were
//! attached.

use std::marker::PhantomData;

use crate::{AstStore, Component, Id};

/// A statically known conjunction of component types.
pub trait ComponentSet: 'static {
    /// Component whose table drives iteration.
    type Lead: Component;

    /// Check if `id` holds every component of the set.
    fn holds_all(store: &AstStore, id: Id) -> bool;
}

macro_rules! impl_component_set {
    ($lead:ident $(, $rest:ident)*) => {
        impl<$lead: Component $(, $rest: Component)*> ComponentSet for ($lead, $($rest,)*) {
            type Lead = $lead;

            #[inline]
            fn holds_all(store: &AstStore, id: Id) -> bool {
                store.has::<$lead>(id) $(&& store.has::<$rest>(id))*
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);

/// Lazy, restartable view of the entities holding every component in `S`.
pub struct Query<'a, S: ComponentSet> {
    store: &'a AstStore,
    _set: PhantomData<fn() -> S>,
}

impl<'a, S: ComponentSet> Query<'a, S> {
    pub(crate) fn new(store: &'a AstStore) -> Self {
        Query {
            store,
            _set: PhantomData,
        }
    }

    /// Start a new pass over the matching entities.
    pub fn iter(&self) -> impl Iterator<Item = Id> + 'a {
        let store = self.store;
        store
            .ids_with::<S::Lead>()
            .filter(move |&id| S::holds_all(store, id))
    }

    /// Check if `id` matches. Stale ids simply do not match.
    pub fn has(&self, id: Id) -> bool {
        self.store.is_valid(id) && S::holds_all(self.store, id)
    }

    /// Keep only the ids in `ids` that match, preserving their order.
    pub fn retain(&self, ids: &mut Vec<Id>) {
        ids.retain(|&id| self.has(id));
    }

    /// Read a component of a matched entity.
    pub fn get<T: Component>(&self, id: Id) -> &'a T {
        self.store.get(id)
    }

    pub fn try_get<T: Component>(&self, id: Id) -> Option<&'a T> {
        if self.has(id) {
            self.store.try_get(id)
        } else {
            None
        }
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a, S: ComponentSet> IntoIterator for &Query<'a, S> {
    type Item = Id;
    type IntoIter = Box<dyn Iterator<Item = Id> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
