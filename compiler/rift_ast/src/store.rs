//! Struct-of-arrays component store.
//!
//! Every component type gets its own sparse-set table: a `sparse` array indexed
//! by entity slot pointing into dense `ids`/`data` arrays. Tables are created
//! lazily on first insertion and looked up by `TypeId`.
//!
//! # Contracts
//!
//! Accessors treat a stale or released [`Id`] as a caller bug and panic.
//! [`AstStore::get`] additionally panics when the component is absent; use
//! [`AstStore::try_get`] when absence is expected.
//!
//! # Observers
//!
//! [`AstStore::on_insert`] registers a plain function that runs synchronously
//! right after a component of that type is attached (or replaced). Observers
//! run in registration order and may mutate the store, except that they must
//! not remove the component they were notified about.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use rustc_hash::FxHashMap;

use crate::hierarchy::{CChild, CParent};
use crate::query::{ComponentSet, Query};
use crate::Id;

/// Marker for data that can be attached to an entity.
///
/// Components must be `Clone` so a whole store can be snapshotted, and
/// `Send + Sync` so that snapshot can move to a worker thread.
pub trait Component: Clone + Send + Sync + 'static {
    /// Components maintained by the store itself (hierarchy links).
    ///
    /// These can be read through the generic API but never inserted, replaced
    /// or removed through it.
    #[doc(hidden)]
    const MANAGED: bool = false;
}

/// Callback run after a component insertion.
pub type Observer = fn(&mut AstStore, Id);

const EMPTY_SLOT: u32 = u32::MAX;

#[allow(clippy::cast_possible_truncation)]
fn to_slot(n: usize) -> u32 {
    debug_assert!(n < EMPTY_SLOT as usize, "component table overflow");
    n as u32
}

/// Sparse-set table for one component type.
#[derive(Clone)]
struct Pool<T> {
    sparse: Vec<u32>,
    ids: Vec<Id>,
    data: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool {
            sparse: Vec::new(),
            ids: Vec::new(),
            data: Vec::new(),
        }
    }
}

impl<T> Pool<T> {
    fn slot(&self, id: Id) -> Option<usize> {
        let slot = *self.sparse.get(id.index())?;
        if slot == EMPTY_SLOT {
            return None;
        }
        let slot = slot as usize;
        (self.ids[slot] == id).then_some(slot)
    }

    fn get(&self, id: Id) -> Option<&T> {
        self.slot(id).map(|slot| &self.data[slot])
    }

    fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        self.slot(id).map(|slot| &mut self.data[slot])
    }

    fn insert(&mut self, id: Id, value: T) -> &mut T {
        if let Some(slot) = self.slot(id) {
            self.data[slot] = value;
            return &mut self.data[slot];
        }

        if self.sparse.len() <= id.index() {
            self.sparse.resize(id.index() + 1, EMPTY_SLOT);
        }
        let slot = self.data.len();
        self.sparse[id.index()] = to_slot(slot);
        self.ids.push(id);
        self.data.push(value);
        &mut self.data[slot]
    }

    fn remove(&mut self, id: Id) -> Option<T> {
        let slot = self.slot(id)?;
        let last = self.ids.len() - 1;
        self.ids.swap_remove(slot);
        let value = self.data.swap_remove(slot);
        if slot != last {
            let moved = self.ids[slot];
            self.sparse[moved.index()] = to_slot(slot);
        }
        self.sparse[id.index()] = EMPTY_SLOT;
        Some(value)
    }

    /// Ids holding this component, in ascending slot order.
    fn ids_by_slot(&self) -> impl Iterator<Item = Id> + '_ {
        self.sparse
            .iter()
            .filter(|&&slot| slot != EMPTY_SLOT)
            .map(|&slot| self.ids[slot as usize])
    }
}

/// Type-erased view over a [`Pool`].
trait AnyPool: Send + Sync {
    fn contains(&self, id: Id) -> bool;
    fn remove_entity(&mut self, id: Id);
    fn len(&self) -> usize;
    fn component_name(&self) -> &'static str;
    fn clone_box(&self) -> Box<dyn AnyPool>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyPool for Pool<T> {
    fn contains(&self, id: Id) -> bool {
        self.slot(id).is_some()
    }

    fn remove_entity(&mut self, id: Id) {
        self.remove(id);
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn clone_box(&self) -> Box<dyn AnyPool> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

trait AnyUnique: Send + Sync {
    fn clone_box(&self) -> Box<dyn AnyUnique>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Owner of one unique value; keeps the erased table from matching references.
#[derive(Clone)]
struct UniqueCell<T>(T);

impl<T: Clone + Send + Sync + 'static> AnyUnique for UniqueCell<T> {
    fn clone_box(&self) -> Box<dyn AnyUnique> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.0
    }
}

#[derive(Copy, Clone, Debug)]
struct Slot {
    generation: u32,
    alive: bool,
}

/// Entity allocator plus one typed table per component type.
#[derive(Default)]
pub struct AstStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    pools: FxHashMap<TypeId, Box<dyn AnyPool>>,
    uniques: FxHashMap<TypeId, Box<dyn AnyUnique>>,
    observers: FxHashMap<TypeId, Vec<Observer>>,
}

impl AstStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Entities

    /// Allocate a new entity with no components.
    pub fn create(&mut self) -> Id {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            return Id::new(index, slot.generation);
        }

        let index = to_slot(self.slots.len());
        self.slots.push(Slot {
            generation: 0,
            alive: true,
        });
        Id::new(index, 0)
    }

    /// Release an entity and every component attached to it.
    ///
    /// The entity must already be unlinked from the hierarchy: destroying a
    /// node that still has a parent or children would leave dangling links.
    /// Use [`hierarchy::destroy_subtree`](crate::hierarchy::destroy_subtree)
    /// to release a linked node together with its descendants.
    pub fn destroy(&mut self, id: Id) {
        self.check_valid(id);
        assert!(
            !self.has::<CParent>(id),
            "destroying {id:?} which still has children"
        );
        assert!(
            !self.has::<CChild>(id),
            "destroying {id:?} which is still linked to a parent"
        );

        for pool in self.pools.values_mut() {
            pool.remove_entity(id);
        }

        let slot = &mut self.slots[id.index()];
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(to_slot(id.index()));
        self.live -= 1;
    }

    /// Check if `id` refers to a live entity.
    pub fn is_valid(&self, id: Id) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.alive && slot.generation == id.generation())
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live entities in ascending slot order.
    pub fn entities(&self) -> impl Iterator<Item = Id> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.alive
                .then(|| Id::new(to_slot(index), slot.generation))
        })
    }

    // Components

    /// Attach `value` to `id`, replacing any previous component of that type.
    ///
    /// Observers registered for `T` run before this returns.
    ///
    /// # Panics
    ///
    /// If an observer removed the `T` it was notified about.
    pub fn insert<T: Component>(&mut self, id: Id, value: T) -> &mut T {
        assert!(
            !T::MANAGED,
            "{} is maintained by the hierarchy API",
            type_name::<T>()
        );
        self.check_valid(id);
        self.pool_mut::<T>().insert(id, value);
        self.notify::<T>(id);
        self.try_get_mut::<T>(id).unwrap_or_else(|| {
            panic!(
                "an observer removed the {} it was notified about on {id:?}",
                type_name::<T>()
            )
        })
    }

    /// Attach a default-constructed `T` unless one is already present.
    pub fn get_or_insert_default<T: Component + Default>(&mut self, id: Id) -> &mut T {
        if !self.has::<T>(id) {
            self.insert(id, T::default());
        }
        self.get_mut::<T>(id)
    }

    /// Detach and return the `T` on `id`, if any.
    pub fn remove<T: Component>(&mut self, id: Id) -> Option<T> {
        assert!(
            !T::MANAGED,
            "{} is maintained by the hierarchy API",
            type_name::<T>()
        );
        self.check_valid(id);
        self.typed_pool_mut::<T>()?.remove(id)
    }

    /// Read a component that must be present.
    pub fn get<T: Component>(&self, id: Id) -> &T {
        self.try_get(id).unwrap_or_else(|| {
            panic!("entity {id:?} has no {} component", type_name::<T>())
        })
    }

    /// Read a component that may be absent.
    pub fn try_get<T: Component>(&self, id: Id) -> Option<&T> {
        self.check_valid(id);
        self.typed_pool::<T>()?.get(id)
    }

    pub fn get_mut<T: Component>(&mut self, id: Id) -> &mut T {
        self.try_get_mut(id).unwrap_or_else(|| {
            panic!("entity {id:?} has no {} component", type_name::<T>())
        })
    }

    pub fn try_get_mut<T: Component>(&mut self, id: Id) -> Option<&mut T> {
        assert!(
            !T::MANAGED,
            "{} is maintained by the hierarchy API",
            type_name::<T>()
        );
        self.check_valid(id);
        self.typed_pool_mut::<T>()?.get_mut(id)
    }

    /// Check if `id` holds a `T`.
    pub fn has<T: Component>(&self, id: Id) -> bool {
        self.check_valid(id);
        self.pools
            .get(&TypeId::of::<T>())
            .is_some_and(|pool| pool.contains(id))
    }

    /// Number of entities holding a `T`.
    pub fn count<T: Component>(&self) -> usize {
        self.pools
            .get(&TypeId::of::<T>())
            .map_or(0, |pool| pool.len())
    }

    /// Entities holding every component in `S`.
    ///
    /// ```text
    /// for id in ast.query::<(CIdentifier, CFunctionDecl)>().iter() { ... }
    /// ```
    pub fn query<S: ComponentSet>(&self) -> Query<'_, S> {
        Query::new(self)
    }

    /// Ids holding a `T`, ascending by slot. Empty when no `T` was ever added.
    pub(crate) fn ids_with<T: Component>(&self) -> impl Iterator<Item = Id> + '_ {
        self.typed_pool::<T>()
            .into_iter()
            .flat_map(|pool| pool.ids_by_slot())
    }

    // Hierarchy links

    pub(crate) fn insert_link<T: Component>(&mut self, id: Id, value: T) {
        self.check_valid(id);
        self.pool_mut::<T>().insert(id, value);
    }

    pub(crate) fn link_mut<T: Component>(&mut self, id: Id) -> Option<&mut T> {
        self.check_valid(id);
        self.typed_pool_mut::<T>()?.get_mut(id)
    }

    pub(crate) fn remove_link<T: Component>(&mut self, id: Id) -> Option<T> {
        self.check_valid(id);
        self.typed_pool_mut::<T>()?.remove(id)
    }

    // Uniques

    /// Store a per-store singleton, replacing any previous value of that type.
    pub fn set_unique<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> &mut T {
        self.uniques
            .insert(TypeId::of::<T>(), Box::new(UniqueCell(value)));
        self.try_unique_mut::<T>().unwrap_or_else(|| {
            panic!("unique {} vanished after insertion", type_name::<T>())
        })
    }

    pub fn unique<T: Clone + Send + Sync + 'static>(&self) -> &T {
        self.try_unique::<T>()
            .unwrap_or_else(|| panic!("store has no {} unique", type_name::<T>()))
    }

    pub fn try_unique<T: Clone + Send + Sync + 'static>(&self) -> Option<&T> {
        self.uniques
            .get(&TypeId::of::<T>())
            .and_then(|unique| unique.as_any().downcast_ref())
    }

    pub fn try_unique_mut<T: Clone + Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.uniques
            .get_mut(&TypeId::of::<T>())
            .and_then(|unique| unique.as_any_mut().downcast_mut())
    }

    // Observers

    /// Run `observer` after every future insertion of a `T`.
    ///
    /// The observer must leave the `T` on the entity; [`insert`](Self::insert)
    /// returns a reference to it once observers are done.
    pub fn on_insert<T: Component>(&mut self, observer: Observer) {
        self.observers
            .entry(TypeId::of::<T>())
            .or_default()
            .push(observer);
    }

    fn notify<T: Component>(&mut self, id: Id) {
        let Some(observers) = self.observers.get(&TypeId::of::<T>()) else {
            return;
        };
        for observer in observers.clone() {
            observer(self, id);
        }
    }

    // Internals

    fn check_valid(&self, id: Id) {
        assert!(self.is_valid(id), "stale or invalid entity {id:?}");
    }

    fn typed_pool<T: Component>(&self) -> Option<&Pool<T>> {
        self.pools
            .get(&TypeId::of::<T>())
            .and_then(|pool| pool.as_any().downcast_ref())
    }

    fn typed_pool_mut<T: Component>(&mut self) -> Option<&mut Pool<T>> {
        self.pools
            .get_mut(&TypeId::of::<T>())
            .and_then(|pool| pool.as_any_mut().downcast_mut())
    }

    fn pool_mut<T: Component>(&mut self) -> &mut Pool<T> {
        self.pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Pool::<T>::default()))
            .as_any_mut()
            .downcast_mut()
            .unwrap_or_else(|| panic!("component table for {} has the wrong type", type_name::<T>()))
    }
}

impl Clone for AstStore {
    fn clone(&self) -> Self {
        AstStore {
            slots: self.slots.clone(),
            free: self.free.clone(),
            live: self.live,
            pools: self
                .pools
                .iter()
                .map(|(key, pool)| (*key, pool.clone_box()))
                .collect(),
            uniques: self
                .uniques
                .iter()
                .map(|(key, unique)| (*key, unique.clone_box()))
                .collect(),
            observers: self.observers.clone(),
        }
    }
}

impl fmt::Debug for AstStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pools: Vec<_> = self
            .pools
            .values()
            .map(|pool| (pool.component_name(), pool.len()))
            .collect();
        pools.sort_unstable();
        f.debug_struct("AstStore")
            .field("entities", &self.live)
            .field("pools", &pools)
            .finish_non_exhaustive()
    }
}
