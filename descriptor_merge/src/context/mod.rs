//! Keyed store of recorded values used to detect duplicates and conflicts.
//!
//! Each key holds either an insertion-ordered map from lookup key to
//! [`ConfigItem`] or an insertion-ordered set of names. The shape and value
//! type of a key are fixed by the typed key constant used to reach it, and a
//! mismatch is reported as [`MergeError::ContextShape`] instead of panicking.

pub mod keys;

use std::{any::Any, collections::HashMap, fmt, marker::PhantomData, sync::Arc};

use indexmap::{IndexMap, IndexSet};

use crate::{ConfigItem, MergeError, MergeResult};

/// Insertion-ordered map of recorded values under one context key.
pub type ItemMap<T> = IndexMap<String, ConfigItem<T>>;

/// Typed key addressing an item map holding values of type `T`.
pub struct ItemKey<T> {
    name: &'static str,
    marker: PhantomData<fn() -> T>,
}

impl<T> ItemKey<T> {
    /// Key named `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            marker: PhantomData,
        }
    }

    /// Returns the key name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ItemKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemKey<T> {}

impl<T> fmt::Debug for ItemKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ItemKey").field(&self.name).finish()
    }
}

/// Key addressing a set of names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameKey {
    name: &'static str,
}

impl NameKey {
    /// Key named `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns the key name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

enum Slot {
    Items {
        map: Box<dyn Any>,
        type_name: &'static str,
    },
    Names(IndexSet<String>),
}

impl Slot {
    const fn describe(&self) -> &'static str {
        match self {
            Self::Items { type_name, .. } => *type_name,
            Self::Names(_) => "a name set",
        }
    }
}

/// Store of recorded values for one merge session.
///
/// # Examples
///
/// ```
/// use descriptor_merge::{ConfigItem, Provenance, context::{ItemKey, MergeContext}};
///
/// const TIMEOUT: ItemKey<u32> = ItemKey::new("session-timeout");
///
/// let mut context = MergeContext::default();
/// context
///     .items(TIMEOUT)?
///     .insert("timeout".to_owned(), ConfigItem::new(Some(30), Provenance::primary()));
/// assert_eq!(context.items(TIMEOUT)?.len(), 1);
/// context.clear();
/// assert!(context.items(TIMEOUT)?.is_empty());
/// # Ok::<_, std::sync::Arc<descriptor_merge::MergeError>>(())
/// ```
#[derive(Default)]
pub struct MergeContext {
    slots: HashMap<&'static str, Slot>,
}

impl MergeContext {
    /// Returns the item map for `key`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::ContextShape`] when `key` already holds a name
    /// set or an item map of a different value type.
    pub fn items<T: 'static>(&mut self, key: ItemKey<T>) -> MergeResult<&mut ItemMap<T>> {
        let expected = std::any::type_name::<ItemMap<T>>();
        let slot = self.slots.entry(key.name()).or_insert_with(|| Slot::Items {
            map: Box::new(ItemMap::<T>::new()),
            type_name: expected,
        });
        let found = slot.describe();
        match slot {
            Slot::Items { map, .. } => map
                .downcast_mut::<ItemMap<T>>()
                .ok_or_else(|| shape_error(key.name(), expected, found)),
            Slot::Names(_) => Err(shape_error(key.name(), expected, found)),
        }
    }

    /// Returns the name set for `key`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::ContextShape`] when `key` already holds an item map.
    pub fn names(&mut self, key: NameKey) -> MergeResult<&mut IndexSet<String>> {
        let slot = self
            .slots
            .entry(key.name())
            .or_insert_with(|| Slot::Names(IndexSet::new()));
        let found = slot.describe();
        match slot {
            Slot::Names(names) => Ok(names),
            Slot::Items { .. } => Err(shape_error(key.name(), "a name set", found)),
        }
    }

    /// Returns `true` when `name` is present in the item map or name set for `key`.
    #[must_use]
    pub fn contains(&self, key: &str, name: &str) -> bool {
        match self.slots.get(key) {
            Some(Slot::Names(names)) => names.contains(name),
            Some(Slot::Items { .. }) | None => false,
        }
    }

    /// Number of populated keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when no key has been populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Discard every recorded value.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl fmt::Debug for MergeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.slots.keys().collect();
        keys.sort_unstable();
        f.debug_struct("MergeContext").field("keys", &keys).finish()
    }
}

fn shape_error(key: &str, expected: &str, found: &str) -> Arc<MergeError> {
    Arc::new(MergeError::ContextShape {
        key: key.to_owned(),
        expected: expected.to_owned(),
        found: found.to_owned(),
    })
}
