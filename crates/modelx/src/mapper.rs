//! Field binder: reads a record's fields as ordered `(column, value)` pairs.
//!
//! The sorted column list of a record type ([`FieldMap`]) is built once per distinct
//! declaration and cached for the lifetime of the process. Columns are sorted by byte order so that generated SQL is the
//! same on every run.

use crate::error::{ModelError, ModelResult};
use crate::model::Fields;
use crate::value::SqlValue;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Sorted, deduplicated column names of one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    type_name: &'static str,
    names: Vec<&'static str>,
}

impl FieldMap {
    /// Build the mapping for `M` without consulting the cache.
    pub fn of<M: Fields>() -> Self {
        Self::from_names(std::any::type_name::<M>(), M::field_names())
    }

    /// Build a mapping from declared names.
    ///
    /// When a name is declared twice the first declaration wins, matching how
    /// [`Fields::field`] resolves outer fields before flattened ones.
    pub fn from_names(type_name: &'static str, declared: Vec<&'static str>) -> Self {
        let mut seen = HashSet::with_capacity(declared.len());
        let mut names: Vec<&'static str> = declared
            .into_iter()
            .filter(|name| seen.insert(*name))
            .collect();
        names.sort_unstable();
        Self { type_name, names }
    }

    /// Name of the record type this mapping describes.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Column names in binding order.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search(&name).is_ok()
    }
}

type CacheKey = (&'static str, Vec<&'static str>);

/// Return the cached mapping for `M`, computing it on first use.
///
/// Entries are keyed by type name and declared column list, since type names are not
/// unique (two local `struct Row`s in one function share one).
///
/// Concurrent first uses may each compute the mapping; only one is published and every
/// caller receives that one.
pub fn field_map<M: Fields>() -> Arc<FieldMap> {
    static CACHE: OnceLock<RwLock<HashMap<CacheKey, Arc<FieldMap>>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));

    // `type_name` is `'static` and works for non-`'static` record types too.
    let key: CacheKey = (std::any::type_name::<M>(), M::field_names());

    if let Some(cached) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Arc::clone(cached);
    }

    let computed = Arc::new(FieldMap::from_names(key.0, key.1.clone()));

    let mut map = cache.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(map.entry(key).or_insert(computed))
}

/// One `(column, value)` pair read from a record.
#[derive(Clone, Copy)]
pub struct Binding<'a> {
    pub name: &'static str,
    pub value: &'a dyn SqlValue,
}

impl<'a> Binding<'a> {
    pub fn new(name: &'static str, value: &'a dyn SqlValue) -> Self {
        Self { name, value }
    }
}

impl fmt::Debug for Binding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding")
            .field(&self.name)
            .field(&self.value)
            .finish()
    }
}

/// Read every declared field of `record` in column order.
///
/// Fails with [`ModelError::FieldNotFound`] if a declared column cannot be read from the
/// instance.
pub fn bind<M: Fields>(record: &M) -> ModelResult<Vec<Binding<'_>>> {
    let map = field_map::<M>();
    map.names()
        .iter()
        .map(|&name| {
            record
                .field(name)
                .map(|value| Binding::new(name, value))
                .ok_or_else(|| ModelError::field_not_found(name, map.type_name()))
        })
        .collect()
}
