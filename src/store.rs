// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Named palettes.  Renderers never read palette files themselves; the
//! caller hands them a `PaletteStore` to look names up in, which keeps
//! tests free to use in-memory tables.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::error::RenderError;
use crate::palette::{RawPalette, ResolvedPalette};

const BUILTIN_PALETTES: &str = include_str!("../data/color_palettes.json");

/// Something that can find a palette by name.
pub trait PaletteStore {
    /// The palette called `name`, or `PaletteNotFound`.
    fn lookup(&self, name: &str) -> Result<RawPalette, RenderError>;

    /// Every name the store knows, sorted.
    fn names(&self) -> Vec<String>;
}

/// Look a palette up and resolve it in one step.
pub fn resolve_by_name<S: PaletteStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<ResolvedPalette, RenderError> {
    store.lookup(name)?.resolve()
}

/// An in-memory palette table.  When two entries share a name the
/// first one wins.
#[derive(Clone, Debug, Default)]
pub struct PaletteTable {
    palettes: BTreeMap<String, RawPalette>,
}

impl PaletteTable {
    /// A table holding the given palettes.
    pub fn new(palettes: Vec<RawPalette>) -> PaletteTable {
        let mut table = PaletteTable::default();
        for palette in palettes {
            table.insert(palette);
        }
        table
    }

    /// The palettes bundled with the crate.
    pub fn builtin() -> Result<PaletteTable, RenderError> {
        PaletteTable::from_json(BUILTIN_PALETTES.as_bytes())
    }

    /// Read a JSON palette table: an array of `{name, stops}` objects.
    pub fn from_json<R: Read>(reader: R) -> Result<PaletteTable, RenderError> {
        let palettes: Vec<RawPalette> = serde_json::from_reader(reader)
            .map_err(|e| RenderError::PaletteFormat(e.to_string()))?;
        debug!("loaded {} palettes", palettes.len());
        Ok(PaletteTable::new(palettes))
    }

    /// Add a palette unless one of that name is already present.
    pub fn insert(&mut self, palette: RawPalette) {
        self.palettes
            .entry(palette.name.clone())
            .or_insert(palette);
    }
}

impl PaletteStore for PaletteTable {
    fn lookup(&self, name: &str) -> Result<RawPalette, RenderError> {
        self.palettes
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::PaletteNotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        self.palettes.keys().cloned().collect()
    }
}

/// Wraps a store and keeps every palette it resolves.  Resolved
/// palettes are shared read-only, so the cache can serve concurrent
/// renders.
pub struct PaletteCache<S> {
    store: S,
    resolved: RwLock<HashMap<String, Arc<ResolvedPalette>>>,
}

impl<S: PaletteStore> PaletteCache<S> {
    /// Constructor.
    pub fn new(store: S) -> PaletteCache<S> {
        PaletteCache {
            store,
            resolved: RwLock::new(HashMap::new()),
        }
    }

    /// The resolved palette called `name`.  Resolution happens once per
    /// name; failures are not cached.
    pub fn get(&self, name: &str) -> Result<Arc<ResolvedPalette>, RenderError> {
        if let Ok(resolved) = self.resolved.read() {
            if let Some(palette) = resolved.get(name) {
                return Ok(palette.clone());
            }
        }
        let palette = Arc::new(resolve_by_name(&self.store, name)?);
        if let Ok(mut resolved) = self.resolved.write() {
            resolved
                .entry(name.to_string())
                .or_insert_with(|| palette.clone());
        }
        Ok(palette)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn builtin_table_resolves() {
        let table = PaletteTable::builtin().unwrap();
        for name in table.names() {
            let palette = resolve_by_name(&table, &name).unwrap();
            assert!(!palette.is_empty(), "{} is empty", name);
        }
        assert!(table.names().contains(&"orange_blue".to_string()));
    }

    #[test]
    fn missing_name_is_reported() {
        let table = PaletteTable::builtin().unwrap();
        assert_eq!(
            table.lookup("plaid"),
            Err(RenderError::PaletteNotFound("plaid".to_string()))
        );
    }

    #[test]
    fn reads_transitions_alias() {
        let json = r##"[{"name": "a", "transitions": [{"color": "#fff", "position": 1.0}]}]"##;
        let table = PaletteTable::from_json(json.as_bytes()).unwrap();
        assert_eq!(table.lookup("a").unwrap().stops.len(), 1);
    }

    #[test]
    fn malformed_table_is_reported() {
        match PaletteTable::from_json("{\"name\": 3}".as_bytes()) {
            Err(RenderError::PaletteFormat(_)) => {}
            other => panic!("expected PaletteFormat, got {:?}", other),
        }
    }

    #[test]
    fn first_palette_of_a_name_wins() {
        let table = PaletteTable::new(vec![
            RawPalette::new("p", &[("black", 0.0)]),
            RawPalette::new("p", &[("white", 0.0)]),
        ]);
        assert_eq!(table.lookup("p").unwrap().stops[0].color, "black");
    }

    struct Counting {
        table: PaletteTable,
        lookups: Cell<usize>,
    }

    impl PaletteStore for Counting {
        fn lookup(&self, name: &str) -> Result<RawPalette, RenderError> {
            self.lookups.set(self.lookups.get() + 1);
            self.table.lookup(name)
        }
        fn names(&self) -> Vec<String> {
            self.table.names()
        }
    }

    #[test]
    fn cache_resolves_each_name_once() {
        let cache = PaletteCache::new(Counting {
            table: PaletteTable::builtin().unwrap(),
            lookups: Cell::new(0),
        });
        let a = cache.get("fire").unwrap();
        let b = cache.get("fire").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.store().lookups.get(), 1);
        assert!(cache.get("nope").is_err());
        assert!(cache.get("nope").is_err());
        assert_eq!(cache.store().lookups.get(), 3);
    }
}
