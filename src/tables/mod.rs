/*!
In-memory lookup tables of precomputed features, keyed by image file name.
 */
mod gist;
mod pickle;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use log::info;

use crate::error::{FeatureError, Result};

pub(crate) use self::gist::load_gist_file;
pub(crate) use self::pickle::{load_json_table, load_pickle_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableKind {
    Gist,
    Semantic,
    Deep,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableKind::Gist => "gist",
            TableKind::Semantic => "semantic",
            TableKind::Deep => "deep",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FeatureTable {
    kind: TableKind,
    source: PathBuf,
    entries: HashMap<String, Vec<f32>>,
}

impl FeatureTable {
    pub(crate) fn new(kind: TableKind, source: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            source: source.into(),
            entries: HashMap::new(),
        }
    }

    pub(crate) fn from_entries(
        kind: TableKind,
        source: impl Into<PathBuf>,
        entries: HashMap<String, Vec<f32>>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            entries,
        }
    }

    pub(crate) fn kind(&self) -> TableKind {
        self.kind
    }

    pub(crate) fn source(&self) -> &Path {
        &self.source
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert unless `name` is already present; returns whether it was inserted.
    pub(crate) fn insert_first(&mut self, name: String, values: Vec<f32>) -> bool {
        match self.entries.entry(name) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(values);
                true
            }
        }
    }

    pub(crate) fn get(&self, name: &str) -> Result<&[f32]> {
        self.entries
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| FeatureError::MissingEntry {
                kind: self.kind,
                name: name.to_owned(),
            })
    }
}

/**
Load a semantic or deep feature table. `.json` files are read as a json object, anything else as a pickle.
 */
pub(crate) fn load_table(path: &Path, kind: TableKind) -> Result<FeatureTable> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        load_json_table(path, kind)
    } else {
        load_pickle_table(path, kind)
    }
}

pub(crate) struct Tables {
    pub(crate) gist: FeatureTable,
    pub(crate) semantic: FeatureTable,
    pub(crate) deep: FeatureTable,
}

impl Tables {
    pub(crate) fn load(gist: &Path, semantic: &Path, deep: &Path) -> Result<Self> {
        let tables = Tables {
            gist: load_gist_file(gist)?,
            semantic: load_table(semantic, TableKind::Semantic)?,
            deep: load_table(deep, TableKind::Deep)?,
        };
        for table in [&tables.gist, &tables.semantic, &tables.deep] {
            info!(
                "Loaded {} {} entries from {:?}",
                table.len(),
                table.kind(),
                table.source()
            );
        }
        Ok(tables)
    }
}
