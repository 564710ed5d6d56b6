/*!
Loaders for `{name: [floats]}` tables stored as python pickles or json objects.

Pickled tables have to hold plain lists; numpy arrays are not understood.
 */
use std::{collections::HashMap, path::Path};

use serde_pickle::DeOptions;

use super::{FeatureTable, TableKind};
use crate::{error::Result, utils};

pub(crate) fn load_pickle_table(path: &Path, kind: TableKind) -> Result<FeatureTable> {
    let reader = utils::open(path)?;
    // python 2 pickles store `str` as bytes
    let entries: HashMap<String, Vec<f64>> =
        serde_pickle::from_reader(reader, DeOptions::new().decode_strings())?;
    Ok(FeatureTable::from_entries(kind, path, narrow(entries)))
}

pub(crate) fn load_json_table(path: &Path, kind: TableKind) -> Result<FeatureTable> {
    let reader = utils::open(path)?;
    let entries: HashMap<String, Vec<f64>> = serde_json::from_reader(reader)?;
    Ok(FeatureTable::from_entries(kind, path, narrow(entries)))
}

fn narrow(entries: HashMap<String, Vec<f64>>) -> HashMap<String, Vec<f32>> {
    entries
        .into_iter()
        .map(|(name, values)| (name, values.into_iter().map(|v| v as f32).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::FeatureError, utils::scratch_dir};

    #[test]
    fn reads_pickled_lists() {
        let dir = scratch_dir("pickle-lists");
        let path = dir.join("semantic.pickle");
        let mut entries = HashMap::new();
        entries.insert("a.jpg".to_owned(), vec![0.25f64, 0.75]);
        entries.insert("b.jpg".to_owned(), vec![1.0f64]);
        let mut file = std::fs::File::create(&path).unwrap();
        serde_pickle::to_writer(&mut file, &entries, serde_pickle::SerOptions::new()).unwrap();

        let table = load_pickle_table(&path, TableKind::Semantic).unwrap();
        assert_eq!(table.kind(), TableKind::Semantic);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a.jpg").unwrap(), &[0.25, 0.75]);
    }

    #[test]
    fn python2_byte_string_keys_are_decoded() {
        // pickle.dump({'a.jpg': [1.0]}, f, 2) under python 2
        let mut bytes = vec![0x80, 0x02, b'}', b'q', 0x00, b'U', 0x05];
        bytes.extend_from_slice(b"a.jpg");
        bytes.extend_from_slice(&[b'q', 0x01, b']', b'q', 0x02, b'G']);
        bytes.extend_from_slice(&1.0f64.to_be_bytes());
        bytes.extend_from_slice(&[b'a', b's', b'.']);

        let dir = scratch_dir("pickle-py2");
        let path = dir.join("vgg.pickle");
        std::fs::write(&path, &bytes).unwrap();

        let table = load_pickle_table(&path, TableKind::Deep).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a.jpg").unwrap(), &[1.0]);
    }

    #[test]
    fn integers_are_widened() {
        let dir = scratch_dir("pickle-ints");
        let path = dir.join("semantic.pickle");
        let mut entries = HashMap::new();
        entries.insert("a.jpg".to_owned(), vec![1i64, 0, 3]);
        let mut file = std::fs::File::create(&path).unwrap();
        serde_pickle::to_writer(&mut file, &entries, serde_pickle::SerOptions::new()).unwrap();

        let table = load_pickle_table(&path, TableKind::Semantic).unwrap();
        assert_eq!(table.get("a.jpg").unwrap(), &[1.0, 0.0, 3.0]);
    }

    #[test]
    fn json_tables() {
        let dir = scratch_dir("json-table");
        let path = dir.join("deep.json");
        std::fs::write(&path, r#"{"a.jpg": [1.5, 2], "b.jpg": []}"#).unwrap();
        let table = load_json_table(&path, TableKind::Deep).unwrap();
        assert_eq!(table.get("a.jpg").unwrap(), &[1.5, 2.0]);
        assert!(table.get("b.jpg").unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_pickle_error() {
        let dir = scratch_dir("pickle-garbage");
        let path = dir.join("deep.pickle");
        std::fs::write(&path, b"not a pickle").unwrap();
        assert!(matches!(
            load_pickle_table(&path, TableKind::Deep),
            Err(FeatureError::Pickle(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = scratch_dir("pickle-missing");
        assert!(matches!(
            load_pickle_table(&dir.join("nope.pickle"), TableKind::Deep),
            Err(FeatureError::Io { .. })
        ));
    }
}
