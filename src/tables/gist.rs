use std::{io::BufRead, path::Path};

use log::warn;

use super::{FeatureTable, TableKind};
use crate::{
    error::{FeatureError, Result},
    utils,
};

/**
Load a gist file where each line reads `name:v1 v2 ... vn`.

When a name is listed more than once the first line is kept.
 */
pub(crate) fn load_gist_file(path: &Path) -> Result<FeatureTable> {
    parse_gist(utils::open(path)?, path)
}

fn parse_gist(reader: impl BufRead, source: &Path) -> Result<FeatureTable> {
    let mut table = FeatureTable::new(TableKind::Gist, source);
    let parse_error = |line: usize, msg: String| FeatureError::Parse {
        file: source.to_path_buf(),
        line,
        msg,
    };

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| FeatureError::Io {
            path: source.to_path_buf(),
            source: err,
        })?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let Some((name, values)) = line.split_once(':') else {
            return Err(parse_error(line_no, "missing ':' separator".into()));
        };
        let values = values
            .split_whitespace()
            .map(|value| {
                value
                    .parse::<f32>()
                    .map_err(|err| parse_error(line_no, format!("{:?} : {}", value, err)))
            })
            .collect::<Result<Vec<_>>>()?;

        if !table.insert_first(name.to_owned(), values) {
            warn!("Duplicate gist entry for {:?} at line {}, keeping the first one", name, line_no);
        }
    }
    Ok(table)
}
