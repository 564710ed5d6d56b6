use std::{fs::File, path::Path};

use polars::prelude::*;

use crate::{
    error::{FeatureError, Result},
    features::{FeatureVector, SEGMENTS},
};

/**
Lay the feature vectors out as rows.
The columns are `filename`, an optional `label`, then one column per feature named after its segment (`lbp_0`, ..., `semantic_n`).
 */
pub(crate) fn to_dataframe(features: &[FeatureVector], labels: Option<&[f32]>) -> Result<DataFrame> {
    let names = features.iter().map(|f| f.name.as_str()).collect::<Vec<_>>();
    let mut columns = vec![Series::new("filename", names)];
    if let Some(labels) = labels {
        columns.push(Series::new("label", labels));
    }

    if let Some(first) = features.first() {
        for (segment_idx, (segment, len)) in SEGMENTS.iter().zip(first.layout()).enumerate() {
            for i in 0..len {
                let column = features
                    .iter()
                    .map(|f| f.segments()[segment_idx][i])
                    .collect::<Vec<f32>>();
                columns.push(Series::new(&format!("{}_{}", segment, i), column));
            }
        }
    }

    Ok(DataFrame::new(columns)?)
}

/**
Write the dataframe in the format matching the extension of `path`.
 */
pub(crate) fn save(df: &mut DataFrame, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let ext = match ext.as_deref() {
        Some(ext @ ("csv" | "json" | "parquet" | "ipc" | "arrow")) => ext.to_owned(),
        _ => return Err(FeatureError::UnsupportedOutput(path.to_path_buf())),
    };

    let mut file = File::create(path).map_err(|source| FeatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match ext.as_str() {
        "csv" => CsvWriter::new(&mut file).has_header(true).finish(df)?,
        "json" => JsonWriter::new(&mut file)
            .with_json_format(JsonFormat::Json)
            .finish(df)?,
        "parquet" => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        _ => IpcWriter::new(&mut file).finish(df)?,
    }
    Ok(())
}
