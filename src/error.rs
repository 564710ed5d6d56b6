/*!
Error type shared by the loaders, the extractor and the batch drivers.
 */
use std::path::PathBuf;

use thiserror::Error;

use crate::tables::TableKind;

pub(crate) type Result<T> = std::result::Result<T, FeatureError>;

#[derive(Error, Debug)]
pub(crate) enum FeatureError {
    #[error("Couldn't read {path:?} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Couldn't decode image : {0}")]
    Image(#[from] image::ImageError),
    #[error("Torch error : {0}")]
    Torch(#[from] tch::TchError),
    #[error("Couldn't parse pickle table : {0}")]
    Pickle(#[from] serde_pickle::Error),
    #[error("Couldn't parse json table : {0}")]
    Json(#[from] serde_json::Error),
    #[error("Polars error : {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("{file:?}:{line} : {msg}")]
    Parse {
        file: PathBuf,
        line: usize,
        msg: String,
    },
    #[error("No {kind} features for image {name:?}")]
    MissingEntry { kind: TableKind, name: String },
    #[error("{name:?} has {found} {segment} features, expected {expected}")]
    DimensionMismatch {
        name: String,
        segment: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Unsupported output format : {0:?} (expected csv, json, parquet or ipc)")]
    UnsupportedOutput(PathBuf),
    #[error("Invalid image path : {0:?}")]
    InvalidPath(PathBuf),
    #[error("Failed on image {name:?} : {source}")]
    Extraction {
        name: String,
        #[source]
        source: Box<FeatureError>,
    },
}
