/*!
Batch drivers: extract the feature vectors of every image listed in a manifest.
 */
use std::path::Path;

use log::info;
use rayon::prelude::*;

use crate::{
    error::{FeatureError, Result},
    features::{extract_feature_vector, ExtractOptions, FeatureVector, SEGMENTS},
    manifest::{self, ManifestEntry},
    tables::Tables,
    utils,
};

/**
Extract the features and labels of a training manifest (`filename,label` per line).
 */
pub(crate) fn get_features(
    manifest: &Path,
    directory: &Path,
    tables: &Tables,
    options: &ExtractOptions,
    label_scale: f32,
) -> Result<(Vec<FeatureVector>, Vec<f32>)> {
    let entries = manifest::read_training_manifest(manifest, label_scale)?;
    info!("Extracting {} labelled images from {:?}", entries.len(), manifest);
    let features = extract_all(&entries, directory, tables, options)?;
    let labels = entries
        .iter()
        .map(|entry| entry.label.unwrap_or_default())
        .collect();
    Ok((features, labels))
}

/**
Extract the features of a prediction manifest (one filename per line).
 */
pub(crate) fn get_prediction_features(
    manifest: &Path,
    directory: &Path,
    tables: &Tables,
    options: &ExtractOptions,
) -> Result<Vec<FeatureVector>> {
    let entries = manifest::read_prediction_manifest(manifest)?;
    info!("Extracting {} images from {:?}", entries.len(), manifest);
    extract_all(&entries, directory, tables, options)
}

/**
Extract every entry in parallel. When several images fail, the error reported is the one
listed first in the manifest.
 */
fn extract_all(
    entries: &[ManifestEntry],
    directory: &Path,
    tables: &Tables,
    options: &ExtractOptions,
) -> Result<Vec<FeatureVector>> {
    let features = entries
        .par_iter()
        .map(|entry| {
            let path = utils::resolve_image_path(directory, &entry.filename)?;
            extract_feature_vector(&path, tables, options).map_err(|err| FeatureError::Extraction {
                name: entry.filename.clone(),
                source: Box::new(err),
            })
        })
        .collect::<Vec<_>>() // manifest order
        .into_iter()
        .collect::<Result<Vec<_>>>()?;
    check_layout(&features)?;
    Ok(features)
}

/**
Every vector of a batch has to share the layout of the first one.
 */
pub(crate) fn check_layout(features: &[FeatureVector]) -> Result<()> {
    let Some(first) = features.first() else {
        return Ok(());
    };
    let expected = first.layout();
    for vector in features.iter().skip(1) {
        let found = vector.layout();
        if let Some(idx) = (0..SEGMENTS.len()).find(|&idx| found[idx] != expected[idx]) {
            return Err(FeatureError::DimensionMismatch {
                name: vector.name.clone(),
                segment: SEGMENTS[idx],
                expected: expected[idx],
                found: found[idx],
            });
        }
    }
    Ok(())
}
