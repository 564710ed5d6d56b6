/*!
Manifest files listing the images to process.

Training manifests hold one `filename,label` pair per line, prediction manifests one bare filename per line.
 */
use std::{io::BufRead, path::Path};

use crate::{
    error::{FeatureError, Result},
    utils,
};

pub(crate) const DEFAULT_LABEL_SCALE: f32 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ManifestEntry {
    pub(crate) filename: String,
    pub(crate) label: Option<f32>,
}

/**
Read a training manifest, dividing every label by `label_scale`.
 */
pub(crate) fn read_training_manifest(path: &Path, label_scale: f32) -> Result<Vec<ManifestEntry>> {
    parse_training(utils::open(path)?, path, label_scale)
}

pub(crate) fn read_prediction_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    parse_prediction(utils::open(path)?, path)
}

fn lines<'a, R: BufRead + 'a>(
    reader: R,
    source: &'a Path,
) -> impl Iterator<Item = Result<(usize, String)>> + 'a {
    reader
        .lines()
        .enumerate()
        .map(move |(idx, line)| {
            line.map(|line| (idx + 1, line))
                .map_err(|err| FeatureError::Io {
                    path: source.to_path_buf(),
                    source: err,
                })
        })
        .filter(|line| !matches!(line, Ok((_, text)) if text.trim().is_empty()))
}

fn parse_training(reader: impl BufRead, source: &Path, label_scale: f32) -> Result<Vec<ManifestEntry>> {
    let parse_error = |line: usize, msg: String| FeatureError::Parse {
        file: source.to_path_buf(),
        line,
        msg,
    };
    lines(reader, source)
        .map(|line| {
            let (line_no, text) = line?;
            let Some((filename, label)) = text.split_once(',') else {
                return Err(parse_error(line_no, "expected `filename,label`".into()));
            };
            let label = label
                .trim()
                .parse::<f32>()
                .map_err(|err| parse_error(line_no, format!("{:?} : {}", label.trim(), err)))?;
            Ok(ManifestEntry {
                filename: filename.trim().to_owned(),
                label: Some(label / label_scale),
            })
        })
        .collect()
}

fn parse_prediction(reader: impl BufRead, source: &Path) -> Result<Vec<ManifestEntry>> {
    lines(reader, source)
        .map(|line| {
            let (_, text) = line?;
            // a training manifest can be reused for prediction
            let filename = text.split(',').next().unwrap_or_default();
            Ok(ManifestEntry {
                filename: filename.trim().to_owned(),
                label: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn training_labels_are_scaled() {
        let text = "a.jpg,50\nb.jpg, 12.5 \r\n\n";
        let entries = parse_training(text.as_bytes(), Path::new("train.txt"), DEFAULT_LABEL_SCALE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].filename, "a.jpg");
        assert_relative_eq!(entries[0].label.unwrap(), 0.5);
        assert_eq!(entries[1].filename, "b.jpg");
        assert_relative_eq!(entries[1].label.unwrap(), 0.125);
    }

    #[test]
    fn training_requires_label() {
        let text = "a.jpg,50\nb.jpg\n";
        match parse_training(text.as_bytes(), Path::new("train.txt"), DEFAULT_LABEL_SCALE) {
            Err(FeatureError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn training_rejects_bad_label() {
        let text = "\na.jpg,high\n";
        match parse_training(text.as_bytes(), Path::new("train.txt"), DEFAULT_LABEL_SCALE) {
            Err(FeatureError::Parse { line, msg, .. }) => {
                assert_eq!(line, 2);
                assert!(msg.contains("high"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn prediction_strips_newlines() {
        let text = "a.jpg\r\n  b.jpg  \n\nc.jpg";
        let entries = parse_prediction(text.as_bytes(), Path::new("test.txt")).unwrap();
        let names = entries.iter().map(|e| e.filename.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["a.jpg", "b.jpg", "c.jpg"]);
        assert!(entries.iter().all(|e| e.label.is_none()));
    }

    #[test]
    fn prediction_ignores_labels() {
        let entries = parse_prediction("a.jpg,40\n".as_bytes(), Path::new("test.txt")).unwrap();
        assert_eq!(
            entries,
            vec![ManifestEntry {
                filename: "a.jpg".into(),
                label: None
            }]
        );
    }

    #[test]
    fn reads_from_disk() {
        let dir = crate::utils::scratch_dir("manifest-disk");
        let path = dir.join("train.txt");
        std::fs::write(&path, "x.png,100\n").unwrap();
        let entries = read_training_manifest(&path, 10.0).unwrap();
        assert_relative_eq!(entries[0].label.unwrap(), 10.0);
        assert!(read_prediction_manifest(&dir.join("missing.txt")).is_err());
    }
}
