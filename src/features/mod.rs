mod deep;
mod texture;

use std::path::Path;

use log::{debug, info};
use tch::{Device, Kind, Tensor};

use crate::{
    error::Result,
    input,
    tables::Tables,
    utils,
};

pub(crate) use self::deep::DeepBackbone;
pub(crate) use self::texture::{lbp_histogram, DEFAULT_POINTS, DEFAULT_RADIUS};

/// Names of the feature vector segments, in concatenation order.
pub(crate) const SEGMENTS: [&str; 4] = ["lbp", "deep", "gist", "semantic"];

pub(crate) struct ExtractOptions {
    pub(crate) lbp_points: i64,
    pub(crate) lbp_radius: f64,
    /// Computes deep features for images missing from the deep table
    pub(crate) backbone: Option<DeepBackbone>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            lbp_points: DEFAULT_POINTS,
            lbp_radius: DEFAULT_RADIUS,
            backbone: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FeatureVector {
    pub(crate) name: String,
    pub(crate) lbp: Vec<f32>,
    pub(crate) deep: Vec<f32>,
    pub(crate) gist: Vec<f32>,
    pub(crate) semantic: Vec<f32>,
}

impl FeatureVector {
    /// Segments in concatenation order.
    pub(crate) fn segments(&self) -> [&[f32]; 4] {
        [
            self.lbp.as_slice(),
            self.deep.as_slice(),
            self.gist.as_slice(),
            self.semantic.as_slice(),
        ]
    }

    /// Length of each segment in concatenation order.
    pub(crate) fn layout(&self) -> [usize; 4] {
        self.segments().map(<[f32]>::len)
    }

    pub(crate) fn len(&self) -> usize {
        self.layout().iter().sum()
    }

    /// The concatenated vector `lbp ++ deep ++ gist ++ semantic`.
    pub(crate) fn values(&self) -> Vec<f32> {
        self.segments().concat()
    }
}

pub(crate) fn to_vec(tensor: &Tensor) -> Vec<f32> {
    let tensor = tensor
        .to_kind(Kind::Float)
        .to_device(Device::Cpu)
        .contiguous();
    let mut values = vec![0f32; tensor.numel()];
    let numel = values.len();
    tensor.copy_data(&mut values, numel);
    values
}

/**
Build the feature vector of an image, joining it against the tables by file name.
 */
pub(crate) fn extract_feature_vector(
    path: &Path,
    tables: &Tables,
    options: &ExtractOptions,
) -> Result<FeatureVector> {
    let name = utils::image_name(path)?;
    info!("Extracting feature vector for image {}", name);

    debug!("Extracting LBP for {}", name);
    let gray = input::load_grayscale(path)?;
    let lbp = to_vec(&lbp_histogram(&gray, options.lbp_points, options.lbp_radius));

    debug!("Extracting deep features for {}", name);
    let deep = match (&options.backbone, tables.deep.contains(&name)) {
        (Some(backbone), false) => backbone.describe(path)?,
        _ => tables.deep.get(&name)?.to_vec(),
    };

    debug!("Extracting gist for {}", name);
    let gist = tables.gist.get(&name)?.to_vec();

    debug!("Extracting semantic features for {}", name);
    let semantic = tables.semantic.get(&name)?.to_vec();

    Ok(FeatureVector {
        name,
        lbp,
        deep,
        gist,
        semantic,
    })
}
