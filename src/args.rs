use std::{path::PathBuf, process::exit};
use clap::Parser;
use log::error;

use crate::{features, manifest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode{
    Image,
    Train,
    Predict,
}

impl std::str::FromStr for Mode{
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Mode::Image),
            "train" => Ok(Mode::Train),
            "predict" => Ok(Mode::Predict),
            _ => Err(format!("{} is not a valid mode (image, train or predict)", s)),
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct Args{
    /// Mode :
    /// image extracts a single image, train a `filename,label` manifest, predict a manifest of bare filenames
    pub mode: Mode,
    /// Input : the image (image mode) or the manifest (train and predict modes)
    pub input: PathBuf,
    /// Output file (polars compatible formats: csv, json, parquet, ipc)
    pub output: PathBuf,
    /// Image directory :
    /// the directory the manifest filenames are relative to
    #[clap(short, long, default_value = ".")]
    pub image_dir: PathBuf,
    /// Gist file : one `name:v1 v2 ...` line per image
    #[clap(long, default_value = "gists.txt")]
    pub gist: PathBuf,
    /// Semantic feature table (.pickle or .json) :
    /// a dict of image name to plain list of floats, numpy arrays have to be pickled with `.tolist()`
    #[clap(long, default_value = "semantic_features.pickle")]
    pub semantic: PathBuf,
    /// Deep feature table (.pickle or .json) :
    /// a dict of image name to plain list of floats, numpy arrays have to be pickled with `.tolist()`
    #[clap(long, default_value = "vgg.pickle")]
    pub deep: PathBuf,
    /// Deep model :
    /// torchscript backbone used for images missing from the deep feature table
    #[clap(long)]
    pub deep_model: Option<PathBuf>,
    /// Number of LBP sampling points
    #[clap(long, default_value_t = features::DEFAULT_POINTS)]
    pub lbp_points: i64,
    /// Radius of the LBP sampling circle (in pixels)
    #[clap(long, default_value_t = features::DEFAULT_RADIUS)]
    pub lbp_radius: f64,
    /// Label scale : training labels are divided by this value
    #[clap(long, default_value_t = manifest::DEFAULT_LABEL_SCALE)]
    pub label_scale: f32,
    /// Overwrite :
    /// if specified, will overwrite the output file if it already exists
    #[clap(short, long)]
    pub overwrite: bool,
    /// Thread count :
    /// the number of threads used by rayon
    /// if not specified, rayon will use the number of cores available on the machine
    #[clap(short, long)]
    pub thread_count: Option<usize>,
    /// gpu :
    /// if specified, will run the deep model on this gpu
    /// if not specified, will use the cpu
    #[clap(short, long)]
    pub gpu: Option<usize>,
    /// verbose :
    /// if specified, will print more information
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args{
    pub fn handle_verbose(&self){
        if !self.verbose{return}
        println!("Called Args :");
        println!("{:#?}", self);
    }

    pub fn handle_thread_count(&self){
        if let Some(thread_count) = self.thread_count {
            if let Err(err) = rayon::ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .build_global()
            {
                error!("Couldn't build the thread pool : {}", err);
                exit(1);
            }
        }
    }

    pub fn validate_paths(&self){
        let mut inputs = vec![
            ("Input", &self.input),
            ("Gist file", &self.gist),
            ("Semantic feature table", &self.semantic),
            ("Deep feature table", &self.deep),
        ];
        if let Some(deep_model) = &self.deep_model {
            inputs.push(("Deep model", deep_model));
        }
        for (what, path) in inputs {
            if !path.exists(){
                error!("{} does not exist : {:?}", what, path);
                exit(1);
            }
        }
        if self.mode != Mode::Image && !self.image_dir.is_dir(){
            error!("Image directory does not exist : {:?}", self.image_dir);
            exit(1);
        }

        if self.output.exists(){
            if !self.overwrite{
                error!("Output file already exists : {:?}\nUse --overwrite to overwrite it", self.output);
                exit(1);
            }
        }
    }

    pub fn validate_parameters(&self){
        if self.lbp_points < 1 {
            error!("LBP needs at least one sampling point, got {}", self.lbp_points);
            exit(1);
        }
        if !(self.lbp_radius > 0.0) {
            error!("LBP radius must be positive, got {}", self.lbp_radius);
            exit(1);
        }
        if self.label_scale == 0.0 {
            error!("Label scale must not be zero");
            exit(1);
        }
    }

    pub fn validate_gpu(&self){
        if let Some(gpu) = self.gpu{
            if !tch::Cuda::is_available() {
                error!("No GPU available\nCheck that CUDA is installed and that your GPU is compatible with CUDA\nCheck that you specified the right version of libtorch in LIBTORCH and LD_LIBRARY_PATH");
                exit(1);
            }
            let device_count = tch::Cuda::device_count();
            if gpu >= device_count as usize{
                error!("GPU {} does not exist", gpu);
                exit(1);
            }
        }
    }

    pub fn device(&self) -> tch::Device {
        match self.gpu {
            Some(gpu) => tch::Device::Cuda(gpu),
            None => tch::Device::Cpu,
        }
    }
}

lazy_static::lazy_static! {
    pub static ref ARGS: Args = Args::parse();
}
