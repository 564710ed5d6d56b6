mod args;
mod error;
mod features;
mod input;
mod manifest;
mod output;
mod pipeline;
mod tables;
mod utils;

use std::process::exit;

use args::{Args, Mode, ARGS};
use features::{extract_feature_vector, DeepBackbone, ExtractOptions};
use log::{error, info};
use tables::Tables;

fn init_logger(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(args: &Args) -> error::Result<()> {
    let tables = Tables::load(&args.gist, &args.semantic, &args.deep)?;

    let backbone = match &args.deep_model {
        Some(path) => {
            info!("Loading deep model {:?} on {:?}", path, args.device());
            Some(DeepBackbone::load(path, args.device())?)
        }
        None => None,
    };
    let options = ExtractOptions {
        lbp_points: args.lbp_points,
        lbp_radius: args.lbp_radius,
        backbone,
    };

    let mut df = match args.mode {
        Mode::Image => {
            let vector = extract_feature_vector(&args.input, &tables, &options)?;
            info!("{} features for {}", vector.len(), vector.name);
            output::to_dataframe(&[vector], None)?
        }
        Mode::Train => {
            let (features, labels) = pipeline::get_features(
                &args.input,
                &args.image_dir,
                &tables,
                &options,
                args.label_scale,
            )?;
            output::to_dataframe(&features, Some(labels.as_slice()))?
        }
        Mode::Predict => {
            let features =
                pipeline::get_prediction_features(&args.input, &args.image_dir, &tables, &options)?;
            output::to_dataframe(&features, None)?
        }
    };

    output::save(&mut df, &args.output)?;
    info!("Wrote {} rows to {:?}", df.height(), args.output);
    Ok(())
}

fn main() {
    let args = &*ARGS;
    init_logger(args.verbose);
    args.handle_verbose();
    args.handle_thread_count();
    args.validate_paths();
    args.validate_parameters();
    args.validate_gpu();

    if let Err(err) = run(args) {
        error!("{}", err);
        exit(1);
    }
}
