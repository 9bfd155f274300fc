//! Prints the WGSL prelude generated from the host interface.
//!
//! With `--foveation`, the override defaults are baked from the streamer's
//! foveation settings for the given eye size.

use std::path::PathBuf;

use alvr_shader_types::{
    calculate_foveation_vars, shader, FoveationSettings, FunctionConstantValues, ShaderTypesError,
};
use clap::Parser;

/// ALVR shader prelude generator.
#[derive(Parser, Debug)]
#[command(
    name = "alvr-shader-prelude",
    version,
    about = "Print the WGSL declarations of the ALVR shader interface"
)]
struct Args {
    /// Per-eye view width in pixels.
    #[arg(long, requires = "foveation")]
    view_width: Option<u32>,

    /// Per-eye view height in pixels.
    #[arg(long, requires = "foveation")]
    view_height: Option<u32>,

    /// Streamer foveation settings (JSON).
    #[arg(long, requires_all = ["view_width", "view_height"])]
    foveation: Option<PathBuf>,

    /// Write to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), ShaderTypesError> {
    let values = match (&args.foveation, args.view_width, args.view_height) {
        (Some(path), Some(width), Some(height)) => {
            let settings = FoveationSettings::from_json(&std::fs::read_to_string(path)?)?;
            let vars = calculate_foveation_vars(width, height, Some(&settings))?;
            FunctionConstantValues::from_foveation(&vars)
        }
        _ => FunctionConstantValues::new(),
    };

    let prelude = shader::wgsl_prelude_with(&values);

    match &args.output {
        Some(path) => {
            std::fs::write(path, prelude)?;
            log::info!("Wrote shader prelude to {}", path.display());
        }
        None => print!("{prelude}"),
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    alvr_shader_types::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
