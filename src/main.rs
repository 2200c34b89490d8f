use std::path::PathBuf;

use clap::Parser;
use marionette::scene::{ModelInstance, Models};
use tracing::{error, info};

#[derive(clap::Parser)]
struct Opts {
    /// Path to a .gltf or .glb file to play back.
    path: PathBuf,

    /// Name of the clip to play. Defaults to the first clip in the file.
    #[arg(long)]
    clip: Option<String>,

    /// Number of update steps to run.
    #[arg(long, default_value_t = 120)]
    steps: u32,

    /// Seconds advanced per step.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn main() {
    tracing_subscriber::fmt().init();

    let opts = Opts::parse();

    let mut models = Models::default();
    let handle = match models.load(&opts.path) {
        Ok(handle) => handle,
        Err(err) => {
            error!("Could not load {}: {err}", opts.path.display());
            std::process::exit(1);
        }
    };

    let mut instance = ModelInstance::new(handle, &models).expect("model was just loaded");
    let model = models.get(handle).expect("model was just loaded");

    for clip in model.clips() {
        info!("Clip {}: {:.3}s", clip.name(), clip.duration());
    }

    if let Some(clip) = &opts.clip {
        instance.set_animation(model, clip);
    }

    for _ in 0..opts.steps {
        instance.update(model, opts.dt);
    }

    info!(
        "Stepped {} x {:.4}s, clip time {:.3}s of {:.3}s",
        opts.steps,
        opts.dt,
        instance.current_time(model),
        instance.current_duration(model),
    );

    for (index, position) in instance.node_positions().iter().enumerate().take(8) {
        info!(
            "  node {index} {}: ({:.3}, {:.3}, {:.3})",
            model.hierarchy.node(index as u32).name,
            position.x,
            position.y,
            position.z
        );
    }
}
