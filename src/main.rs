// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use exercise_animation::cli::args::{Cli, Commands};
use exercise_animation::cli::commands::{run_stage, run_synth};
use exercise_animation::error;
use exercise_animation::pipeline::Stage;

fn main() {
    let cli = Cli::parse();

    // number of failed exercises
    let result = match &cli.command {
        Commands::Synth(args) => run_synth(args).map(|()| 0),
        Commands::Project(args) => run_stage(args, Stage::Project).map(|s| s.failed),
        Commands::Render(args) => run_stage(args, Stage::Render(args.format)).map(|s| s.failed),
        Commands::Run(args) => run_stage(args, Stage::Full(args.format)).map(|s| s.failed),
    };

    match result {
        Ok(0) => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
