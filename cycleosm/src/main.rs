use clap::{Parser, Subcommand};
use cycleosm::{
    app::{process_regions, RunOptions},
    config::{CycleOsmConfiguration, CycleOsmContext},
    model::CycleOsmCliError,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CycleOsmAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    Run {
        #[arg(long, help = "path to .toml or .json file with cycleosm run parameters")]
        configuration_file: String,
        #[arg(long, help = "output path, one directory is written per region")]
        output_directory: String,
        #[arg(long, help = "worker count, overrides the configured parallelism")]
        parallelism: Option<usize>,
        #[arg(required = true, help = "paths to .pbf files, one per region")]
        pbf_files: Vec<String>,
    },
}

pub fn run(app: &App) -> Result<(), CycleOsmCliError> {
    env_logger::init();
    match app {
        App::Run {
            configuration_file,
            output_directory,
            parallelism,
            pbf_files,
        } => {
            log::info!("reading cycleosm configuration from {configuration_file}");
            let conf = CycleOsmConfiguration::try_from(configuration_file)?;
            let context = CycleOsmContext::try_from(&conf)?;
            let options = RunOptions {
                parallelism: parallelism.or(conf.parallelism),
                write_nodes: conf.write_nodes,
                overwrite: conf.overwrite,
            };
            let out_path = Path::new(output_directory);
            std::fs::create_dir_all(out_path)?;
            let files = pbf_files.iter().map(PathBuf::from).collect::<Vec<_>>();

            let results = process_regions(&files, out_path, &context, &options)?;
            let mut failed: usize = 0;
            for result in results.iter() {
                match &result.output {
                    Ok(summary) => eprintln!(
                        "{}: {} ways, {} nodes, {} cells, {} issues",
                        summary.name, summary.ways, summary.nodes, summary.cells, summary.issues
                    ),
                    Err(e) => {
                        failed += 1;
                        log::error!("cycleosm failed on {}: {e}", result.pbf_file.to_string_lossy());
                    }
                }
            }
            if failed > 0 {
                Err(CycleOsmCliError::RegionsFailed {
                    failed,
                    total: results.len(),
                })
            } else {
                eprintln!("finished.");
                Ok(())
            }
        }
    }
}

fn main() {
    let args = CycleOsmAppArguments::parse();
    if let Err(e) = run(&args.app) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
