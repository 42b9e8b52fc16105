mod app;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use sprig_engine::canvas::Canvas;
use sprig_engine::device::GpuInit;
use sprig_engine::logging::{init_logging, LoggingConfig};
use sprig_engine::window::{Runtime, RuntimeConfig};
use sprig_host::{EngineContext, ProjectManifest};

use crate::app::PlayerApp;

#[derive(Parser, Debug)]
#[command(name = "sprig", version, about = "Runs a sprig game project", long_about = None)]
struct Cli {
    /// Project manifest to run
    #[arg(short = 'p', long = "pf", value_name = "MANIFEST")]
    project_file: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version go to stdout and are not failures.
            let failed = err.use_stderr();
            let _ = err.print();
            return if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    init_logging(LoggingConfig::default().with_verbosity(cli.verbose));

    match run(&cli.project_file) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(manifest_path: &Path) -> Result<ExitCode> {
    let manifest = ProjectManifest::load(manifest_path)?;
    let root = manifest_path.parent().unwrap_or(Path::new("")).to_path_buf();

    let config = RuntimeConfig {
        title: manifest.title.clone(),
        initial_size: LogicalSize::new(f64::from(manifest.width), f64::from(manifest.height)),
        ..RuntimeConfig::default()
    };

    let canvas = Rc::new(RefCell::new(Canvas::new()));
    let engine = EngineContext::boot_with(root, manifest, Rc::clone(&canvas))?;

    let app = PlayerApp::new(canvas, engine);
    let failure = app.failure();
    Runtime::run(config, GpuInit::default(), app).context("window runtime failed")?;

    match failure.take() {
        Some(err) => {
            eprintln!("error: {err}");
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn manifest_flag_is_required() {
        let err = Cli::try_parse_from(["sprig"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());
    }

    #[test]
    fn long_and_short_forms() {
        let cli = Cli::try_parse_from(["sprig", "--pf", "game/project.xml"]).unwrap();
        assert_eq!(cli.project_file, PathBuf::from("game/project.xml"));
        assert_eq!(cli.verbose, 0);

        let cli = Cli::try_parse_from(["sprig", "-p", "x.xml", "-vv"]).unwrap();
        assert_eq!(cli.project_file, PathBuf::from("x.xml"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn help_is_not_a_failure() {
        let err = Cli::try_parse_from(["sprig", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn missing_manifest_fails_before_any_window() {
        let err = run(Path::new("/no/such/project.xml")).unwrap_err();
        assert!(format!("{err:#}").contains("project manifest not found"));
    }
}
