//! Convert command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, ComposerConfig};
use crate::export::{export_all, ArchiveSelection, ExportError, ExportOptions, ExportRequest};
use crate::palette::PaletteDirection;
use crate::pipeline::{ProcessOptions, SourcePaths};
use crate::task::ConversionTask;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of `composer convert`
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub front: PathBuf,
    pub back: PathBuf,
    pub shiny: PathBuf,
    pub name: String,
    pub credits: Option<String>,
    pub output: Option<PathBuf>,
    pub swap: bool,
    pub tolerance: Option<u8>,
    pub no_legacy: bool,
    pub no_modern: bool,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

impl ConvertArgs {
    /// Flags left at their defaults do not override the config file.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            tolerance: self.tolerance,
            out: self.output.clone(),
            swap_palette: self.swap.then_some(true),
            modern: self.no_modern.then_some(false),
            legacy: self.no_legacy.then_some(false),
            credits: self.credits.clone(),
        }
    }
}

fn resolve_config(args: &ConvertArgs) -> Result<ComposerConfig, String> {
    let mut config = load_config(args.config.as_deref()).map_err(|e| e.to_string())?;
    merge_cli_overrides(&mut config, &args.overrides());

    let errors = config.validate();
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))
    }
}

/// Execute the convert command
pub fn run_convert(args: &ConvertArgs) -> ExitCode {
    if args.name.trim().is_empty() {
        eprintln!("Error: --name must not be empty");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let paths = SourcePaths::new(&args.front, &args.back, &args.shiny);
    let options = ProcessOptions { tolerance: config.conversion.tolerance };
    let verbose = args.verbose;
    let task = ConversionTask::spawn(paths, options);
    let cancel = task.cancel_token();
    let conversion = match task.wait_with(&mut |fraction| {
        if verbose {
            eprintln!("[{:>3.0}%] converting", fraction * 100.0);
        }
    }) {
        Ok(conversion) => conversion,
        Err(e) => {
            eprintln!("Error: {} ({})", e, e.kind());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let request = ExportRequest::new(
        &conversion,
        PaletteDirection::from_swap(config.export.swap_palette),
        args.name.trim(),
        config.export.credits.as_str(),
        config.export.out.as_path(),
    );
    let selection = ArchiveSelection { modern: config.export.modern, legacy: config.export.legacy };
    let options = ExportOptions { pretty: config.export.pretty_json };

    match export_all(&request, selection, &options, &cancel) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e @ ExportError::InvalidName(_)) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
