//! Recast CLI binary.
//!
//! All file I/O, logging and batch bookkeeping lives here; the conversion
//! crates never touch the filesystem or a console.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use recast_convert::{
    CollectionConverter, ConvertOptions, Conversion, ExportFormat, export_collection,
    export_environment,
};
use recast_domain::error::ConvertError;
use recast_domain::rule::RuleSet;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Convert Postman collections and environments to Insomnia v4 exports.
#[derive(Parser, Debug)]
#[command(name = "recast", version, about)]
struct Cli {
    /// Input documents (Postman collection or environment JSON).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory; defaults to each input's directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output flavor.
    #[arg(long, value_enum, default_value = "yaml")]
    format: OutputFormat,

    /// Extra rule set file (JSON or YAML), merged over the built-ins.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Skip the pre-parse rule pass.
    #[arg(long)]
    no_preprocess: bool,

    /// Skip the post-translation rule pass.
    #[arg(long)]
    no_postprocess: bool,

    /// Include the experimental rule subset.
    #[arg(long)]
    experimental: bool,

    /// Attach collection items directly to the workspace root instead of
    /// wrapping them in a same-named folder.
    #[arg(long)]
    no_root_folder: bool,

    /// Report what each input would produce without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Deterministic pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Convert(#[from] ConvertError),
    #[error("{0}")]
    Export(#[from] recast_convert::ExportError),
    #[error("rule set {}: {message}", .path.display())]
    Rules { path: PathBuf, message: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let rules = match cli.rules.as_deref().map(load_rules).transpose() {
        Ok(rules) => rules,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let converter = CollectionConverter::new(ConvertOptions {
        preprocess: !cli.no_preprocess,
        postprocess: !cli.no_postprocess,
        experimental: cli.experimental,
        root_folder: !cli.no_root_folder,
        rules,
    });
    let format = ExportFormat::from(cli.format);

    let mut converted = 0_usize;
    let mut failed = 0_usize;
    for input in &cli.inputs {
        let outcome = if cli.dry_run {
            preview(&converter, input)
        } else {
            process(&converter, input, cli.output.as_deref(), format).map(|path| {
                tracing::info!("{} -> {}", input.display(), path.display());
            })
        };
        match outcome {
            Ok(()) => converted += 1,
            Err(err) => {
                tracing::error!("{}: {err}", input.display());
                failed += 1;
            }
        }
    }

    tracing::info!("{converted} converted, {failed} failed");
    if converted == 0 && failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Reports what one input would produce, writing nothing.
fn preview(converter: &CollectionConverter, input: &Path) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(input)?;
    let preview = converter.preview(&raw)?;
    tracing::info!(
        "{}: {} '{}' ({} folders, {} requests, {} variables, {} warnings)",
        input.display(),
        preview.kind.label(),
        preview.name,
        preview.folder_count,
        preview.request_count,
        preview.variable_count,
        preview.warnings.len(),
    );
    Ok(())
}

/// Converts one input file and writes the export next to it (or into the
/// requested output directory).
fn process(
    converter: &CollectionConverter,
    input: &Path,
    output_dir: Option<&Path>,
    format: ExportFormat,
) -> Result<PathBuf, CliError> {
    let raw = std::fs::read_to_string(input)?;

    let (name, document, warnings) = match converter.convert(&raw)? {
        Conversion::Collection(built) => {
            let document = export_collection(&built, format)?;
            (built.name, document, built.warnings)
        }
        Conversion::Environment(env) => {
            let document = export_environment(&env, format)?;
            (env.name, document, env.warnings)
        }
    };

    for warning in &warnings {
        tracing::warn!("{name}: {warning}");
    }

    let path = output_path(input, output_dir, format);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, document)?;
    Ok(path)
}

fn output_path(input: &Path, output_dir: Option<&Path>, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "converted".to_string(), |s| s.to_string_lossy().into_owned());
    let file_name = format!("{stem}.insomnia.{}", format.extension());
    let dir = output_dir.map_or_else(
        || input.parent().map_or_else(PathBuf::new, Path::to_path_buf),
        Path::to_path_buf,
    );
    dir.join(file_name)
}

/// Loads a rule set from JSON or YAML, judged by extension.
fn load_rules(path: &Path) -> Result<RuleSet, CliError> {
    let text = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );

    let parsed = if is_yaml {
        serde_yaml::from_str(&text).map_err(|err| err.to_string())
    } else {
        serde_json::from_str(&text).map_err(|err| err.to_string())
    };

    parsed.map_err(|message| CliError::Rules {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_output_path_next_to_input() {
        let path = output_path(
            Path::new("/data/shop.postman_collection.json"),
            None,
            ExportFormat::Yaml,
        );
        assert_eq!(
            path,
            Path::new("/data/shop.postman_collection.insomnia.yaml")
        );
    }

    #[test]
    fn test_output_path_with_directory_and_json() {
        let path = output_path(
            Path::new("shop.json"),
            Some(Path::new("/out")),
            ExportFormat::Json,
        );
        assert_eq!(path, Path::new("/out/shop.insomnia.json"));
    }

    #[test]
    fn test_load_rules_json_and_yaml() {
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(
            json_file,
            r#"{{"preprocessRules": [{{"name": "a", "pattern": "x", "replacement": "y"}}]}}"#
        )
        .unwrap();
        let rules = load_rules(json_file.path()).unwrap();
        assert_eq!(rules.preprocess_rules.len(), 1);

        let mut yaml_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            yaml_file,
            "postprocessRules:\n  - name: b\n    pattern: p\n    replacement: q\n"
        )
        .unwrap();
        let rules = load_rules(yaml_file.path()).unwrap();
        assert_eq!(rules.postprocess_rules.len(), 1);
    }

    #[test]
    fn test_load_rules_reports_path_on_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, "not json").unwrap();
        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Rules { .. }));
    }

    #[test]
    fn test_batch_continues_after_one_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(
            &good,
            r#"{"info": {"name": "Ok", "schema": "v2.1"}, "item": []}"#,
        )
        .unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{broken").unwrap();

        let converter = CollectionConverter::default();
        let results = [&bad, &good]
            .iter()
            .map(|input| process(&converter, input, None, ExportFormat::Yaml))
            .collect::<Vec<_>>();

        assert!(results[0].is_err());
        let out = results[1].as_ref().unwrap();
        assert!(out.ends_with("good.insomnia.yaml"));
        assert!(out.exists());
    }
}
