//! imgfilter CLI - apply one named filter to an image file.

use anyhow::{Context, Result};
use imgfilter::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Bad command line; reported with exit code 2.
#[derive(Error, Debug)]
#[error("{0}")]
struct UsageError(String);

/// Parsed arguments of the `apply` command.
#[derive(Debug)]
struct ApplyArgs {
    input: PathBuf,
    output: PathBuf,
    filter: String,
    config: Option<PathBuf>,
    json: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("imgfilter");

    let json = args.iter().any(|a| a == "--json");
    match run(program, &args[1.min(args.len())..]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if json {
                println!("{}", error_json(&error));
            } else {
                eprintln!("❌ Error: {:#}", error);
                if let Some(fix) = error.downcast_ref::<PipelineError>().and_then(|e| e.suggested_fix()) {
                    eprintln!("   {}", fix);
                }
                if error.downcast_ref::<UsageError>().is_some() {
                    eprintln!();
                    print_usage(program);
                }
            }
            ExitCode::from(exit_code(&error))
        }
    }
}

fn run(program: &str, args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage(program);
        return Ok(());
    };

    match command.as_str() {
        "apply" => {
            let apply = parse_apply(&args[1..])?;
            apply_filter(apply)
        }
        "list" => {
            init_logging(&ToolConfig::default());
            list_filters();
            Ok(())
        }
        "info" => {
            let Some(name) = args.get(1) else {
                return Err(UsageError("Please specify a filter name".to_string()).into());
            };
            init_logging(&ToolConfig::default());
            filter_info(name)
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => Err(UsageError(format!("Unknown command: {}", other)).into()),
    }
}

fn print_usage(program: &str) {
    println!("imgfilter v{}", imgfilter::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  apply <input> <output> <filter>  Apply a filter and save the result");
    println!("  list                             List all available filters");
    println!("  info <filter>                    Show details about a filter");
    println!("  help                             Show this help message");
    println!();
    println!("Apply options:");
    println!("  --config <file>   Read settings from a TOML file");
    println!("  --json            Print the run summary (or error) as JSON");
    println!();
    println!("Set RUST_LOG to override the configured log level.");
}

fn parse_apply(args: &[String]) -> Result<ApplyArgs> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let Some(path) = args.get(i + 1) else {
                    return Err(UsageError("--config requires a file path".to_string()).into());
                };
                config = Some(PathBuf::from(path));
                i += 2;
            }
            "--json" => {
                json = true;
                i += 1;
            }
            flag if flag.starts_with("--") => {
                return Err(UsageError(format!("Unknown option: {}", flag)).into());
            }
            value => {
                positional.push(value.to_string());
                i += 1;
            }
        }
    }

    let [input, output, filter]: [String; 3] = positional.try_into().map_err(|found: Vec<String>| {
        UsageError(format!(
            "apply expects <input> <output> <filter>, got {} argument(s)",
            found.len()
        ))
    })?;

    Ok(ApplyArgs {
        input: PathBuf::from(input),
        output: PathBuf::from(output),
        filter,
        config,
        json,
    })
}

fn init_logging(config: &ToolConfig) {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn apply_filter(args: ApplyArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ToolConfig::from_file(path)?,
        None => ToolConfig::default(),
    };
    init_logging(&config);

    let registry = FilterRegistry::with_builtins();
    let options = PipelineOptions::new()
        .with_save_options(config.save_options())
        .with_progress(|update| {
            if let ProgressUpdate::StepCompleted { step, duration_ms, index, total } = update {
                log::debug!("Step {}/{} ({}) finished in {} ms", index, total, step, duration_ms);
            }
        });

    let summary = Pipeline::new(&registry)
        .with_options(options)
        .run(&args.input, &args.output, &args.filter)
        .with_context(|| format!("Applying '{}' to {}", args.filter, args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("✅ {}", summary);
    }
    Ok(())
}

fn list_filters() {
    let registry = FilterRegistry::with_builtins();
    let grouped = registry.grouped_by_category();

    println!("Available filters ({} total):", registry.len());
    println!();

    for (category, filters) in grouped {
        println!("  📁 {}", category.display_name());
        for metadata in filters {
            println!("      • {} - {}", metadata.id, metadata.description);
        }
        println!();
    }
}

fn filter_info(name: &str) -> Result<()> {
    let registry = FilterRegistry::with_builtins();
    let filter = registry.resolve(name)?;
    let metadata = filter.metadata();

    println!("Filter: {}", metadata.name);
    println!("ID: {}", metadata.id);
    println!("Category: {}", metadata.category.display_name());
    println!();
    println!("Description:");
    println!("  {}", metadata.description);
    if !metadata.tags.is_empty() {
        println!();
        println!("Tags: {}", metadata.tags.join(", "));
    }
    Ok(())
}

fn exit_code(error: &anyhow::Error) -> u8 {
    if error.downcast_ref::<UsageError>().is_some() {
        return 2;
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return 6;
    }
    if error.downcast_ref::<RegistryError>().is_some() {
        return 3;
    }
    match error.downcast_ref::<PipelineError>().map(PipelineError::stage) {
        Some(Stage::Resolve) => 3,
        Some(Stage::Load) => 4,
        Some(Stage::Save) => 5,
        None => 1,
    }
}

fn error_json(error: &anyhow::Error) -> serde_json::Value {
    let pipeline = error.downcast_ref::<PipelineError>();
    serde_json::json!({
        "error": format!("{:#}", error),
        "kind": pipeline.map(PipelineError::kind),
        "stage": pipeline.map(PipelineError::stage),
        "suggested_fix": pipeline.and_then(PipelineError::suggested_fix),
        "exit_code": exit_code(error),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_apply() {
        let args = parse_apply(&strings(&["in.png", "--json", "out.png", "sepia"])).unwrap();
        assert_eq!(args.input, PathBuf::from("in.png"));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.filter, "sepia");
        assert!(args.json);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_apply_with_config() {
        let args = parse_apply(&strings(&["a.png", "b.png", "blur", "--config", "tool.toml"])).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("tool.toml")));
    }

    #[test]
    fn test_parse_apply_usage_errors() {
        for bad in [
            vec!["in.png", "out.png"],
            vec!["in.png", "out.png", "blur", "extra"],
            vec!["in.png", "out.png", "blur", "--config"],
            vec!["in.png", "out.png", "blur", "--radius"],
        ] {
            let error = parse_apply(&strings(&bad)).unwrap_err();
            assert_eq!(exit_code(&error), 2, "{:?}", bad);
        }
    }

    #[test]
    fn test_exit_codes() {
        let unknown: anyhow::Error = PipelineError::from(RegistryError::UnknownFilter {
            name: "x".to_string(),
            available: vec![],
        })
        .into();
        assert_eq!(exit_code(&unknown), 3);

        let missing = anyhow::Error::from(PipelineError::from(HandleError::NotFound {
            path: PathBuf::from("in.png"),
        }))
        .context("Applying 'blur' to in.png");
        assert_eq!(exit_code(&missing), 4);

        let save: anyhow::Error = PipelineError::from(HandleError::NoImageLoaded).into();
        assert_eq!(exit_code(&save), 5);

        let config: anyhow::Error = ConfigError::Invalid {
            key: "log_level".to_string(),
            reason: "bad".to_string(),
        }
        .into();
        assert_eq!(exit_code(&config), 6);
    }

    #[test]
    fn test_error_json() {
        let error: anyhow::Error = PipelineError::from(HandleError::NotFound {
            path: PathBuf::from("in.png"),
        })
        .into();
        let json = error_json(&error);
        assert_eq!(json["kind"], "not_found");
        assert_eq!(json["stage"], "load");
        assert_eq!(json["exit_code"], 4);
    }
}
