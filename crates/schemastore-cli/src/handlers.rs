//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

use crate::cli::{Cli, CompletionsArgs, ConfigAction, ConfigArgs, FindArgs, LoadAllArgs};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use clap::CommandFactory;
use schemastore::{SchemaStore, StoreStats};
use serde::Serialize;
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Machine-readable result of the find command
#[derive(Debug, Serialize)]
struct FindReport {
    name: String,
    schema: Value,
    stats: StoreStats,
}

/// Machine-readable result of the load-all command
#[derive(Debug, Serialize)]
struct LoadReport {
    root: PathBuf,
    schemas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<StoreStats>,
}

/// Open a store for the configured root
fn open_store(config: &Config) -> Result<SchemaStore> {
    let store = SchemaStore::from_config(config.store.clone())?;
    info!(root = %store.root().display(), extension = %store.config().extension, "Opened schema store");
    Ok(store)
}

/// Handle the find command
pub fn handle_find(args: FindArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let mut store = open_store(config)?;

    let schema = {
        let _timer = Timer::new("find");
        store.find(&args.name, args.namespace.as_deref())?
    };
    let name = schemastore::loader::make_fullname(&args.name, args.namespace.as_deref())?;
    let document = schema.to_json();

    if !output.is_human() {
        return if args.stats {
            output.data(&FindReport {
                name,
                schema: document,
                stats: store.stats(),
            })
        } else {
            output.data(&document)
        };
    }

    output.section(&name)?;
    output.data(&document)?;

    if store.len() > 1 {
        let dependencies: Vec<String> = store
            .names()
            .into_iter()
            .filter(|cached| *cached != name)
            .map(str::to_string)
            .collect();
        output.section("Also resolved")?;
        output.names(&dependencies)?;
    }

    if args.stats {
        output.section("Statistics")?;
        output.stats(&store.stats())?;
    }
    Ok(())
}

/// Handle the load-all command
pub fn handle_load_all(args: LoadAllArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let mut store = open_store(config)?;

    let schemas = {
        let _timer = Timer::new("load_all");
        store.load_all()?
    };

    if !output.is_human() {
        return output.data(&LoadReport {
            root: store.root().to_path_buf(),
            schemas,
            stats: args.stats.then(|| store.stats()),
        });
    }

    output.success(&format!(
        "Loaded {} schema file(s) from {} ({} schemas cached)",
        schemas.len(),
        store.root().display(),
        store.len()
    ))?;
    output.names(&schemas)?;

    if args.stats {
        output.section("Statistics")?;
        output.stats(&store.stats())?;
    }
    Ok(())
}

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            output.section("Effective configuration")?;
            output.data(config)
        }
        ConfigAction::Paths => {
            let paths: Vec<String> = Config::default_config_paths()
                .into_iter()
                .map(|path| path.display().to_string())
                .collect();

            if output.is_human() {
                output.section("Configuration search paths")?;
                output.names(&paths)
            } else {
                output.data(&paths)
            }
        }
    }
}

/// Handle the completions command
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    clap_complete::generate(args.shell.to_clap_shell(), &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::error::Error;
    use schemastore::{StoreConfig, StoreError};
    use std::fs;
    use tempfile::tempdir;

    fn config_for(root: &std::path::Path) -> Config {
        Config {
            store: StoreConfig::new(root),
            ..Config::default()
        }
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, true, Box::new(io::sink()))
    }

    #[test]
    fn test_find_requires_root() {
        let err = handle_find(
            FindArgs {
                name: "a".to_string(),
                namespace: None,
                stats: false,
            },
            &Config::default(),
            &mut quiet_output(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Store(StoreError::MissingRoot)));
    }

    #[test]
    fn test_find_missing_schema_exit_code() {
        let dir = tempdir().unwrap();
        let err = handle_find(
            FindArgs {
                name: "Missing".to_string(),
                namespace: Some("com.example".to_string()),
                stats: true,
            },
            &config_for(dir.path()),
            &mut quiet_output(),
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_all_and_find() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("com")).unwrap();
        fs::write(
            dir.path().join("com").join("Id.avsc"),
            r#"{"type": "fixed", "name": "com.Id", "size": 8}"#,
        )
        .unwrap();
        let config = config_for(dir.path());

        handle_load_all(LoadAllArgs { stats: true }, &config, &mut quiet_output()).unwrap();
        handle_find(
            FindArgs {
                name: "Id".to_string(),
                namespace: Some("com".to_string()),
                stats: false,
            },
            &config,
            &mut quiet_output(),
        )
        .unwrap();
    }
}
