use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use api_shared::{FileEntry, HealthService};
use filestore_core::{CoreConfig, FileStorageService, DEFAULT_STORAGE_DIR};

#[derive(Parser)]
#[command(name = "filestore")]
#[command(about = "File store administration CLI")]
struct Cli {
    /// Storage root directory
    #[arg(long, env = "FILES_STORAGE_PATH", default_value = DEFAULT_STORAGE_DIR)]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files, newest first
    List,
    /// Create or overwrite a file
    Create {
        /// Filename (a single path segment)
        filename: String,
        /// Text content (defaults to empty)
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Print a file's text content
    Read {
        /// Filename
        filename: String,
    },
    /// Delete a file
    Delete {
        /// Filename
        filename: String,
    },
    /// Check the storage root and print the health report as JSON
    Health,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cfg = Arc::new(CoreConfig::new(
        cli.storage_dir,
        std::env::var("POD_NAME").unwrap_or_default(),
        std::env::var("NODE_NAME").unwrap_or_default(),
    )?);
    let service = FileStorageService::new(cfg.clone());

    match cli.command {
        Commands::List => {
            let files = service.list()?;
            if files.is_empty() {
                println!("No files found.");
            } else {
                for file in files.into_iter().map(FileEntry::from) {
                    println!(
                        "{}\t{} bytes\t{}\t{}",
                        file.name, file.size, file.modified, file.mime_type
                    );
                }
            }
        }
        Commands::Create { filename, content } => {
            let filename = service.create(Some(&filename), &content)?;
            println!("File \"{}\" created successfully", filename);
        }
        Commands::Read { filename } => {
            print!("{}", service.read(&filename)?);
        }
        Commands::Delete { filename } => {
            let filename = service.delete(&filename)?;
            println!("File \"{}\" deleted successfully", filename);
        }
        Commands::Health => {
            let report = HealthService::new(cfg).check_health();
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_healthy() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_content() {
        let cli = Cli::try_parse_from([
            "filestore",
            "--storage-dir",
            "/tmp/files",
            "create",
            "notes.txt",
            "--content",
            "hello",
        ])
        .unwrap();

        assert_eq!(cli.storage_dir, PathBuf::from("/tmp/files"));
        match cli.command {
            Commands::Create { filename, content } => {
                assert_eq!(filename, "notes.txt");
                assert_eq!(content, "hello");
            }
            _ => panic!("expected create"),
        }
    }
}
