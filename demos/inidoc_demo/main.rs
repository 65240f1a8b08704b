//! # inidoc demo application
//!
//! A small CLI that edits an INI file through [`IniSettings`] and the clap
//! adapter. It exists to demonstrate and manually verify inidoc's features:
//! point it at a hand-written file, change a value, and diff the result.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example inidoc_demo -- --file demo.ini set Greeting "Hello World"
//! cargo run --example inidoc_demo -- --file demo.ini -s Net set Port 8080
//! cargo run --example inidoc_demo -- --file demo.ini list
//! RUST_LOG=inidoc=trace cargo run --example inidoc_demo -- --file demo.ini sections
//! ```
//!
//! Without `--file`, the demo uses `inidoc-demo.ini` in the platform config
//! directory.

use std::path::{Path, PathBuf};

use clap::Parser;

use inidoc::{IniArgs, IniSettings, IniSettingsBuilder, SearchPath};

/// inidoc demo: edit INI files without losing comments or layout.
#[derive(Parser, Debug)]
#[command(name = "inidoc-demo")]
struct Cli {
    /// Settings file to operate on.
    #[arg(long, short, global = true)]
    file: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    settings: IniArgs,
}

fn make_builder(file: Option<&Path>) -> IniSettingsBuilder {
    let builder = IniSettings::builder().app_name("inidoc-demo");
    let Some(file) = file else {
        return builder;
    };

    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => SearchPath::Path(parent.to_path_buf()),
        _ => SearchPath::Cwd,
    };
    match file.file_name().and_then(|name| name.to_str()) {
        Some(name) => builder.location(dir).file_name(name),
        None => builder.location(dir),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let builder = make_builder(cli.file.as_deref());
    let action = cli.settings.into_action();

    let output = builder
        .handle(&action)
        .and_then(|result| {
            if cli.json {
                result.to_json()
            } else {
                Ok(result.to_string())
            }
        });
    match output {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Settings error:\n{e}");
            std::process::exit(1);
        }
    }
}
