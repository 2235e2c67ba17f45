//! CLI entry point for `layer-sql`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use layer_sql::parse_layer_sql;

#[derive(Parser)]
#[command(
    name = "layer-sql",
    about = "Inspect rendered dbt SQL for embedded layer.train/predict/automl calls"
)]
struct Cli {
    /// Input SQL file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed JSON
    #[arg(long)]
    compact: bool,
}

fn main() {
    let cli = Cli::parse();

    let sql = match read_input(cli.input.as_deref()) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(2);
        }
    };

    match parse_layer_sql(&sql) {
        Ok(Some(command)) => {
            let rendered = if cli.compact {
                serde_json::to_string(&command)
            } else {
                serde_json::to_string_pretty(&command)
            };
            match rendered {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing command: {e}");
                    process::exit(1);
                }
            }
        }
        Ok(None) => {
            eprintln!("Not a layer statement; execute the SQL unmodified");
        }
        Err(e) => {
            eprintln!("Layer SQL parse error: {e}");
            process::exit(1);
        }
    }
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
