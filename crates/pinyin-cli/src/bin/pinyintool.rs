use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pinyin_cli::commands::{build_ops, config_ops, inspect_ops};
use pinyin_cli::trace_init;

#[derive(Parser)]
#[command(name = "pinyintool", about = "Pinyin data merge and compact table build tool")]
struct Cli {
    /// Write JSON trace events to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge source layers and write every artifact
    Build {
        /// Settings TOML (default: embedded settings)
        #[arg(long)]
        settings: Option<String>,
        /// Keyboard scheme TOML (default: embedded Xiaohe)
        #[arg(long)]
        scheme: Option<String>,
        /// Directory holding the layer files
        input_dir: String,
        /// Directory the artifacts are written to
        output_dir: String,
    },
    /// Show base form, tone-numbered form and shorthand of readings
    Encode {
        /// Keyboard scheme TOML (default: embedded Xiaohe)
        #[arg(long)]
        scheme: Option<String>,
        /// Print JSON instead of tab-separated lines
        #[arg(long)]
        json: bool,
        /// Readings, with or without tone marks
        #[arg(required = true)]
        readings: Vec<String>,
    },
    /// Show counts of a binary compact table file
    Info {
        /// Compact table (.bin) file
        file: String,
    },
    /// Decode the readings of characters from a binary compact table file
    Lookup {
        /// Compact table (.bin) file
        file: String,
        /// Characters, or U+XXXX codepoints
        #[arg(required = true)]
        chars: Vec<String>,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Export the default keyboard scheme as TOML
    SchemeExport,
    /// Validate a custom keyboard scheme TOML file
    SchemeValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let _guard = trace_init::init_tracing(cli.log_file.as_deref());

    match cli.command {
        Command::Build {
            settings,
            scheme,
            input_dir,
            output_dir,
        } => build_ops::build(
            settings.as_deref(),
            scheme.as_deref(),
            &input_dir,
            &output_dir,
        ),
        Command::Encode {
            scheme,
            json,
            readings,
        } => inspect_ops::encode(&readings, scheme.as_deref(), json),
        Command::Info { file } => inspect_ops::info(&file),
        Command::Lookup { file, chars } => inspect_ops::lookup(&file, &chars),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
        Command::SchemeExport => config_ops::scheme_export(),
        Command::SchemeValidate { file } => config_ops::scheme_validate(&file),
    }
}
