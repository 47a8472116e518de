pub mod error;
pub mod ux;

pub use clap::Parser;

use std::collections::BTreeMap;
use std::path::PathBuf;


/// Formatter used when `--formatter` is not given. Reads stdin, writes stdout.
pub const DEFAULT_FORMATTER: &str = "rustfmt --edition 2021 --emit stdout";


#[derive(Parser, Debug)]
#[command(name = "drill-tmpl", version, about = "Render JSON data through templates into formatted, generated source files.")]
pub struct Cli {
    #[arg(
        long = "data",
        help = "JSON file made available to templates as `In`.",
        env = "TMPL_DATA",
    )]
    pub data: PathBuf,

    #[arg(
        short = 'd',
        value_name = "NAME=VALUE",
        value_parser = parse_define,
        help = "Extra value made available to templates as `D.NAME`. May be repeated.",
    )]
    pub defines: Vec<(String, String)>,

    #[arg(
        long,
        help = "Command that formats generated source read from stdin and prints it to stdout.",
        env = "TMPL_FORMATTER",
        default_value = DEFAULT_FORMATTER,
    )]
    pub formatter: String,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Set level of verbosity. [default: INFO]\n\t-v: DEBUG\n\t-vv: TRACE\n--quiet takes precedence over --verbose."
    )]
    pub verbose: u8,

    #[arg(
        short,
        long,
        action = clap::ArgAction::SetTrue,
        help = "Disable all information logs (only ERROR level logs are shown).\n--quiet takes precedence over --verbose."
    )]
    pub quiet: bool,

    #[arg(
        required = true,
        value_name = "TEMPLATES",
        help = "Templates to render, either `in=out` or a path ending in `.tmpl` (written next to it without the extension).",
    )]
    pub templates: Vec<String>,
}

impl Cli {
    /// `-d` values by name. A repeated name keeps its last value.
    pub fn define_map(&self) -> BTreeMap<String, String> {
        self.defines.iter().cloned().collect()
    }
}

fn parse_define(value: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = value.split('=').collect();
    match parts.as_slice() {
        [name, value] => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {value}")),
    }
}
