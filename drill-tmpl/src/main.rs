mod cli;
mod generate;

use cli::{error::TmplError, Cli, Parser};
use generate::{TemplateData, TemplatePath};


fn run(args: &Cli) -> Result<(), TmplError> {
    // Resolve every path before writing anything.
    let paths = args.templates
        .iter()
        .map(|arg| TemplatePath::parse(arg))
        .collect::<Result<Vec<_>, _>>()?;

    let data = TemplateData {
        input: generate::read_data(&args.data)?,
        defines: args.define_map(),
    };

    tracing::debug!("Loaded data from '{}'", args.data.display());

    generate::process(&data, &paths, &args.formatter)
}

fn main() {
    let args = Cli::parse();

    if let Err(e) = cli::ux::setup_logging(args.verbose, args.quiet) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
