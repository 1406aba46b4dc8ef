use anyhow::Result;
use clap::Parser;
use flowmetrics::{CLIArguments, Command, fmax_main, latest_main, report_main};
use log::LevelFilter;
use pretty_env_logger::formatted_builder;

fn main() -> Result<()> {
    let args = CLIArguments::parse();

    formatted_builder()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
        .init();

    match args.command {
        Command::Report(args) => report_main(args),
        Command::Latest(args) => latest_main(args),
        Command::Fmax(args) => fmax_main(args),
    }
}
