use clap::Parser;
use env_logger::Env;
use miette::Result;
use minv::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    // RUST_LOG overrides the -v flags
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.global.log_filter()))
        .format_timestamp(None)
        .init();

    let global = &cli.global;
    match cli.command {
        Commands::Init(args) => minv::cli::commands::init::run(args),
        Commands::Product(cmd) => minv::cli::commands::product::run(cmd, global),
        Commands::Category(cmd) => minv::cli::commands::category::run(cmd, global),
        Commands::Stock(cmd) => minv::cli::commands::stock::run(cmd, global),
        Commands::Dashboard(args) => minv::cli::commands::dashboard::run(args, global),
        Commands::Alerts(cmd) => minv::cli::commands::alerts::run(cmd, global),
        Commands::Log(args) => minv::cli::commands::log::run(args, global),
        Commands::Report(cmd) => minv::cli::commands::report::run(cmd, global),
        Commands::Validate(args) => minv::cli::commands::validate::run(args, global),
        Commands::Completions(args) => minv::cli::commands::completions::run(args),
    }
}
