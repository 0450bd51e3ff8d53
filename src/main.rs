use clap::Parser;
use passvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    passvault::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Add {
            ref service,
            ref secret,
        } => passvault::cli::commands::add::execute(&cli, service, secret.as_deref()),
        Commands::Generate { ref service } => {
            passvault::cli::commands::generate::execute(&cli, service)
        }
        Commands::List => passvault::cli::commands::list::execute(&cli),
        Commands::Delete { index, force } => {
            passvault::cli::commands::delete::execute(&cli, index, force)
        }
        Commands::Edit { index } => passvault::cli::commands::edit::execute(&cli, index),
        Commands::Shell => passvault::cli::commands::shell::execute(&cli),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
