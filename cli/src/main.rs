mod commands;
mod terminal;

use commands::{CommandLine, Commands, run, show, targets};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = commands.options.to_config();

    match commands.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            print::banner();
            run::run(&cfg).await
        }
        Commands::Show { domain } => show::show(&domain, &cfg.state_dir),
        Commands::Targets => targets::targets(&cfg.targets_path),
    }
}
