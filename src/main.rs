use std::process::ExitCode;

use clap::Parser;
use mgpipe::command::Commands;
use mgpipe::utils::ToolFailure;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().filter_or("MGPIPE_LOG", "info");
    env_logger::init_from_env(env);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assemble(mut cmd) => cmd.try_execute(),
        Commands::Index(mut cmd) => cmd.try_execute(),
        Commands::Mapreads(mut cmd) => cmd.try_execute(),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        //A tool that ran but failed decides our own exit code
        if let Some(failure) = e.downcast_ref::<ToolFailure>() {
            return failure.exit_code();
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
