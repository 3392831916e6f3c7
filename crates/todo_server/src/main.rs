use clap::Parser;
use log::error;
use std::process::ExitCode;
use todo_core::init_logging;
use todo_server::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(err) = init_logging(config.log_level(), config.log_dir.as_deref()) {
        eprintln!("todo_server: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match todo_server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("todo_server: {err}");
            ExitCode::FAILURE
        }
    }
}
