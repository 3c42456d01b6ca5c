//! gradio-md: combine the Gradio guides into one markdown document.
//!
//! Lists the markdown files under the repository's guides directory, downloads
//! them with bounded concurrency, orders them and writes a single file.

mod commands;

use std::process::ExitCode;

use commands::Invocation;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(report) = color_eyre::install() {
        eprintln!("Error: {}", commands::single_line(&report));
        return ExitCode::FAILURE;
    }

    let cli = match commands::parse_args(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Help(help)) => {
            print!("{help}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    commands::init_tracing();

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("Error: {}", commands::single_line(&report));
            ExitCode::FAILURE
        }
    }
}
