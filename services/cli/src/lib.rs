mod cli;
mod commands;
mod snapshot;

use sloty::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
