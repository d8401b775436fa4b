mod cli;
mod infra;
mod preview;
mod routes;
mod server;

use enrollment_admin::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
