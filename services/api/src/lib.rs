mod cli;
mod infra;
mod report;
mod routes;
mod server;

use call_qa::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
