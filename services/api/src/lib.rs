mod cli;
mod grade_cmd;
mod infra;
mod routes;
mod server;

use warroom_scoring::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
