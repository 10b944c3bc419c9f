use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    mediaindex::app::startup::startup().await
}
