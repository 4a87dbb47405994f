use account_session::cli;
use anyhow::Result;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = cli::start()?;

    action.execute(&globals).await?;

    Ok(())
}
