//! menagerie server binary

use menagerie::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServiceConfig::load()?;

    // Start server
    menagerie::start_server(config).await?;

    Ok(())
}
