//! Get command - show one profile

use crate::commands::ClientOptions;
use crate::display::{self, OutputFormat};
use crate::error::Result;

/// Run the get command
pub async fn run(
    options: &ClientOptions,
    namespace: &str,
    name: &str,
    output: OutputFormat,
) -> Result<()> {
    let client = options.profile_client().await?;
    let profile = client.get(namespace, name).await?;
    display::print_profile(&profile, output)
}
