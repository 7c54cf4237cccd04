//! List command - list profiles in a namespace

use crate::commands::ClientOptions;
use crate::display::{self, OutputFormat};
use crate::error::Result;

/// Run the list command
pub async fn run(options: &ClientOptions, namespace: &str, output: OutputFormat) -> Result<()> {
    let client = options.profile_client().await?;
    let profiles = client.list(namespace).await?;
    display::print_list(&profiles, namespace, output)
}
