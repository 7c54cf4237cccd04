//! Delete command - delete a profile

use crate::commands::ClientOptions;
use crate::display;
use crate::error::Result;

/// Run the delete command
pub async fn run(options: &ClientOptions, namespace: &str, name: &str) -> Result<()> {
    let client = options.profile_client().await?;
    client.delete(namespace, name).await?;

    display::print_status(name, namespace, "deleted");
    Ok(())
}
