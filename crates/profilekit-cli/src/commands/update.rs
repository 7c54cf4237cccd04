//! Update command - replace a profile with a document

use std::path::Path;

use profilekit_core::{Profile, TypedResource, decode_text};
use profilekit_kube::KubeError;

use crate::commands::ClientOptions;
use crate::display::{self, OutputFormat};
use crate::error::Result;
use crate::util::read_input;

/// Run the update command
pub async fn run(
    options: &ClientOptions,
    namespace: &str,
    filename: &Path,
    output: Option<OutputFormat>,
) -> Result<()> {
    let text = read_input(filename)?;
    decode_text(&text, &Profile::IDENTITY).map_err(KubeError::from)?;

    let client = options.profile_client().await?;
    let updated = client.update_with_document(namespace, &text).await?;

    match output {
        Some(format) => display::print_profile(&updated, format),
        None => {
            display::print_status(
                updated.metadata.name.as_deref().unwrap_or_default(),
                namespace,
                "updated",
            );
            Ok(())
        }
    }
}
