//! Create command - create a profile from a document

use std::path::Path;

use profilekit_core::{Profile, TypedResource, decode_text};
use profilekit_kube::KubeError;

use crate::commands::ClientOptions;
use crate::display::{self, OutputFormat};
use crate::error::Result;
use crate::util::read_input;

/// Run the create command
pub async fn run(
    options: &ClientOptions,
    namespace: &str,
    filename: &Path,
    output: Option<OutputFormat>,
) -> Result<()> {
    let text = read_input(filename)?;
    // Reject bad input before any cluster configuration is loaded
    decode_text(&text, &Profile::IDENTITY).map_err(KubeError::from)?;

    let client = options.profile_client().await?;
    let created = client.create_with_document(namespace, &text).await?;

    match output {
        Some(format) => display::print_profile(&created, format),
        None => {
            display::print_status(
                created.metadata.name.as_deref().unwrap_or_default(),
                namespace,
                "created",
            );
            Ok(())
        }
    }
}
