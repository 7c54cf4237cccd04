//! Patch command - apply a partial document to a profile

use std::path::Path;

use profilekit_kube::PatchKind;

use crate::commands::ClientOptions;
use crate::display;
use crate::error::{CliError, Result};
use crate::util::read_input;

/// Run the patch command
pub async fn run(
    options: &ClientOptions,
    namespace: &str,
    name: &str,
    patch: Option<&str>,
    patch_file: Option<&Path>,
    patch_type: &str,
) -> Result<()> {
    let kind: PatchKind = patch_type.parse()?;
    let body = match (patch, patch_file) {
        (Some(inline), _) => inline.to_string(),
        (None, Some(path)) => read_input(path)?,
        (None, None) => {
            return Err(CliError::config_with_help(
                "no patch given",
                "pass the body with --patch '<json>' or --patch-file <path>",
            ));
        }
    };

    let client = options.profile_client().await?;
    client.patch(namespace, name, kind, body.as_bytes()).await?;

    display::print_status(name, namespace, "patched");
    Ok(())
}
