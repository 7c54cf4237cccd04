//! Shared utility functions for CLI commands

use std::io::Read;
use std::path::Path;

use crate::error::{CliError, Result};

/// Read a document from a file, or from stdin when the path is `-`
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::io_at("<stdin>", e))?;
        return Ok(text);
    }

    std::fs::read_to_string(path).map_err(|e| CliError::io_at(&path.display().to_string(), e))
}
