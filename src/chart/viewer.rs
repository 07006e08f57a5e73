//! Opening the interactive chart in the system browser

use std::path::Path;

use crate::error::{LensError, Result};

/// Hand `path` to the platform's default handler without waiting for it
pub fn open_in_browser(path: &Path) -> Result<()> {
    opener::open(path).map_err(|e| {
        LensError::chart_display(format!("Failed to launch a viewer for {}", path.display()), e)
    })
}
