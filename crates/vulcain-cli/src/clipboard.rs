//! Clipboard publication through the system clipboard

use anyhow::{Context, Result};
use vulcain_core::ClipboardSink;

/// Copies text to the system clipboard
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn publish(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("No clipboard available")?;
        clipboard
            .set_text(text)
            .context("Failed to copy to clipboard")?;
        Ok(())
    }
}
