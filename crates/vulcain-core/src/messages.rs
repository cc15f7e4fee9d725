//! Manifest messages shown at lifecycle steps

use std::io::{self, Write};

use crate::templates::Manifest;

const PREFIX: &str = "INFO : ";

/// Write the messages declared for `step`: a blank line, one `INFO : ` line
/// per message, and a closing blank line. Nothing is written when the step
/// has no messages.
pub fn write_messages<W: Write>(manifest: &Manifest, step: &str, out: &mut W) -> io::Result<()> {
    let Some(messages) = manifest.messages_for(step).filter(|m| !m.is_empty()) else {
        return Ok(());
    };

    writeln!(out)?;
    for message in messages {
        writeln!(out, "{}{}", PREFIX, message)?;
    }
    writeln!(out)?;
    Ok(())
}
