// File Operations for the cipher front end
// Plain text in, plain text out: files hold exactly the codec input or output

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;

/// Default export name for Playfair results
pub const PLAYFAIR_EXPORT_NAME: &str = "Playfair_Result.txt";
/// Default export name for RSA results
pub const RSA_EXPORT_NAME: &str = "output.txt";

/// Where input text comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl TextSource {
    /// Inline text wins over a file; with neither, read stdin
    pub fn from_args(text: Option<String>, file: Option<PathBuf>) -> Self {
        match (text, file) {
            (Some(text), _) => TextSource::Inline(text),
            (None, Some(path)) => TextSource::File(path),
            (None, None) => TextSource::Stdin,
        }
    }

    pub fn read(&self) -> Result<String> {
        match self {
            TextSource::Inline(text) => Ok(text.clone()),
            TextSource::File(path) => read_text_file(path),
            TextSource::Stdin => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}

/// Where output text goes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextSink {
    Stdout,
    File(PathBuf),
}

impl TextSink {
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(TextSink::Stdout, TextSink::File)
    }

    pub fn write(&self, text: &str) -> Result<()> {
        match self {
            TextSink::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", text)?;
                Ok(())
            }
            TextSink::File(path) => write_text_file(path, text),
        }
    }
}

/// Read entire file as UTF-8 text
pub fn read_text_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    info!("read {} from {}", format_file_size(text.len() as u64), path.display());
    Ok(text)
}

/// Write text to file verbatim, no header or trailing newline
pub fn write_text_file(path: &Path, text: &str) -> Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(text.as_bytes())?;
    info!("wrote {} to {}", format_file_size(text.len() as u64), path.display());
    Ok(())
}

/// Format file size for display
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
