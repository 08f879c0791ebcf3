//! Document text inputs.
//!
//! Documents arrive as already-extracted UTF-8 text. Pages are separated by form feed
//! (`\x0c`), which is what PDF-to-text converters emit between pages.

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::core::error::SniffError;

pub const PAGE_SEPARATOR: char = '\u{000C}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub text: String,
}

pub trait TextSource {
    fn name(&self) -> &str;
    fn text(&self) -> &str;

    fn pages(&self) -> Vec<Page> {
        split_pages(self.text())
    }
}

/// Zero-based pages; text without a separator is a single page.
pub fn split_pages(text: &str) -> Vec<Page> {
    text.split(PAGE_SEPARATOR)
        .enumerate()
        .map(|(index, text)| Page {
            index,
            text: text.to_string(),
        })
        .collect()
}

pub struct InlineSource {
    name: String,
    text: String,
}

impl InlineSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub async fn from_stdin() -> Result<Self, SniffError> {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        let text = decode(buf, "stdin")?;
        Ok(Self::new("stdin", text))
    }
}

impl TextSource for InlineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        &self.text
    }
}

pub struct FileSource {
    name: String,
    text: String,
}

impl FileSource {
    pub async fn load(path: &Path) -> Result<Self, SniffError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SniffError::Document(format!("{}: {}", path.display(), e)))?;
        let name = path.display().to_string();
        let text = decode(bytes, &name)?;
        Ok(Self { name, text })
    }
}

impl TextSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// `-` reads standard input; anything else is a file path.
pub async fn load_source(input: &str) -> Result<Box<dyn TextSource + Send>, SniffError> {
    if input == "-" {
        return Ok(Box::new(InlineSource::from_stdin().await?));
    }
    Ok(Box::new(FileSource::load(Path::new(input)).await?))
}

fn decode(bytes: Vec<u8>, name: &str) -> Result<String, SniffError> {
    String::from_utf8(bytes)
        .map_err(|e| SniffError::Document(format!("{} is not valid UTF-8: {}", name, e)))
}
