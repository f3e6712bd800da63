use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::debug;
use serde::{Deserialize, Serialize};
use crate::errors::ParseError;
use crate::file_utils::FileManager;

// @module: Caption parsing, storage and serialization

// @const: Separator placed between content lines of one caption
const CONTENT_LINE_SEPARATOR: &str = "\n";

// @struct: Single caption block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    // @field: Caption number as written in the file
    index: usize,

    // @field: Timing line, kept verbatim
    timing: String,

    // @field: Caption text, lines joined by '\n'
    content: String,
}

impl Caption {
    /// Creates a new caption
    pub fn new(index: usize, timing: impl Into<String>, content: impl Into<String>) -> Self {
        Caption {
            index,
            timing: timing.into(),
            content: content.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn timing(&self) -> &str {
        &self.timing
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the caption text. Index and timing never change.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}", self.timing)?;
        writeln!(f, "{}", self.content)?;
        writeln!(f)
    }
}

/// How blank lines between caption blocks are interpreted
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlankLinePolicy {
    /// Exactly one blank line separates blocks. Every blank line that is not
    /// the last line of input starts a new block, so doubled blank lines
    /// surface as an invalid index.
    #[default]
    Strict,
    /// Any run of blank lines separates blocks, including leading and
    /// trailing runs. A blank line right after the timing line is read as
    /// empty content, which is how an emptied caption is written out.
    Tolerant,
}

/// Block-scanning parser for caption files
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptionParser {
    policy: BlankLinePolicy,
}

impl CaptionParser {
    pub fn new(policy: BlankLinePolicy) -> Self {
        CaptionParser { policy }
    }

    pub fn policy(&self) -> BlankLinePolicy {
        self.policy
    }

    /// Parse a whole caption file held in memory. Accepts `\n` and `\r\n`.
    pub fn parse_str(&self, text: &str) -> Result<Vec<Caption>, ParseError> {
        let lines: Vec<&str> = text.lines().collect();
        self.parse_lines(&lines)
    }

    /// Parse an ordered sequence of lines into captions, preserving file order.
    ///
    /// Any parse error aborts the whole input; no partial result is returned.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<Caption>, ParseError> {
        let lines: Vec<&str> = lines.iter().map(|l| -> &str { l.as_ref() }).collect();

        let captions = match self.policy {
            BlankLinePolicy::Strict => Self::parse_strict(&lines)?,
            BlankLinePolicy::Tolerant => Self::parse_tolerant(&lines)?,
        };

        debug!("Parsed {} captions from {} lines", captions.len(), lines.len());
        Ok(captions)
    }

    fn parse_strict(lines: &[&str]) -> Result<Vec<Caption>, ParseError> {
        let mut captions = Vec::new();

        if lines.first().is_some_and(|l| !l.is_empty()) {
            captions.push(Self::parse_block(lines, 0, false)?.0);
        }

        // A blank final line never opens a block
        for line_no in 0..lines.len().saturating_sub(1) {
            if lines[line_no].is_empty() {
                captions.push(Self::parse_block(lines, line_no + 1, false)?.0);
            }
        }

        Ok(captions)
    }

    fn parse_tolerant(lines: &[&str]) -> Result<Vec<Caption>, ParseError> {
        let mut captions = Vec::new();
        let mut line_no = 0;

        loop {
            while line_no < lines.len() && lines[line_no].is_empty() {
                line_no += 1;
            }
            if line_no >= lines.len() {
                break;
            }

            let (caption, next) = Self::parse_block(lines, line_no, true)?;
            captions.push(caption);
            line_no = next;
        }

        Ok(captions)
    }

    // @returns: The caption and the line number just past its content
    fn parse_block(
        lines: &[&str],
        start: usize,
        allow_empty_content: bool,
    ) -> Result<(Caption, usize), ParseError> {
        let index_line = lines[start];
        let index = parse_index(index_line).ok_or_else(|| ParseError::InvalidIndex {
            line: start,
            value: index_line.to_string(),
        })?;

        let timing = lines.get(start + 1).ok_or_else(|| ParseError::MalformedBlock {
            line: start,
            reason: "missing timing line".to_string(),
        })?;

        let first_content_line = start + 2;
        match lines.get(first_content_line) {
            None => {
                return Err(ParseError::MalformedBlock {
                    line: start,
                    reason: "missing content line".to_string(),
                });
            }
            Some(line) if line.is_empty() && allow_empty_content => {
                return Ok((Caption::new(index, *timing, ""), first_content_line));
            }
            Some(line) if line.is_empty() => {
                return Err(ParseError::MalformedBlock {
                    line: start,
                    reason: "empty content".to_string(),
                });
            }
            Some(_) => {}
        }

        // Running off the end of input closes the final block
        let mut end = first_content_line;
        while end < lines.len() && !lines[end].is_empty() {
            end += 1;
        }

        let content = lines[first_content_line..end].join(CONTENT_LINE_SEPARATOR);
        Ok((Caption::new(index, *timing, content), end))
    }
}

// Encoding artifacts such as a byte-order mark end up glued to the first index
fn parse_index(line: &str) -> Option<usize> {
    let digits: String = line.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    digits.parse().ok()
}

/// Render captions back to caption-file text, one blank line after each block
pub fn serialize(captions: &[Caption]) -> String {
    captions.iter().map(|caption| caption.to_string()).collect()
}

/// Write captions in caption-file form to any writer
pub fn write_captions<W: Write>(captions: &[Caption], mut writer: W) -> std::io::Result<()> {
    for caption in captions {
        write!(writer, "{}", caption)?;
    }
    writer.flush()
}

/// Captions loaded from one file
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionDocument {
    /// Source filename
    pub source_file: PathBuf,

    /// Captions in file order
    pub captions: Vec<Caption>,
}

impl CaptionDocument {
    pub fn new(source_file: PathBuf, captions: Vec<Caption>) -> Self {
        CaptionDocument { source_file, captions }
    }

    /// Read and parse a caption file
    pub fn from_file<P: AsRef<Path>>(path: P, parser: &CaptionParser) -> Result<Self> {
        let path = path.as_ref();
        let lines = FileManager::read_lines(path)?;
        let captions = parser
            .parse_lines(&lines)
            .with_context(|| format!("Failed to parse caption file: {}", path.display()))?;

        Ok(CaptionDocument::new(path.to_path_buf(), captions))
    }

    /// Resolve an output filename against the source file's directory.
    /// Absolute paths are returned unchanged.
    pub fn resolve_output_path(&self, file_name: &str) -> PathBuf {
        let candidate = Path::new(file_name);
        if candidate.is_absolute() {
            return candidate.to_path_buf();
        }

        self.source_file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(candidate)
    }

    /// Write the serialized captions and return the path written
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        FileManager::write_to_file(path, &serialize(&self.captions))?;
        Ok(path.to_path_buf())
    }

    /// Print the captions framed by preview markers
    pub fn preview<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "Caption output:")?;
        write_captions(&self.captions, &mut writer)?;
        writeln!(writer, "Caption output end")
    }
}
