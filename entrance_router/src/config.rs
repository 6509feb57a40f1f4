//! Loader for the line-oriented entrance config.
//!
//! Each rule is five lines (from level, original destination, new
//! destination, volume id, viewpoint) followed by an optional blank line.
//! A load either yields the whole table or fails; rule order drives
//! first-match lookup, so a half-read table is never handed out.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::table::{EntranceRule, EntranceTable, Viewpoint};

/// Location the mod loader reads the table from.
pub const DEFAULT_CONFIG_PATH: &str = "Mods/Randomizer/config.txt";

/// Fields of a record, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    FromLevel,
    ToLevelOriginal,
    ToLevelRemapped,
    DestinationVolumeId,
    DestinationViewpoint,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordField::FromLevel => "from-level",
            RecordField::ToLevelOriginal => "original destination",
            RecordField::ToLevelRemapped => "new destination",
            RecordField::DestinationVolumeId => "volume id",
            RecordField::DestinationViewpoint => "viewpoint",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum ConfigFormatError {
    #[error("failed to open entrance config {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read entrance config")]
    Read(#[source] io::Error),
    #[error("record {record} ends before its {field} field (line {line})")]
    IncompleteRecord {
        record: usize,
        field: RecordField,
        line: usize,
    },
    #[error("line {line}: volume id {text:?} is not a base-10 integer")]
    InvalidVolumeId {
        line: usize,
        text: String,
        #[source]
        source: ParseIntError,
    },
    #[error("line {line}: expected a blank line after record {record}, found {text:?}")]
    UnexpectedSeparator {
        record: usize,
        line: usize,
        text: String,
    },
}

/// Parses entrance config resources into an [`EntranceTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_path(path: impl AsRef<Path>) -> Result<EntranceTable, ConfigFormatError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigFormatError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        info!(
            "loaded {} entrance rule(s) from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Consumes the whole reader before parsing.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<EntranceTable, ConfigFormatError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(ConfigFormatError::Read)?;
        Self::parse_str(&text)
    }

    pub fn parse_str(text: &str) -> Result<EntranceTable, ConfigFormatError> {
        let mut cursor = LineCursor::new(text);
        let mut rules = Vec::new();

        while !cursor.is_exhausted() {
            let record = rules.len() + 1;
            let from_level = cursor.field(record, RecordField::FromLevel)?;
            let to_level_original = cursor.field(record, RecordField::ToLevelOriginal)?;
            let to_level_remapped = cursor.field(record, RecordField::ToLevelRemapped)?;
            let volume_text = cursor.field(record, RecordField::DestinationVolumeId)?;
            let volume_line = cursor.line_number();
            let viewpoint_text = cursor.field(record, RecordField::DestinationViewpoint)?;

            let destination_volume_id = volume_text.trim().parse::<u32>().map_err(|source| {
                ConfigFormatError::InvalidVolumeId {
                    line: volume_line,
                    text: volume_text.to_string(),
                    source,
                }
            })?;

            if let Some(separator) = cursor.next_line() {
                if !separator.is_empty() {
                    return Err(ConfigFormatError::UnexpectedSeparator {
                        record,
                        line: cursor.line_number(),
                        text: separator.to_string(),
                    });
                }
            }

            rules.push(EntranceRule {
                from_level: from_level.to_string(),
                to_level_original: to_level_original.to_string(),
                to_level_remapped: to_level_remapped.to_string(),
                destination_volume_id,
                destination_viewpoint: Viewpoint::from_config_str(viewpoint_text),
            });
        }

        Ok(EntranceTable::new(rules))
    }
}

struct LineCursor<'a> {
    lines: std::iter::Peekable<std::str::Lines<'a>>,
    consumed: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().peekable(),
            consumed: 0,
        }
    }

    fn is_exhausted(&mut self) -> bool {
        self.lines.peek().is_none()
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.consumed += 1;
        Some(line)
    }

    /// 1-based number of the most recently consumed line.
    fn line_number(&self) -> usize {
        self.consumed
    }

    fn field(&mut self, record: usize, field: RecordField) -> Result<&'a str, ConfigFormatError> {
        self.next_line()
            .ok_or(ConfigFormatError::IncompleteRecord {
                record,
                field,
                line: self.consumed + 1,
            })
    }
}
