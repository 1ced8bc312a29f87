//! Compiled matchers: name regex, content regex, and the filter glob list.

use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::io::{self, Read};

use crate::error::ScanError;
use crate::{MatchTarget, Record};

/// Name/path regular expression. Matches anywhere in the string.
#[derive(Clone, Debug)]
pub struct NameMatcher {
    pattern: Regex,
    target: MatchTarget,
}

impl NameMatcher {
    pub fn new(pattern: &str, target: MatchTarget) -> Result<Self, ScanError> {
        let pattern = Regex::new(pattern).map_err(|source| ScanError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern, target })
    }

    pub fn find_in_string(&self, s: &str) -> bool {
        self.pattern.is_match(s)
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self.target {
            MatchTarget::Name => self.find_in_string(&record.name),
            MatchTarget::Path => self.find_in_string(&record.path.to_string_lossy()),
        }
    }

    /// Set `found_name_match` if the record matches. Never clears it.
    pub fn apply(&self, record: &mut Record) {
        if !record.found_name_match && self.matches(record) {
            record.found_name_match = true;
        }
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Content regular expression over raw bytes.
#[derive(Clone, Debug)]
pub struct ContentMatcher {
    pattern: regex::bytes::Regex,
    max_size: Option<u64>,
}

impl ContentMatcher {
    pub fn new(pattern: &str, max_size: Option<u64>) -> Result<Self, ScanError> {
        let pattern =
            regex::bytes::Regex::new(pattern).map_err(|source| ScanError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { pattern, max_size })
    }

    /// False when the configured size limit rules out a content scan.
    pub fn accepts_size(&self, size: u64) -> bool {
        self.max_size.is_none_or(|max| size <= max)
    }

    /// Read the whole stream and search it. Consumes the reader, so it is closed on return.
    ///
    /// At most `max_size + 1` bytes are buffered; a longer stream fails with
    /// [`io::ErrorKind::FileTooLarge`] instead of growing the buffer.
    pub fn find_in_stream<R: Read>(&self, mut reader: R) -> io::Result<bool> {
        let mut buf = Vec::new();
        match self.max_size {
            Some(max) => {
                reader.take(max.saturating_add(1)).read_to_end(&mut buf)?;
                if buf.len() as u64 > max {
                    return Err(io::Error::new(
                        io::ErrorKind::FileTooLarge,
                        "larger than max content size",
                    ));
                }
            }
            None => {
                reader.read_to_end(&mut buf)?;
            }
        }
        Ok(self.pattern.is_match(&buf))
    }
}

/// Glob list applied to record names. Empty list passes everything.
#[derive(Clone, Debug, Default)]
pub struct FilterList {
    patterns: Vec<Pattern>,
}

/// `*` and `?` do not cross `/`, matching shell globbing on a single name.
const FILTER_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl FilterList {
    pub fn new(patterns: &[String]) -> Result<Self, ScanError> {
        let patterns = patterns
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| {
                Pattern::new(p).map_err(|source| ScanError::InvalidGlob {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn allows(&self, name: &str) -> bool {
        self.is_empty()
            || self
                .patterns
                .iter()
                .any(|p| p.matches_with(name, FILTER_MATCH_OPTIONS))
    }
}
