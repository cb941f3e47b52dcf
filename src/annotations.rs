use std::fs;
use std::path::Path;

use crate::delimited;
use crate::diagnostics::Diagnostic;
use crate::error::{ConvertError, Result};
use crate::labeled;
use crate::types::{Annotation, SeizureEvent};
use crate::utils::block_header_number;

/// Textual layout of a seizure list
///
/// # Examples
///
/// ```rust
/// use siena2bids::AnnotationSource;
///
/// let blocks = "Seizure n 1\nFile name: PN00-1.edf\n";
/// assert_eq!(AnnotationSource::detect(blocks), AnnotationSource::LabeledBlocks);
///
/// let pairs = "PN01-1.edf\n100.5,140.0\n";
/// assert_eq!(AnnotationSource::detect(pairs), AnnotationSource::DelimitedPairs);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationSource {
    /// Sections headed by a recording name, followed by `start,end` seconds
    DelimitedPairs,
    /// `Seizure n N` blocks with labeled `HH.MM.SS` clock times
    LabeledBlocks,
}

impl AnnotationSource {
    /// Picks the layout from the content: any block header means labeled blocks
    pub fn detect(text: &str) -> Self {
        if text.lines().any(|line| block_header_number(line.trim()).is_some()) {
            AnnotationSource::LabeledBlocks
        } else {
            AnnotationSource::DelimitedPairs
        }
    }

    /// Parses `text` in this layout
    ///
    /// `extension` is the recording file extension without the dot; it marks
    /// section headers in the delimited layout.
    pub fn parse(self, text: &str, extension: &str) -> ParseOutcome {
        match self {
            AnnotationSource::DelimitedPairs => delimited::parse(text, extension),
            AnnotationSource::LabeledBlocks => labeled::parse(text),
        }
    }
}

/// Seizures found in one list, in the order they were written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeizureAnnotations {
    events: Vec<SeizureEvent>,
    recordings: Vec<String>,
}

impl SeizureAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `file_name` appeared in the list, even without seizures
    pub(crate) fn declare_recording(&mut self, file_name: &str) {
        if !self.recordings.iter().any(|r| r == file_name) {
            self.recordings.push(file_name.to_string());
        }
    }

    pub(crate) fn push(&mut self, event: SeizureEvent) {
        self.declare_recording(&event.source_file_name);
        self.events.push(event);
    }

    /// Drops every event previously attached to `file_name`
    pub(crate) fn clear_recording(&mut self, file_name: &str) {
        self.events.retain(|e| e.source_file_name != file_name);
    }

    pub fn events(&self) -> &[SeizureEvent] {
        &self.events
    }

    /// Recording names in order of first appearance
    pub fn recordings(&self) -> &[String] {
        &self.recordings
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Events whose file name equals `file_name` exactly, in list order
    pub fn events_for<'a>(&'a self, file_name: &'a str) -> impl Iterator<Item = &'a SeizureEvent> + 'a {
        self.events
            .iter()
            .filter(move |e| e.source_file_name == file_name)
    }

    /// Annotation triples for one recording, labeled `Seizure`
    pub fn annotations_for(&self, file_name: &str) -> Vec<Annotation> {
        self.events_for(file_name)
            .map(SeizureEvent::to_annotation)
            .collect()
    }
}

/// Parsed seizures plus everything that was skipped, clamped or flagged
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub source: AnnotationSource,
    pub annotations: SeizureAnnotations,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub(crate) fn new(source: AnnotationSource) -> Self {
        ParseOutcome {
            source,
            annotations: SeizureAnnotations::new(),
            diagnostics: Vec::new(),
        }
    }
}

/// Byte-order mark some editors put at the start of UTF-8 files
const UTF8_BOM: char = '\u{feff}';

/// Parses seizure list text, detecting its layout first
///
/// A leading byte-order mark is ignored.
pub fn parse_seizure_text(text: &str, extension: &str) -> ParseOutcome {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    AnnotationSource::detect(text).parse(text, extension)
}

/// Reads a whole seizure list file and parses it
///
/// # Errors
///
/// * `ConvertError::MissingInput` - the file does not exist
/// * `ConvertError::Io` - the file cannot be read as UTF-8 text
///
/// # Examples
///
/// ```rust
/// use siena2bids::parse_seizure_list;
///
/// let dir = std::env::temp_dir().join("siena2bids_doc_parse");
/// std::fs::create_dir_all(&dir)?;
/// let list = dir.join("Seizures-list-PN01.txt");
/// std::fs::write(&list, "PN01-1.edf\n100.5,140.0\n")?;
///
/// let outcome = parse_seizure_list(&list, "edf")?;
/// let events: Vec<_> = outcome.annotations.events_for("PN01-1.edf").collect();
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].duration_seconds, 39.5);
///
/// # std::fs::remove_dir_all(&dir).ok();
/// # Ok::<(), siena2bids::ConvertError>(())
/// ```
pub fn parse_seizure_list<P: AsRef<Path>>(path: P, extension: &str) -> Result<ParseOutcome> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ConvertError::MissingInput(format!(
            "seizure list not found: {}",
            path.display()
        )));
    }

    let text = fs::read_to_string(path)?;
    Ok(parse_seizure_text(&text, extension))
}
