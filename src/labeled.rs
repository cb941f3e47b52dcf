//! Seizure lists written as labeled blocks:
//!
//! ```text
//! Seizure n 1
//! File name: PN00-1.edf
//! Registration start time: 19.39.33
//! Registration end time: 20.22.58
//! Seizure start time: 19.58.36
//! Seizure end time: 19.59.46
//! ```
//!
//! Each block becomes at most one [`SeizureEvent`]. A broken block is
//! reported and skipped without affecting the blocks after it.

use crate::annotations::{AnnotationSource, ParseOutcome};
use crate::diagnostics::Diagnostic;
use crate::normalize::{normalize_interval, Normalized};
use crate::types::{RawClockTime, SeizureBlock, SeizureEvent};
use crate::utils::{block_header_number, normalize_label, parse_clock_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FileName,
    RegistrationStart,
    RegistrationEnd,
    SeizureStart,
    SeizureEnd,
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "file name" => Some(Field::FileName),
            "registration start time" => Some(Field::RegistrationStart),
            "registration end time" => Some(Field::RegistrationEnd),
            "seizure start time" | "start time" => Some(Field::SeizureStart),
            "seizure end time" | "end time" => Some(Field::SeizureEnd),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Field::FileName => "File name",
            Field::RegistrationStart => "Registration start time",
            Field::RegistrationEnd => "Registration end time",
            Field::SeizureStart => "Seizure start time",
            Field::SeizureEnd => "Seizure end time",
        }
    }
}

/// Raw `label: value` text of one block, first occurrence of each field wins
#[derive(Debug, Default)]
struct RawBlock<'a> {
    file_name: Option<&'a str>,
    registration_start: Option<&'a str>,
    registration_end: Option<&'a str>,
    seizure_start: Option<&'a str>,
    seizure_end: Option<&'a str>,
}

impl<'a> RawBlock<'a> {
    fn slot(&mut self, field: Field) -> &mut Option<&'a str> {
        match field {
            Field::FileName => &mut self.file_name,
            Field::RegistrationStart => &mut self.registration_start,
            Field::RegistrationEnd => &mut self.registration_end,
            Field::SeizureStart => &mut self.seizure_start,
            Field::SeizureEnd => &mut self.seizure_end,
        }
    }

    fn absorb(&mut self, line: &'a str) {
        let Some((label, value)) = line.split_once(':') else {
            return;
        };
        let Some(field) = Field::from_label(label) else {
            return;
        };

        let value = value.trim();
        let slot = self.slot(field);
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value);
        }
    }
}

fn require<'a>(value: Option<&'a str>, field: Field) -> Result<&'a str, String> {
    value.ok_or_else(|| format!("missing '{}'", field.name()))
}

fn clock(value: &str, field: Field) -> Result<RawClockTime, String> {
    // 时间后可能跟有其他文字，只取第一个词
    let token = value.split_whitespace().next().unwrap_or("");
    parse_clock_time(token).map_err(|e| format!("'{}': {}", field.name(), e))
}

fn build_block(seizure_number: u32, raw: &RawBlock<'_>) -> Result<SeizureBlock, String> {
    let file_name = require(raw.file_name, Field::FileName)?;
    let registration_start = require(raw.registration_start, Field::RegistrationStart)?;
    let seizure_start = require(raw.seizure_start, Field::SeizureStart)?;
    let seizure_end = require(raw.seizure_end, Field::SeizureEnd)?;

    // 记录结束时间是可选的，解析失败也不影响事件
    let registration_end = raw
        .registration_end
        .and_then(|v| clock(v, Field::RegistrationEnd).ok());

    Ok(SeizureBlock {
        seizure_number,
        file_name: file_name.to_string(),
        registration_start: clock(registration_start, Field::RegistrationStart)?,
        registration_end,
        seizure_start: clock(seizure_start, Field::SeizureStart)?,
        seizure_end: clock(seizure_end, Field::SeizureEnd)?,
    })
}

/// Converts a parsed block into an event, applying the clamp/discard policy
pub fn block_to_event(block: &SeizureBlock, diagnostics: &mut Vec<Diagnostic>) -> Option<SeizureEvent> {
    match normalize_interval(block.registration_start, block.seizure_start, block.seizure_end) {
        Normalized::NonPositiveDuration { duration_seconds } => {
            diagnostics.push(Diagnostic::InvalidDuration {
                seizure_number: block.seizure_number,
                file_name: block.file_name.clone(),
                duration: duration_seconds,
            });
            None
        }
        Normalized::Interval { onset_seconds, duration_seconds, raw_onset } => {
            if let Some(onset) = raw_onset {
                diagnostics.push(Diagnostic::NegativeOnset {
                    seizure_number: block.seizure_number,
                    file_name: block.file_name.clone(),
                    onset,
                });
            }
            Some(SeizureEvent {
                source_file_name: block.file_name.clone(),
                onset_seconds,
                duration_seconds,
            })
        }
    }
}

/// Splits `text` into `(seizure number, lines)` blocks; preamble is dropped
fn split_blocks(text: &str) -> Vec<(u32, Vec<&str>)> {
    let mut blocks: Vec<(u32, Vec<&str>)> = Vec::new();
    for line in text.lines().map(str::trim) {
        if let Some(number) = block_header_number(line) {
            blocks.push((number, Vec::new()));
        } else if let Some((_, lines)) = blocks.last_mut() {
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }
    blocks
}

/// Parses the labeled-block layout; never fails, bad blocks become diagnostics
pub fn parse(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::new(AnnotationSource::LabeledBlocks);

    for (seizure_number, lines) in split_blocks(text) {
        let mut raw = RawBlock::default();
        for line in lines {
            raw.absorb(line);
        }

        let block = match build_block(seizure_number, &raw) {
            Ok(block) => block,
            Err(reason) => {
                outcome.diagnostics.push(Diagnostic::MalformedBlock { seizure_number, reason });
                continue;
            }
        };

        outcome.annotations.declare_recording(&block.file_name);
        if let Some(event) = block_to_event(&block, &mut outcome.diagnostics) {
            outcome.annotations.push(event);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(n: u32, file: &str, reg: &str, start: &str, end: &str) -> String {
        format!(
            "Seizure n {}\nFile name: {}\nRegistration start time: {}\nRegistration end time: 23.59.59\nSeizure start time: {}\nSeizure end time: {}\n\n",
            n, file, reg, start, end
        )
    }

    #[test]
    fn test_regular_block() {
        let outcome = parse(&block(1, "PN00-1.edf", "20.00.00", "20.05.30", "20.07.00"));
        let events = outcome.annotations.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source_file_name, "PN00-1.edf");
        assert_eq!(events[0].onset_seconds, 330.0);
        assert_eq!(events[0].duration_seconds, 90.0);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_overnight_onset_clamped() {
        let outcome = parse(&block(1, "PN00-2.edf", "23.58.00", "00.01.00", "00.02.00"));
        let events = outcome.annotations.events();
        assert_eq!(events[0].onset_seconds, 0.0);
        assert_eq!(events[0].duration_seconds, 60.0);
        assert!(matches!(outcome.diagnostics[0], Diagnostic::NegativeOnset { seizure_number: 1, .. }));
    }

    #[test]
    fn test_non_positive_duration_dropped() {
        let text = block(1, "PN00-1.edf", "10.00.00", "10.05.00", "10.05.00")
            + &block(2, "PN00-1.edf", "10.00.00", "10.06.00", "10.07.00");
        let outcome = parse(&text);
        assert_eq!(outcome.annotations.len(), 1);
        assert_eq!(outcome.annotations.events()[0].onset_seconds, 360.0);
        assert!(matches!(outcome.diagnostics[0], Diagnostic::InvalidDuration { seizure_number: 1, .. }));
    }

    #[test]
    fn test_missing_field_skips_only_that_block() {
        let text = "Seizure n 1\nFile name: PN00-1.edf\nRegistration start time: 10.00.00\nSeizure start time: 10.01.00\n\n"
            .to_string()
            + &block(2, "PN00-3.edf", "11.00.00", "11.00.10", "11.00.40");
        let outcome = parse(&text);
        assert_eq!(outcome.annotations.len(), 1);
        assert_eq!(outcome.annotations.events()[0].source_file_name, "PN00-3.edf");
        match &outcome.diagnostics[0] {
            Diagnostic::MalformedBlock { seizure_number, reason } => {
                assert_eq!(*seizure_number, 1);
                assert!(reason.contains("Seizure end time"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_each_required_field_is_required() {
        let full = [
            "File name: PN00-1.edf",
            "Registration start time: 10.00.00",
            "Seizure start time: 10.01.00",
            "Seizure end time: 10.02.00",
        ];
        for (skip, label) in ["File name", "Registration start time", "Seizure start time", "Seizure end time"]
            .iter()
            .enumerate()
        {
            let mut text = String::from("Seizure n 4\n");
            for (i, line) in full.iter().enumerate() {
                if i != skip {
                    text += line;
                    text += "\n";
                }
            }
            let outcome = parse(&text);
            assert!(outcome.annotations.is_empty(), "event built without {}", label);
            match &outcome.diagnostics[..] {
                [Diagnostic::MalformedBlock { seizure_number: 4, reason }] => {
                    assert!(reason.contains(label), "{} not named in '{}'", label, reason);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_registration_end_is_optional() {
        let text = "Seizure n 3\nFile name: PN05-2.edf\nRegistration start time: 06.00.00\nSeizure start time: 06.10.00\nSeizure end time: 06.11.00\n";
        let outcome = parse(text);
        assert_eq!(outcome.annotations.len(), 1);
        assert_eq!(outcome.annotations.events()[0].onset_seconds, 600.0);
    }

    #[test]
    fn test_colon_clock_time_is_malformed() {
        let outcome = parse(&block(1, "PN00-1.edf", "20:00:00", "20.05.30", "20.07.00"));
        assert!(outcome.annotations.is_empty());
        assert!(matches!(outcome.diagnostics[0], Diagnostic::MalformedBlock { .. }));
    }

    #[test]
    fn test_preamble_and_aliases() {
        let text = "Patient id number: PN01\nSeizures in file: 2\n\n\
            Seizure n 1\nFile name: PN01-1.edf\nRegistration start time:19.00.44\n\
            Start time: 21.51.02\nEnd time: 21.51.56\n";
        let outcome = parse(text);
        let events = outcome.annotations.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].onset_seconds, 10_218.0);
        assert_eq!(events[0].duration_seconds, 54.0);
    }

    #[test]
    fn test_first_occurrence_wins_and_trailing_text_ignored() {
        let text = "Seizure n 1\nFile name: PN00-1.edf\nFile name: other.edf\n\
            Registration start time: 10.00.00 (approx)\nSeizure start time: 10.00.10\nSeizure end time: 10.00.20\n";
        let outcome = parse(text);
        let events = outcome.annotations.events();
        assert_eq!(events[0].source_file_name, "PN00-1.edf");
        assert_eq!(events[0].onset_seconds, 10.0);
    }
}
