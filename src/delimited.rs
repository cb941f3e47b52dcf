//! Seizure lists written as recording sections of `start,end` second pairs:
//!
//! ```text
//! # comment
//! PN01-1.edf
//! 100.5,140.0
//! 2210,2300,extra
//! ```

use crate::annotations::{AnnotationSource, ParseOutcome};
use crate::diagnostics::Diagnostic;
use crate::types::SeizureEvent;

const COMMENT_MARKER: char = '#';
const SEPARATOR: char = ',';

fn parse_pair(line: &str) -> Result<(f64, f64), String> {
    let mut fields = line.split(SEPARATOR).map(str::trim);
    let (start, end) = match (fields.next(), fields.next()) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err("expected at least two fields".to_string()),
    };

    let start: f64 = start.parse().map_err(|e| format!("start '{}': {}", start, e))?;
    let end: f64 = end.parse().map_err(|e| format!("end '{}': {}", end, e))?;
    Ok((start, end))
}

/// Parses the delimited layout; never fails, bad lines become diagnostics
pub fn parse(text: &str, extension: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::new(AnnotationSource::DelimitedPairs);
    let suffix = format!(".{}", extension);
    let mut current_file: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        if line.ends_with(&suffix) {
            // 新的文件段
            if outcome.annotations.recordings().iter().any(|r| r == line) {
                outcome.annotations.clear_recording(line);
                outcome.diagnostics.push(Diagnostic::SectionRestarted {
                    line_number,
                    file_name: line.to_string(),
                });
            }
            outcome.annotations.declare_recording(line);
            current_file = Some(line.to_string());
            continue;
        }

        if !line.contains(SEPARATOR) {
            continue;
        }

        let Some(file_name) = current_file.as_ref() else {
            outcome.diagnostics.push(Diagnostic::OrphanLine {
                line_number,
                line: line.to_string(),
            });
            continue;
        };

        match parse_pair(line) {
            Ok((start, end)) => {
                let duration = end - start;
                if start < 0.0 || duration <= 0.0 {
                    outcome.diagnostics.push(Diagnostic::SuspiciousInterval {
                        line_number,
                        file_name: file_name.clone(),
                        onset: start,
                        duration,
                    });
                }
                outcome.annotations.push(SeizureEvent {
                    source_file_name: file_name.clone(),
                    onset_seconds: start,
                    duration_seconds: duration,
                });
            }
            Err(reason) => outcome.diagnostics.push(Diagnostic::MalformedLine {
                line_number,
                line: line.to_string(),
                reason,
            }),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_under_section() {
        let outcome = parse("PN01-1.edf\n100.5,140.0\n", "edf");
        let events = outcome.annotations.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source_file_name, "PN01-1.edf");
        assert_eq!(events[0].onset_seconds, 100.5);
        assert_eq!(events[0].duration_seconds, 39.5);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let outcome = parse("PN01-1.edf\nabc,140.0\n200,260\n", "edf");
        assert_eq!(outcome.annotations.len(), 1);
        assert_eq!(outcome.annotations.events()[0].onset_seconds, 200.0);
        assert!(matches!(
            outcome.diagnostics.as_slice(),
            [Diagnostic::MalformedLine { line_number: 2, .. }]
        ));
    }

    #[test]
    fn test_comments_blank_lines_and_extra_fields() {
        let text = "# list\n\nPN02-3.edf\n  10 , 25 , note\n\n# end\n";
        let outcome = parse(text, "edf");
        let events = outcome.annotations.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].duration_seconds, 15.0);
    }

    #[test]
    fn test_sections_keep_their_own_pairs() {
        let text = "PN01-1.edf\n1,2\n3,5\nPN01-2.edf\n7,10\n";
        let outcome = parse(text, "edf");
        assert_eq!(outcome.annotations.events_for("PN01-1.edf").count(), 2);
        assert_eq!(outcome.annotations.events_for("PN01-2.edf").count(), 1);
    }

    #[test]
    fn test_empty_section_is_declared() {
        let outcome = parse("PN03-1.edf\nPN03-2.edf\n5,6\n", "edf");
        assert_eq!(outcome.annotations.recordings().len(), 2);
        assert_eq!(outcome.annotations.events_for("PN03-1.edf").count(), 0);
    }

    #[test]
    fn test_orphan_line_is_ignored() {
        let outcome = parse("1,2\nPN01-1.edf\n", "edf");
        assert!(outcome.annotations.is_empty());
        assert!(matches!(outcome.diagnostics[0], Diagnostic::OrphanLine { line_number: 1, .. }));
    }

    #[test]
    fn test_repeated_section_restarts() {
        let outcome = parse("PN01-1.edf\n1,2\nPN01-1.edf\n3,4\n", "edf");
        let events = outcome.annotations.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].onset_seconds, 3.0);
        assert!(matches!(outcome.diagnostics[0], Diagnostic::SectionRestarted { line_number: 3, .. }));
    }

    #[test]
    fn test_suspicious_interval_is_flagged_not_fixed() {
        let outcome = parse("PN01-1.edf\n50,40\n", "edf");
        let events = outcome.annotations.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].duration_seconds, -10.0);
        assert!(matches!(outcome.diagnostics[0], Diagnostic::SuspiciousInterval { .. }));
    }

    #[test]
    fn test_custom_extension() {
        let outcome = parse("rec-1.bdf\n1,3\nrec-1.edf\n", "bdf");
        assert_eq!(outcome.annotations.events_for("rec-1.bdf").count(), 1);
        assert_eq!(outcome.annotations.recordings().len(), 1);
    }
}
