use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, info_span, warn};

use crate::annotations::{parse_seizure_list, SeizureAnnotations};
use crate::bids::{BidsPath, BidsSink, ParticipantsTable};
use crate::config::ConversionConfig;
use crate::error::{ConvertError, Result};
use crate::types::RecordingInfo;

/// Counters for one conversion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    pub subjects: usize,
    pub recordings_converted: usize,
    pub events_attached: usize,
    pub diagnostics: usize,
    /// Recordings that could not be converted, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl ConversionSummary {
    pub fn recordings_failed(&self) -> usize {
        self.failures.len()
    }
}

/// Walks a Siena source tree and writes every recording through a [`BidsSink`]
///
/// Processing is sequential. A failing recording is logged and counted and
/// the run moves on; only a missing source root stops the run.
///
/// # Examples
///
/// ```rust
/// use siena2bids::{ConversionConfig, Converter, FsBidsWriter};
///
/// let base = std::env::temp_dir().join("siena2bids_doc_convert");
/// # std::fs::remove_dir_all(&base).ok();
/// # siena2bids::doctest_utils::create_siena_dataset(base.join("siena"))?;
/// let config = ConversionConfig {
///     source_root: base.join("siena"),
///     bids_root: base.join("bids"),
///     ..ConversionConfig::default()
/// };
///
/// let sink = FsBidsWriter::new(&config.bids_root);
/// let summary = Converter::new(config, sink).run()?;
/// assert_eq!(summary.subjects, 3);
/// assert_eq!(summary.recordings_failed(), 0);
/// # std::fs::remove_dir_all(&base).ok();
/// # Ok::<(), siena2bids::ConvertError>(())
/// ```
pub struct Converter<S: BidsSink> {
    config: ConversionConfig,
    sink: S,
}

impl<S: BidsSink> Converter<S> {
    pub fn new(config: ConversionConfig, sink: S) -> Self {
        Converter { config, sink }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Gives the sink back, e.g. to inspect what was written
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the whole conversion
    ///
    /// # Errors
    ///
    /// * `ConvertError::MissingInput` - the source root does not exist
    /// * `ConvertError::Io` - the source root or output root cannot be accessed
    pub fn run(&mut self) -> Result<ConversionSummary> {
        let source_root = self.config.source_root.clone();
        if !source_root.is_dir() {
            error!(path = %source_root.display(), "source directory not found");
            return Err(ConvertError::MissingInput(format!(
                "source directory not found: {}",
                source_root.display()
            )));
        }
        fs::create_dir_all(&self.config.bids_root)?;

        let participants = self.load_participants(&source_root);

        let subject_dirs = self.subject_dirs(&source_root)?;
        info!(count = subject_dirs.len(), "found subject directories");

        let mut summary = ConversionSummary::default();
        for subject_dir in &subject_dirs {
            self.convert_subject(subject_dir, &mut summary);
            summary.subjects += 1;
        }

        if let Err(e) = self.sink.write_dataset_description(&self.config.dataset) {
            error!(error = %e, "failed to write dataset description");
        }
        if let Some(table) = participants {
            if let Err(e) = self.sink.write_participants(&table) {
                error!(error = %e, "failed to write participants table");
            }
        }

        info!(
            subjects = summary.subjects,
            converted = summary.recordings_converted,
            failed = summary.recordings_failed(),
            events = summary.events_attached,
            "conversion to BIDS completed"
        );
        Ok(summary)
    }

    fn load_participants(&self, source_root: &Path) -> Option<ParticipantsTable> {
        let path = source_root.join(&self.config.subject_info_file);
        if !path.is_file() {
            warn!(path = %path.display(), "subject info file not found, proceeding without demographic data");
            return None;
        }

        match ParticipantsTable::from_subject_csv(&path, |id| self.config.bids_subject_id(id)) {
            Ok(table) => {
                info!(count = table.rows.len(), "loaded subject info");
                Some(table)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "cannot read subject info");
                None
            }
        }
    }

    fn subject_dirs(&self, source_root: &Path) -> Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(source_root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .filter(|path| {
                file_name_of(path).map_or(false, |name| name.starts_with(&self.config.subject_prefix))
            })
            .collect();
        dirs.sort();
        Ok(dirs)
    }

    fn recordings(&self, subject_dir: &Path) -> Result<Vec<PathBuf>> {
        let extension = self.config.recording_extension.as_str();
        let mut files: Vec<PathBuf> = fs::read_dir(subject_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Parses a subject's seizure list; `None` when missing or unreadable
    fn subject_annotations(&self, subject_dir: &Path, subject_id: &str, summary: &mut ConversionSummary) -> Option<SeizureAnnotations> {
        let list_path = subject_dir.join(self.config.seizure_list_name(subject_id));
        if !list_path.is_file() {
            warn!(subject = subject_id, "seizure list file not found");
            return None;
        }

        match parse_seizure_list(&list_path, &self.config.recording_extension) {
            Ok(outcome) => {
                let source = list_path.display().to_string();
                for diagnostic in &outcome.diagnostics {
                    diagnostic.emit(&source);
                }
                summary.diagnostics += outcome.diagnostics.len();
                info!(
                    recordings = outcome.annotations.recordings().len(),
                    seizures = outcome.annotations.len(),
                    format = ?outcome.source,
                    "found seizure annotations"
                );
                Some(outcome.annotations)
            }
            Err(e) => {
                error!(error = %e, "error parsing seizure annotations");
                None
            }
        }
    }

    fn convert_subject(&mut self, subject_dir: &Path, summary: &mut ConversionSummary) {
        let Some(subject_id) = file_name_of(subject_dir) else {
            return;
        };
        let span = info_span!("subject", id = subject_id);
        let _guard = span.enter();
        info!("processing subject");

        let bids_subject = self.config.bids_subject_id(subject_id);
        let annotations = self.subject_annotations(subject_dir, subject_id, summary);

        let recordings = match self.recordings(subject_dir) {
            Ok(files) => files,
            Err(e) => {
                error!(error = %e, "cannot list recordings");
                summary.failures.push((subject_dir.to_path_buf(), e.to_string()));
                return;
            }
        };
        info!(count = recordings.len(), "found recordings");

        for (index, recording) in recordings.iter().enumerate() {
            let target = BidsPath {
                root: self.config.bids_root.clone(),
                subject: bids_subject.clone(),
                session: self.config.session.clone(),
                task: self.config.task.clone(),
                run: BidsPath::run_label(index),
            };

            match self.convert_recording(recording, &target, annotations.as_ref()) {
                Ok(events) => {
                    summary.recordings_converted += 1;
                    summary.events_attached += events;
                    info!(file = %recording.display(), events, "converted recording");
                }
                Err(e) => {
                    error!(file = %recording.display(), error = %e, "error converting recording");
                    summary.failures.push((recording.clone(), e.to_string()));
                }
            }
        }
    }

    /// Converts one recording and returns how many seizures were attached
    fn convert_recording(
        &mut self,
        recording: &Path,
        target: &BidsPath,
        annotations: Option<&SeizureAnnotations>,
    ) -> Result<usize> {
        let info = RecordingInfo::read(recording)?;
        let file_name = file_name_of(recording).unwrap_or_default();

        let seizures = annotations
            .map(|a| a.annotations_for(file_name))
            .unwrap_or_default();
        if !seizures.is_empty() {
            debug!(file = file_name, count = seizures.len(), "adding seizure annotations");
        }

        self.sink.write_recording(target, recording, &info, &seizures)?;
        Ok(seizures.len())
    }
}

fn file_name_of(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
