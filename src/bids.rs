//! BIDS output.
//!
//! [`BidsSink`] is the boundary the converter writes through: it accepts a
//! recording plus its `(onset, duration, label)` annotations and lays them
//! out. [`FsBidsWriter`] is the filesystem implementation; it copies the EDF
//! unchanged and writes the sidecar files next to it.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::types::{Annotation, RecordingInfo};

pub const BIDS_VERSION: &str = "1.6.0";

const SEIZURE_DESCRIPTION: &str = "Epileptic seizure";
const SEIZURE_HED: &str = "Event/Category/Experimental-stimulus, Sensory-event";

/// Entities locating one recording inside a BIDS tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidsPath {
    pub root: PathBuf,
    pub subject: String,
    pub session: String,
    pub task: String,
    pub run: String,
}

impl BidsPath {
    /// Run labels are 1-based and zero-padded to two digits
    pub fn run_label(index: usize) -> String {
        format!("{:02}", index + 1)
    }

    /// `sub-<s>/ses-<ses>/eeg` under the root
    pub fn directory(&self) -> PathBuf {
        self.root
            .join(format!("sub-{}", self.subject))
            .join(format!("ses-{}", self.session))
            .join("eeg")
    }

    /// `sub-<s>_ses-<ses>_task-<t>_run-<r>`
    pub fn basename(&self) -> String {
        format!(
            "sub-{}_ses-{}_task-{}_run-{}",
            self.subject, self.session, self.task, self.run
        )
    }

    /// Full path of a file with the given suffix and extension
    ///
    /// ```
    /// use siena2bids::BidsPath;
    /// use std::path::Path;
    ///
    /// let p = BidsPath {
    ///     root: "out".into(),
    ///     subject: "00".into(),
    ///     session: "01".into(),
    ///     task: "seizuremonitoring".into(),
    ///     run: BidsPath::run_label(0),
    /// };
    /// assert_eq!(
    ///     p.file("events", "tsv"),
    ///     Path::new("out/sub-00/ses-01/eeg/sub-00_ses-01_task-seizuremonitoring_run-01_events.tsv")
    /// );
    /// ```
    pub fn file(&self, suffix: &str, extension: &str) -> PathBuf {
        self.directory()
            .join(format!("{}_{}.{}", self.basename(), suffix, extension))
    }
}

/// BIDS dataset description (dataset_description.json)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DatasetDescription {
    pub name: String,
    #[serde(rename = "BIDSVersion")]
    pub bids_version: String,
    pub dataset_type: String,
    pub authors: Vec<String>,
    pub acknowledgements: String,
    pub how_to_acknowledge: String,
    pub funding: Vec<String>,
    pub references_and_links: Vec<String>,
    #[serde(rename = "DatasetDOI")]
    pub dataset_doi: String,
    pub license: String,
}

impl Default for DatasetDescription {
    fn default() -> Self {
        Self {
            name: "Siena Scalp EEG Dataset".to_string(),
            bids_version: BIDS_VERSION.to_string(),
            dataset_type: "raw".to_string(),
            authors: vec!["Dan, J.".to_string(), "Detti, P.".to_string()],
            acknowledgements: "We thank the contributors to the Siena Scalp EEG dataset".to_string(),
            how_to_acknowledge: "Cite DOI: 10.5281/zenodo.10640762".to_string(),
            funding: Vec::new(),
            references_and_links: vec!["https://doi.org/10.5281/zenodo.10640762".to_string()],
            dataset_doi: "10.5281/zenodo.10640762".to_string(),
            license: "ODC-BY 1.0".to_string(),
        }
    }
}

/// EEG sidecar JSON (*_eeg.json)
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct EegSidecar<'a> {
    task_name: &'a str,
    sampling_frequency: f64,
    #[serde(rename = "EEGChannelCount")]
    eeg_channel_count: usize,
    #[serde(rename = "EEGReference")]
    eeg_reference: &'static str,
    power_line_frequency: &'static str,
    software_filters: &'static str,
    recording_duration: f64,
    recording_type: &'static str,
}

/// Channel entry for *_channels.tsv
#[derive(Debug, Serialize)]
struct ChannelRow<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    channel_type: &'static str,
    units: &'a str,
    sampling_frequency: f64,
}

/// Event entry for *_events.tsv
#[derive(Debug, Serialize)]
struct EventRow<'a> {
    onset: f64,
    duration: f64,
    trial_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ColumnDescription {
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LevelDescription {
    description: &'static str,
    #[serde(rename = "HED")]
    hed: &'static str,
}

/// Events sidecar JSON (*_events.json)
#[derive(Debug, Serialize)]
struct EventsSidecar {
    onset: ColumnDescription,
    duration: ColumnDescription,
    trial_type: ColumnDescription,
    #[serde(rename = "Seizure")]
    seizure: LevelDescription,
}

impl EventsSidecar {
    fn seizures() -> Self {
        EventsSidecar {
            onset: ColumnDescription {
                description: "Onset of the event measured from the beginning of the recording",
                units: Some("s"),
            },
            duration: ColumnDescription {
                description: "Duration of the event",
                units: Some("s"),
            },
            trial_type: ColumnDescription {
                description: "Type of annotated event",
                units: None,
            },
            seizure: LevelDescription {
                description: SEIZURE_DESCRIPTION,
                hed: SEIZURE_HED,
            },
        }
    }
}

/// Demographics rows for participants.tsv; the first column is `participant_id`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParticipantsTable {
    /// Reads a subject CSV whose first column holds the source subject id
    ///
    /// `to_bids_id` maps that id to a BIDS subject label; rows are emitted as
    /// `sub-<label>` and the remaining columns are copied unchanged.
    pub fn from_subject_csv<P, F>(path: P, to_bids_id: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> String,
    {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ConvertError::InvalidSubjectTable("no columns".to_string()));
        }

        let mut columns = vec!["participant_id".to_string()];
        columns.extend(headers.iter().skip(1).map(str::to_string));

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let Some(id) = record.get(0).filter(|id| !id.is_empty()) else {
                continue;
            };
            let mut row = vec![format!("sub-{}", to_bids_id(id))];
            row.extend((1..headers.len()).map(|i| record.get(i).unwrap_or("n/a").to_string()));
            rows.push(row);
        }

        Ok(ParticipantsTable { columns, rows })
    }
}

/// Destination for converted recordings
///
/// The converter only relies on this contract: a recording and its
/// annotations, given as seconds relative to recording start.
pub trait BidsSink {
    fn write_recording(
        &mut self,
        target: &BidsPath,
        source: &Path,
        info: &RecordingInfo,
        annotations: &[Annotation],
    ) -> Result<()>;

    fn write_dataset_description(&mut self, description: &DatasetDescription) -> Result<()>;

    fn write_participants(&mut self, participants: &ParticipantsTable) -> Result<()>;
}

/// Writes the BIDS tree to disk, overwriting existing files
#[derive(Debug, Clone)]
pub struct FsBidsWriter {
    root: PathBuf,
}

/// 表头由调用方显式写出，空表也保留表头
fn tsv_writer<P: AsRef<Path>>(path: P) -> Result<csv::Writer<File>> {
    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut file = File::create(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")?;
    Ok(())
}

impl FsBidsWriter {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        FsBidsWriter { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_eeg_sidecar(&self, target: &BidsPath, info: &RecordingInfo) -> Result<()> {
        let sidecar = EegSidecar {
            task_name: &target.task,
            sampling_frequency: info.sampling_frequency(),
            eeg_channel_count: info.signals.len(),
            eeg_reference: "n/a",
            power_line_frequency: "n/a",
            software_filters: "n/a",
            recording_duration: info.duration_seconds(),
            recording_type: "continuous",
        };
        write_json(&target.file("eeg", "json"), &sidecar)
    }

    fn write_channels(&self, target: &BidsPath, info: &RecordingInfo) -> Result<()> {
        let mut writer = tsv_writer(target.file("channels", "tsv"))?;
        writer.write_record(["name", "type", "units", "sampling_frequency"])?;
        for signal in &info.signals {
            writer.serialize(ChannelRow {
                name: &signal.label,
                channel_type: "EEG",
                units: &signal.physical_dimension,
                sampling_frequency: info.signal_frequency(signal),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_events(&self, target: &BidsPath, annotations: &[Annotation]) -> Result<()> {
        let mut writer = tsv_writer(target.file("events", "tsv"))?;
        writer.write_record(["onset", "duration", "trial_type"])?;
        for annotation in annotations {
            writer.serialize(EventRow {
                onset: annotation.onset,
                duration: annotation.duration,
                trial_type: &annotation.description,
            })?;
        }
        writer.flush()?;

        write_json(&target.file("events", "json"), &EventsSidecar::seizures())
    }
}

impl BidsSink for FsBidsWriter {
    fn write_recording(
        &mut self,
        target: &BidsPath,
        source: &Path,
        info: &RecordingInfo,
        annotations: &[Annotation],
    ) -> Result<()> {
        fs::create_dir_all(target.directory())?;
        fs::copy(source, target.file("eeg", "edf"))?;

        self.write_eeg_sidecar(target, info)?;
        self.write_channels(target, info)?;
        self.write_events(target, annotations)
    }

    fn write_dataset_description(&mut self, description: &DatasetDescription) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        write_json(&self.root.join("dataset_description.json"), description)
    }

    fn write_participants(&mut self, participants: &ParticipantsTable) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let mut writer = tsv_writer(self.root.join("participants.tsv"))?;
        writer.write_record(&participants.columns)?;
        for row in &participants.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
