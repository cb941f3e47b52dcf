use chrono::NaiveTime;

/// Label attached to every seizure annotation handed to the BIDS sink
pub const SEIZURE_LABEL: &str = "Seizure";

/// One seizure, located inside a recording file
///
/// Events built from labeled blocks always satisfy `onset_seconds >= 0` and
/// `duration_seconds > 0`. Events built from delimited pairs are kept as
/// written in the list; suspicious values are reported through a
/// [`Diagnostic`](crate::Diagnostic) instead of being corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct SeizureEvent {
    pub source_file_name: String,
    pub onset_seconds: f64,      // 相对于记录开始的秒数
    pub duration_seconds: f64,
}

impl SeizureEvent {
    /// Converts the event into the `(onset, duration, label)` triple the sink consumes
    pub fn to_annotation(&self) -> Annotation {
        Annotation {
            onset: self.onset_seconds,
            duration: self.duration_seconds,
            description: SEIZURE_LABEL.to_string(),
        }
    }
}

/// Annotation triple in seconds relative to recording start
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub onset: f64,
    pub duration: f64,
    pub description: String,
}

/// One parsed `Seizure n N` block before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SeizureBlock {
    pub seizure_number: u32,
    pub file_name: String,
    pub registration_start: RawClockTime,
    pub registration_end: Option<RawClockTime>,
    pub seizure_start: RawClockTime,
    pub seizure_end: RawClockTime,
}

/// Wall-clock `HH.MM.SS` reading with no date attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl RawClockTime {
    pub fn to_naive_time(self) -> NaiveTime {
        // 构造时已校验范围
        NaiveTime::from_hms_opt(self.hour, self.minute, self.second).unwrap_or_default()
    }
}

impl std::fmt::Display for RawClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}.{:02}", self.hour, self.minute, self.second)
    }
}

/// Non-annotation signal described in an EDF header
#[derive(Debug, Clone)]
pub struct SignalInfo {
    pub label: String,
    pub physical_dimension: String,
    pub samples_per_record: i32,
}

/// Header-level description of one EDF recording
#[derive(Debug, Clone)]
pub struct RecordingInfo {
    pub datarecords_in_file: i64,
    pub datarecord_duration: f64,     // 秒
    pub signals: Vec<SignalInfo>,
}

impl RecordingInfo {
    /// Total recording length in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.datarecords_in_file as f64 * self.datarecord_duration
    }

    /// Highest per-second sampling rate among the signals
    pub fn sampling_frequency(&self) -> f64 {
        if self.datarecord_duration <= 0.0 {
            return 0.0;
        }
        self.signals
            .iter()
            .map(|s| s.samples_per_record as f64 / self.datarecord_duration)
            .fold(0.0, f64::max)
    }

    /// Sampling rate of a single signal in Hz
    pub fn signal_frequency(&self, signal: &SignalInfo) -> f64 {
        if self.datarecord_duration <= 0.0 {
            return 0.0;
        }
        signal.samples_per_record as f64 / self.datarecord_duration
    }
}
