//! # Siena Scalp EEG to BIDS
//!
//! Converts the Siena Scalp EEG dataset (per-subject EDF recordings plus
//! free-text seizure lists) into a BIDS layout, attaching the seizures as
//! `Seizure` events of each recording.
//!
//! ## Seizure lists
//!
//! Two textual layouts are recognised and detected from the content:
//!
//! * **Delimited pairs** - a line ending in `.edf` opens a section, each
//!   following `start,end` line is one seizure in seconds
//! * **Labeled blocks** - `Seizure n N` blocks with `File name`,
//!   `Registration start time`, `Seizure start time` and `Seizure end time`
//!   given as `HH.MM.SS` clock times
//!
//! ```rust
//! use siena2bids::{parse_seizure_text, Diagnostic};
//!
//! let text = "\
//! Seizure n 1
//! File name: PN00-1.edf
//! Registration start time: 20.00.00
//! Seizure start time: 20.05.30
//! Seizure end time: 20.07.00
//!
//! Seizure n 2
//! File name: PN00-2.edf
//! Registration start time: 23.58.00
//! Seizure start time: 00.01.00
//! Seizure end time: 00.02.00
//! ";
//!
//! let outcome = parse_seizure_text(text, "edf");
//! let events = outcome.annotations.events();
//! assert_eq!(events.len(), 2);
//! assert_eq!((events[0].onset_seconds, events[0].duration_seconds), (330.0, 90.0));
//!
//! // Seizure 2 starts after midnight: onset is clamped to 0 and reported
//! assert_eq!(events[1].onset_seconds, 0.0);
//! assert!(matches!(outcome.diagnostics[0], Diagnostic::NegativeOnset { .. }));
//! ```
//!
//! ### Clock times and midnight
//!
//! Clock times have no date. They are subtracted on one synthetic day, so a
//! seizure recorded after midnight of an evening registration comes out with
//! a negative onset. Such onsets are **clamped to 0** and a
//! [`Diagnostic::NegativeOnset`] is recorded; the true offset is lost.
//! Seizures whose end is not after their start are dropped
//! ([`Diagnostic::InvalidDuration`]).
//!
//! Delimited pairs are taken as written. A negative onset or non-positive
//! duration there is only flagged with [`Diagnostic::SuspiciousInterval`].
//!
//! ## Converting a dataset
//!
//! ```rust,no_run
//! use siena2bids::{ConversionConfig, Converter, FsBidsWriter, Result};
//!
//! fn main() -> Result<()> {
//!     let config = ConversionConfig {
//!         source_root: "physionet.org/files/siena-scalp-eeg/1.0.0".into(),
//!         bids_root: "BIDS_Siena_Converted".into(),
//!         ..ConversionConfig::default()
//!     };
//!     let sink = FsBidsWriter::new(&config.bids_root);
//!     let summary = Converter::new(config, sink).run()?;
//!     println!("{} recordings converted", summary.recordings_converted);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod types;
pub mod utils;
pub mod diagnostics;
pub mod normalize;
pub mod delimited;
pub mod labeled;
pub mod annotations;
pub mod recording;
pub mod bids;
pub mod config;
pub mod convert;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{ConvertError, Result};
pub use types::{Annotation, RawClockTime, RecordingInfo, SeizureBlock, SeizureEvent, SignalInfo, SEIZURE_LABEL};
pub use diagnostics::{Diagnostic, Severity};
pub use annotations::{parse_seizure_list, parse_seizure_text, AnnotationSource, ParseOutcome, SeizureAnnotations};
pub use bids::{BidsPath, BidsSink, DatasetDescription, FsBidsWriter, ParticipantsTable};
pub use config::ConversionConfig;
pub use convert::{ConversionSummary, Converter};

/// Library version
///
/// ```rust
/// let version = siena2bids::version();
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
