use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::types::{RecordingInfo, SignalInfo};
use crate::error::{ConvertError, Result};
use crate::utils::{atoi_nonlocalized, atof_nonlocalized};

/// Largest signal count accepted in a header (matches edflib)
pub const EDF_MAX_SIGNALS: i32 = 4096;

/// Label of the EDF+ annotation channel, which carries no samples
const ANNOTATION_LABEL: &str = "EDF Annotations";

impl RecordingInfo {
    /// Reads the header of an EDF or EDF+ recording
    ///
    /// Only the fixed-size main header and the per-signal headers are read;
    /// data records are never touched. Annotation channels are left out of
    /// `signals`. The start date and time fields are not interpreted, so a
    /// recording with a malformed date still converts.
    ///
    /// # Errors
    ///
    /// * `ConvertError::MissingInput` - File doesn't exist or can't be opened
    /// * `ConvertError::InvalidRecording` - Version field is not `0`
    /// * `ConvertError::InvalidSignalCount` - Signal count outside `1..=4096`
    /// * `ConvertError::InvalidHeader` - Header size disagrees with the signal count
    ///
    /// # Examples
    ///
    /// ```rust
    /// use siena2bids::RecordingInfo;
    ///
    /// # let path = std::env::temp_dir().join("siena2bids_doc_header.edf");
    /// # siena2bids::doctest_utils::create_recording(&path, &["Fp1", "F3"], 512, 4)?;
    /// let info = RecordingInfo::read(&path)?;
    /// assert_eq!(info.signals.len(), 2);
    /// assert_eq!(info.sampling_frequency(), 512.0);
    /// assert_eq!(info.duration_seconds(), 4.0);
    /// # std::fs::remove_file(&path).ok();
    /// # Ok::<(), siena2bids::ConvertError>(())
    /// ```
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .map_err(|e| ConvertError::MissingInput(format!("{}: {}", path.as_ref().display(), e)))?;

        let mut reader = BufReader::new(file);
        Self::parse_header(&mut reader)
    }

    fn parse_header<R: Read>(reader: &mut R) -> Result<Self> {
        // 读取主头部（256字节）
        let mut main_header = vec![0u8; 256];
        reader.read_exact(&mut main_header)?;

        let version = String::from_utf8_lossy(&main_header[0..8]);
        if version.trim() != "0" {
            return Err(ConvertError::InvalidRecording(format!("not an EDF file, version '{}'", version.trim())));
        }

        // 解析信号数量
        let signals_str = String::from_utf8_lossy(&main_header[252..256]);
        let signal_count = atoi_nonlocalized(&signals_str);
        if signal_count < 1 || signal_count > EDF_MAX_SIGNALS {
            return Err(ConvertError::InvalidSignalCount(signal_count));
        }

        // 验证头部大小
        let header_size_str = String::from_utf8_lossy(&main_header[184..192]);
        if atoi_nonlocalized(&header_size_str) != (signal_count + 1) * 256 {
            return Err(ConvertError::InvalidHeader);
        }

        let datarecords_str = String::from_utf8_lossy(&main_header[236..244]);
        let datarecords_in_file = atoi_nonlocalized(&datarecords_str) as i64;

        let duration_str = String::from_utf8_lossy(&main_header[244..252]);
        let datarecord_duration = atof_nonlocalized(&duration_str);

        // 读取信号头部信息
        let mut signal_header = vec![0u8; signal_count as usize * 256];
        reader.read_exact(&mut signal_header)?;
        let signals = Self::parse_signals(&signal_header, signal_count as usize);

        Ok(RecordingInfo {
            datarecords_in_file,
            datarecord_duration,
            signals,
        })
    }

    /// 解析信号参数（字段按列存储，每列依次排列所有信号）
    fn parse_signals(signal_header: &[u8], signal_count: usize) -> Vec<SignalInfo> {
        let field = |column_offset: usize, width: usize, i: usize| -> String {
            let start = signal_count * column_offset + i * width;
            String::from_utf8_lossy(&signal_header[start..start + width])
                .trim()
                .to_string()
        };

        (0..signal_count)
            .filter_map(|i| {
                let label = field(0, 16, i);
                if label == ANNOTATION_LABEL {
                    return None;
                }

                Some(SignalInfo {
                    label,
                    physical_dimension: field(96, 8, i),
                    samples_per_record: atoi_nonlocalized(&field(216, 8, i)),
                })
            })
            .collect()
    }
}
