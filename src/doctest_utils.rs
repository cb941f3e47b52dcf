// Internal utilities for documentation tests
// This file contains helper functions to generate fixture recordings and
// Siena-style dataset trees for doctests and integration tests

use crate::Result;
use std::fs;
use std::path::Path;

/// 按固定宽度写入ASCII字段（右侧补空格）
fn push_field(buf: &mut Vec<u8>, value: &str, width: usize) {
    let mut bytes: Vec<u8> = value.bytes().take(width).collect();
    bytes.resize(width, b' ');
    buf.extend_from_slice(&bytes);
}

/// Builds a minimal EDF file in memory
///
/// Every signal is labeled `EEG <name>` in µV, one-second data records, with
/// all samples zero. Start is 15.01.16 19.39.33.
pub fn recording_bytes(labels: &[&str], samples_per_record: usize, records: usize) -> Vec<u8> {
    let ns = labels.len();
    let mut buf = Vec::with_capacity((ns + 1) * 256 + records * ns * samples_per_record * 2);

    push_field(&mut buf, "0", 8);
    push_field(&mut buf, "PN00 X X X", 80);
    push_field(&mut buf, "Startdate 15-JAN-2016 X X X", 80);
    push_field(&mut buf, "15.01.16", 8);
    push_field(&mut buf, "19.39.33", 8);
    push_field(&mut buf, &((ns + 1) * 256).to_string(), 8);
    push_field(&mut buf, "", 44);
    push_field(&mut buf, &records.to_string(), 8);
    push_field(&mut buf, "1", 8);
    push_field(&mut buf, &ns.to_string(), 4);

    for label in labels {
        push_field(&mut buf, &format!("EEG {}", label), 16);
    }
    for _ in labels {
        push_field(&mut buf, "AgAgCl electrodes", 80);
    }
    for _ in labels {
        push_field(&mut buf, "uV", 8);
    }
    for _ in labels {
        push_field(&mut buf, "-3200", 8);
    }
    for _ in labels {
        push_field(&mut buf, "3200", 8);
    }
    for _ in labels {
        push_field(&mut buf, "-32768", 8);
    }
    for _ in labels {
        push_field(&mut buf, "32767", 8);
    }
    for _ in labels {
        push_field(&mut buf, "HP:0.1Hz LP:70Hz", 80);
    }
    for _ in labels {
        push_field(&mut buf, &samples_per_record.to_string(), 8);
    }
    for _ in labels {
        push_field(&mut buf, "", 32);
    }

    buf.resize(buf.len() + records * ns * samples_per_record * 2, 0);
    buf
}

/// Writes a minimal EDF recording to `path`
pub fn create_recording<P: AsRef<Path>>(
    path: P,
    labels: &[&str],
    samples_per_record: usize,
    records: usize,
) -> Result<()> {
    fs::write(path, recording_bytes(labels, samples_per_record, records))?;
    Ok(())
}

/// Creates a small Siena-style source tree under `root`
///
/// * `PN00/` - labeled-block list with two recordings; the second seizure
///   crosses midnight and the third block has no end time
/// * `PN01/` - delimited list, one malformed line
/// * `PN02/` - one recording and no seizure list
/// * `subject_info.csv` - demographics for the three subjects
pub fn create_siena_dataset<P: AsRef<Path>>(root: P) -> Result<()> {
    let root = root.as_ref();

    let pn00 = root.join("PN00");
    fs::create_dir_all(&pn00)?;
    create_recording(pn00.join("PN00-1.edf"), &["Fp1", "F3", "C3"], 512, 2)?;
    create_recording(pn00.join("PN00-2.edf"), &["Fp1", "F3", "C3"], 512, 2)?;
    fs::write(
        pn00.join("Seizures-list-PN00.txt"),
        "Patient id number: PN00\nNumber of seizures: 3\n\n\
         Seizure n 1\n\
         File name: PN00-1.edf\n\
         Registration start time: 20.00.00\n\
         Registration end time: 21.00.00\n\
         Seizure start time: 20.05.30\n\
         Seizure end time: 20.07.00\n\n\
         Seizure n 2\n\
         File name: PN00-2.edf\n\
         Registration start time: 23.58.00\n\
         Registration end time: 01.00.00\n\
         Seizure start time: 00.01.00\n\
         Seizure end time: 00.02.00\n\n\
         Seizure n 3\n\
         File name: PN00-2.edf\n\
         Registration start time: 23.58.00\n\
         Seizure start time: 00.30.00\n",
    )?;

    let pn01 = root.join("PN01");
    fs::create_dir_all(&pn01)?;
    create_recording(pn01.join("PN01-1.edf"), &["Fp1", "F7"], 512, 1)?;
    fs::write(
        pn01.join("Seizures-list-PN01.txt"),
        "# seizure times in seconds\nPN01-1.edf\n100.5,140.0\nabc,140.0\n",
    )?;

    let pn02 = root.join("PN02");
    fs::create_dir_all(&pn02)?;
    create_recording(pn02.join("PN02-1.edf"), &["Fp1"], 256, 1)?;

    fs::write(
        root.join("subject_info.csv"),
        "patient_id,age_years,gender,seizure,localization,lateralization\n\
         PN00,55,Male,IAS,T,R\n\
         PN01,46,Male,IAS,T,L\n\
         PN02,71,Male,IAS,T,L\n",
    )?;

    Ok(())
}
