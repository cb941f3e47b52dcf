use siena2bids::doctest_utils::create_siena_dataset;
use siena2bids::{ConversionConfig, Converter, FsBidsWriter};
use std::fs;
use std::path::{Path, PathBuf};

// 清理测试目录的辅助函数
fn cleanup_test_dir(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).ok();
    }
}

// 创建测试数据集并返回配置
fn prepare(name: &str) -> (PathBuf, ConversionConfig) {
    let base = std::env::temp_dir().join(format!("siena2bids_it_{}", name));
    cleanup_test_dir(&base);
    create_siena_dataset(base.join("siena")).unwrap();

    let config = ConversionConfig {
        source_root: base.join("siena"),
        bids_root: base.join("bids"),
        ..ConversionConfig::default()
    };
    (base, config)
}

fn eeg_dir(bids: &Path, subject: &str) -> PathBuf {
    bids.join(format!("sub-{}", subject)).join("ses-01").join("eeg")
}

#[test]
fn test_full_conversion_layout() {
    let (base, config) = prepare("layout");
    let bids = config.bids_root.clone();

    let sink = FsBidsWriter::new(&bids);
    let summary = Converter::new(config, sink).run().unwrap();

    assert_eq!(summary.subjects, 3);
    assert_eq!(summary.recordings_converted, 4);
    assert_eq!(summary.recordings_failed(), 0);
    assert_eq!(summary.events_attached, 3);
    assert_eq!(summary.diagnostics, 3);

    assert!(bids.join("dataset_description.json").is_file());
    assert!(bids.join("participants.tsv").is_file());

    let sub00 = eeg_dir(&bids, "00");
    for suffix in ["eeg.edf", "eeg.json", "channels.tsv", "events.tsv", "events.json"] {
        let file = sub00.join(format!("sub-00_ses-01_task-seizuremonitoring_run-02_{}", suffix));
        assert!(file.is_file(), "missing {}", file.display());
    }

    // EDF按原样复制
    let original = fs::read(base.join("siena").join("PN00").join("PN00-1.edf")).unwrap();
    let copied = fs::read(sub00.join("sub-00_ses-01_task-seizuremonitoring_run-01_eeg.edf")).unwrap();
    assert_eq!(original, copied);

    cleanup_test_dir(&base);
}

#[test]
fn test_events_tsv_contents() {
    let (base, config) = prepare("events");
    let bids = config.bids_root.clone();
    Converter::new(config, FsBidsWriter::new(&bids)).run().unwrap();

    let run1 = fs::read_to_string(
        eeg_dir(&bids, "00").join("sub-00_ses-01_task-seizuremonitoring_run-01_events.tsv"),
    )
    .unwrap();
    assert_eq!(run1, "onset\tduration\ttrial_type\n330.0\t90.0\tSeizure\n");

    let run2 = fs::read_to_string(
        eeg_dir(&bids, "00").join("sub-00_ses-01_task-seizuremonitoring_run-02_events.tsv"),
    )
    .unwrap();
    assert_eq!(run2, "onset\tduration\ttrial_type\n0.0\t60.0\tSeizure\n");

    let pn01 = fs::read_to_string(
        eeg_dir(&bids, "01").join("sub-01_ses-01_task-seizuremonitoring_run-01_events.tsv"),
    )
    .unwrap();
    assert_eq!(pn01, "onset\tduration\ttrial_type\n100.5\t39.5\tSeizure\n");

    // PN02 没有发作列表
    let pn02 = fs::read_to_string(
        eeg_dir(&bids, "02").join("sub-02_ses-01_task-seizuremonitoring_run-01_events.tsv"),
    )
    .unwrap();
    assert_eq!(pn02, "onset\tduration\ttrial_type\n");

    cleanup_test_dir(&base);
}

#[test]
fn test_sidecars_and_participants() {
    let (base, config) = prepare("sidecars");
    let bids = config.bids_root.clone();
    Converter::new(config, FsBidsWriter::new(&bids)).run().unwrap();

    let eeg: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(eeg_dir(&bids, "00").join("sub-00_ses-01_task-seizuremonitoring_run-01_eeg.json"))
            .unwrap(),
    )
    .unwrap();
    assert_eq!(eeg["SamplingFrequency"], 512.0);
    assert_eq!(eeg["EEGChannelCount"], 3);
    assert_eq!(eeg["RecordingDuration"], 2.0);

    let events: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(eeg_dir(&bids, "00").join("sub-00_ses-01_task-seizuremonitoring_run-01_events.json"))
            .unwrap(),
    )
    .unwrap();
    assert_eq!(events["Seizure"]["Description"], "Epileptic seizure");

    let participants = fs::read_to_string(bids.join("participants.tsv")).unwrap();
    let lines: Vec<&str> = participants.lines().collect();
    assert_eq!(lines[0], "participant_id\tage_years\tgender\tseizure\tlocalization\tlateralization");
    assert_eq!(lines[1], "sub-00\t55\tMale\tIAS\tT\tR");
    assert_eq!(lines.len(), 4);

    cleanup_test_dir(&base);
}

#[test]
fn test_config_file_drives_conversion() {
    let (base, config) = prepare("config_file");
    let config_path = base.join("siena2bids.json");
    let json = serde_json::json!({
        "source_root": config.source_root,
        "bids_root": config.bids_root,
        "session": "02",
        "task": "rest",
        "dataset": { "Name": "Siena subset" }
    });
    fs::write(&config_path, json.to_string()).unwrap();

    let loaded = ConversionConfig::from_json_file(&config_path).unwrap();
    let bids = loaded.bids_root.clone();
    Converter::new(loaded, FsBidsWriter::new(&bids)).run().unwrap();

    let events = bids
        .join("sub-01")
        .join("ses-02")
        .join("eeg")
        .join("sub-01_ses-02_task-rest_run-01_events.tsv");
    assert!(events.is_file());

    let description: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(bids.join("dataset_description.json")).unwrap()).unwrap();
    assert_eq!(description["Name"], "Siena subset");
    assert_eq!(description["BIDSVersion"], "1.6.0");

    cleanup_test_dir(&base);
}

#[test]
fn test_recording_with_bad_start_date_still_converts() {
    let (base, config) = prepare("bad_date");
    let bids = config.bids_root.clone();

    // 头部日期字段无效
    let edf = base.join("siena").join("PN01").join("PN01-1.edf");
    let mut bytes = fs::read(&edf).unwrap();
    bytes[168..176].copy_from_slice(b"00.00.00");
    fs::write(&edf, bytes).unwrap();

    let summary = Converter::new(config, FsBidsWriter::new(&bids)).run().unwrap();
    assert_eq!(summary.recordings_failed(), 0);
    assert_eq!(summary.events_attached, 3);

    let pn01 = fs::read_to_string(
        eeg_dir(&bids, "01").join("sub-01_ses-01_task-seizuremonitoring_run-01_events.tsv"),
    )
    .unwrap();
    assert_eq!(pn01, "onset\tduration\ttrial_type\n100.5\t39.5\tSeizure\n");

    cleanup_test_dir(&base);
}
