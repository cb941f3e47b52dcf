use crate::error::{ConvertError, Result};
use crate::types::RawClockTime;

/// 解析 `HH.MM.SS` 形式的时钟时间（不接受冒号分隔）
pub fn parse_clock_time(s: &str) -> Result<RawClockTime> {
    let s = s.trim();
    let invalid = || ConvertError::InvalidClockTime(s.to_string());

    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut values = [0u32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        *value = part.parse().map_err(|_| invalid())?;
    }

    let [hour, minute, second] = values;
    if hour > 23 || minute > 59 || second > 59 {
        return Err(invalid());
    }

    Ok(RawClockTime { hour, minute, second })
}

/// Returns the seizure number when `line` is a `Seizure n N` block header
pub fn block_header_number(line: &str) -> Option<u32> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let second = words.next()?;
    let number = words.next()?;
    if words.next().is_some() {
        return None;
    }

    if !first.eq_ignore_ascii_case("seizure") || !second.eq_ignore_ascii_case("n") {
        return None;
    }

    number.parse().ok()
}

/// 标签归一化：小写并折叠内部空白
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 非本地化的整数解析（避免受系统locale影响）
pub fn atoi_nonlocalized(s: &str) -> i32 {
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }

    s.parse().unwrap_or(0)
}

/// 非本地化的浮点数解析
pub fn atof_nonlocalized(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    s.parse().unwrap_or(0.0)
}
