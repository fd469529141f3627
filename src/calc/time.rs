use crate::calc::CalcError;
use chrono::NaiveDateTime;
use serde::Serialize;

// 単位→秒（月=30日、年=365日の固定換算）
const UNITS: [(&str, f64); 7] = [
    ("decade", 10.0 * 365.0 * 86_400.0),
    ("year", 365.0 * 86_400.0),
    ("month", 30.0 * 86_400.0),
    ("day", 86_400.0),
    ("hour", 3_600.0),
    ("minute", 60.0),
    ("second", 1.0),
];

// 経過時間表示用（10年単位なし、ラベルは大文字始まり）
const ELAPSED_UNITS: [(&str, f64); 6] = [
    ("Year", 365.0 * 86_400.0),
    ("Month", 30.0 * 86_400.0),
    ("Day", 86_400.0),
    ("Hour", 3_600.0),
    ("Minute", 60.0),
    ("Second", 1.0),
];

#[derive(Debug, Clone, Serialize)]
pub struct TimeEntry {
    pub unit: String,
    pub amount: f64,
}

fn seconds_in(unit: &str) -> Option<f64> {
    UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, secs)| *secs)
}

/// 値+単位を全時間単位へ展開する
pub fn time_convert(value: f64, unit: &str) -> Result<Vec<TimeEntry>, CalcError> {
    let total_seconds =
        value * seconds_in(unit).ok_or_else(|| CalcError::UnknownUnit(unit.to_string()))?;
    Ok(UNITS
        .iter()
        .map(|(name, secs)| TimeEntry {
            unit: name.to_string(),
            amount: total_seconds / secs,
        })
        .collect())
}

/// 2時刻間の経過を各単位で表す
pub fn elapsed_breakdown(start: NaiveDateTime, end: NaiveDateTime) -> Vec<TimeEntry> {
    let total_seconds = (end - start).num_seconds().abs() as f64;
    ELAPSED_UNITS
        .iter()
        .map(|(name, secs)| TimeEntry {
            unit: name.to_string(),
            amount: total_seconds / secs,
        })
        .collect()
}

/// ISO日付+任意の時刻文字列をパースする。"HH:MM" は秒を補完
pub fn parse_stamp(date: &str, time: Option<&str>) -> Result<NaiveDateTime, CalcError> {
    let time = match time {
        Some(t) if !t.is_empty() => {
            if t.len() == 5 {
                format!("{t}:00")
            } else {
                t.to_string()
            }
        }
        _ => "00:00:00".to_string(),
    };
    NaiveDateTime::parse_from_str(&format!("{date}T{time}"), "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| CalcError::InvalidDate)
}

/// 期間の表示文字列（時刻指定があれば時刻も出す）
pub fn format_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
    show_start_time: bool,
    show_end_time: bool,
) -> String {
    let start_format = if show_start_time {
        "%b %d, %Y %H:%M:%S"
    } else {
        "%b %d, %Y"
    };
    let end_format = if show_end_time {
        "%b %d, %Y %H:%M:%S"
    } else {
        "%b %d, %Y"
    };
    format!("{} - {}", start.format(start_format), end.format(end_format))
}
