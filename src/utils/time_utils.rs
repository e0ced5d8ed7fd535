use chrono::{DateTime, Local};

pub struct TimeUtils;

impl TimeUtils {
    pub const S_IN_MIN: u32 = 60;
    pub const S_IN_3_MIN: u32 = Self::S_IN_MIN * 3;
    pub const S_IN_5_MIN: u32 = Self::S_IN_MIN * 5;
    pub const S_IN_15_MIN: u32 = Self::S_IN_MIN * 15;
    pub const S_IN_30_MIN: u32 = Self::S_IN_MIN * 30;
    pub const S_IN_H: u32 = Self::S_IN_MIN * 60;
    pub const S_IN_2_H: u32 = Self::S_IN_H * 2;
    pub const S_IN_4_H: u32 = Self::S_IN_H * 4;
    pub const S_IN_6_H: u32 = Self::S_IN_H * 6;
    pub const S_IN_12_H: u32 = Self::S_IN_H * 12;
    pub const S_IN_D: u32 = Self::S_IN_H * 24;
    pub const S_IN_3_D: u32 = Self::S_IN_D * 3;
    pub const S_IN_W: u32 = Self::S_IN_D * 7;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
}

/// Render an epoch timestamp (seconds) as a UTC string for log output.
/// Out-of-range values are rendered raw instead of panicking.
pub fn epoch_sec_to_utc(epoch_sec: i64) -> String {
    match DateTime::from_timestamp(epoch_sec, 0) {
        Some(dt) => format!("{} UTC", dt.format(TimeUtils::STANDARD_TIME_FORMAT)),
        None => format!("{}s (out of range)", epoch_sec),
    }
}

// Local wall-clock time, used by the log line formatter
pub fn local_now_for_log() -> String {
    Local::now().format(TimeUtils::LOG_TIME_FORMAT).to_string()
}
