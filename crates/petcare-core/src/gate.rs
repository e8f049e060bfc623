//! Session gate: may a play session start or continue right now?
//!
//! The gate knows nothing about the pet. [`PlaytimeLimits`] combines four
//! independent rules, each of which can be switched off:
//!
//! | Rule | Blocks when |
//! |------|-------------|
//! | quiet hours | local time strictly inside `(start, end)` |
//! | daily quota | today's playtime strictly past the quota |
//! | weekly quota | this ISO week's playtime strictly past the quota |
//! | blocked days | today is one of the listed weekdays |

use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub trait SessionGate {
    fn permits(&self, now: NaiveDateTime) -> bool;
}

/// A gate with no rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOpen;

impl SessionGate for AlwaysOpen {
    fn permits(&self, _now: NaiveDateTime) -> bool {
        true
    }
}

#[derive(Debug, Error)]
pub enum LimitsError {
    #[error("failed to access limits file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed limits file: {0}")]
    Json(#[from] serde_json::Error),
}

/// The rule that closed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    QuietHours,
    DailyQuota,
    WeeklyQuota,
    BlockedDay(Weekday),
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockReason::QuietHours => f.write_str("it is quiet hours"),
            BlockReason::DailyQuota => f.write_str("today's playtime is used up"),
            BlockReason::WeeklyQuota => f.write_str("this week's playtime is used up"),
            BlockReason::BlockedDay(day) => write!(f, "play is not allowed on {day}"),
        }
    }
}

/// A same-day window of local time during which play is blocked.
///
/// The window does not wrap past midnight: blocking needs
/// `start < t < end`, so a window with `start >= end` (such as 21:00 to
/// 07:00) never blocks. `petcare limits quiet-hours` rejects such windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Accumulated playtime, in whole seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaytimeUsage {
    pub daily_secs: u64,
    pub weekly_secs: u64,
    pub total_secs: u64,
    pub session_count: u32,
    /// Day the daily and weekly counters were last updated.
    pub last_played: Option<NaiveDate>,
}

impl PlaytimeUsage {
    fn same_week(a: NaiveDate, b: NaiveDate) -> bool {
        a.iso_week() == b.iso_week()
    }

    /// Daily counter as seen on `today`.
    pub fn daily_on(&self, today: NaiveDate) -> u64 {
        match self.last_played {
            Some(day) if day == today => self.daily_secs,
            _ => 0,
        }
    }

    /// Weekly counter as seen on `today`.
    pub fn weekly_on(&self, today: NaiveDate) -> u64 {
        match self.last_played {
            Some(day) if Self::same_week(day, today) => self.weekly_secs,
            _ => 0,
        }
    }

    pub fn average_session_secs(&self) -> u64 {
        match self.session_count {
            0 => 0,
            n => self.total_secs / u64::from(n),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaytimeLimits {
    pub quiet_hours: Option<QuietHours>,
    pub daily_limit_secs: Option<u64>,
    pub weekly_limit_secs: Option<u64>,
    pub blocked_days: Vec<Weekday>,
    pub usage: PlaytimeUsage,
}

impl PlaytimeLimits {
    /// Load from `path`; a missing file means no limits.
    pub fn load(path: &Path) -> Result<Self, LimitsError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LimitsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// First rule that blocks play at `now`, if any.
    pub fn block_reason(&self, now: NaiveDateTime) -> Option<BlockReason> {
        let today = now.date();
        if let Some(q) = self.quiet_hours {
            let t = now.time();
            if t > q.start && t < q.end {
                return Some(BlockReason::QuietHours);
            }
        }
        if let Some(limit) = self.daily_limit_secs {
            if self.usage.daily_on(today) > limit {
                return Some(BlockReason::DailyQuota);
            }
        }
        if let Some(limit) = self.weekly_limit_secs {
            if self.usage.weekly_on(today) > limit {
                return Some(BlockReason::WeeklyQuota);
            }
        }
        let weekday = today.weekday();
        if self.blocked_days.contains(&weekday) {
            return Some(BlockReason::BlockedDay(weekday));
        }
        None
    }

    /// Add one finished session that ended at `ended`.
    pub fn record_session(&mut self, ended: NaiveDateTime, duration_secs: u64) {
        let today = ended.date();
        let usage = &mut self.usage;
        usage.daily_secs = usage.daily_on(today) + duration_secs;
        usage.weekly_secs = usage.weekly_on(today) + duration_secs;
        usage.total_secs += duration_secs;
        usage.session_count += 1;
        usage.last_played = Some(today);
        log::info!(
            "recorded {duration_secs}s session ({}s today, {}s this week)",
            usage.daily_secs,
            usage.weekly_secs
        );
    }

    /// Clear the usage statistics, keeping the rules.
    pub fn reset_usage(&mut self) {
        self.usage = PlaytimeUsage::default();
    }
}

impl SessionGate for PlaytimeLimits {
    fn permits(&self, now: NaiveDateTime) -> bool {
        match self.block_reason(now) {
            Some(reason) => {
                log::info!("session blocked: {reason}");
                false
            }
            None => true,
        }
    }
}

/// Format seconds as `HH:MM:SS`.
pub fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_no_rules_always_permits() {
        let limits = PlaytimeLimits::default();
        assert!(limits.permits(at(2024, 3, 4, 12, 0)));
        assert!(AlwaysOpen.permits(at(2024, 3, 4, 3, 0)));
    }

    #[test]
    fn test_quiet_hours_are_exclusive() {
        let limits = PlaytimeLimits {
            quiet_hours: Some(QuietHours {
                start: hm(21, 0),
                end: hm(23, 0),
            }),
            ..Default::default()
        };
        assert!(limits.permits(at(2024, 3, 4, 21, 0)));
        assert_eq!(
            limits.block_reason(at(2024, 3, 4, 21, 1)),
            Some(BlockReason::QuietHours)
        );
        assert!(limits.permits(at(2024, 3, 4, 23, 0)));
    }

    #[test]
    fn test_quiet_hours_do_not_wrap_midnight() {
        let limits = PlaytimeLimits {
            quiet_hours: Some(QuietHours {
                start: hm(21, 0),
                end: hm(7, 0),
            }),
            ..Default::default()
        };
        assert!(limits.permits(at(2024, 3, 4, 23, 0)));
        assert!(limits.permits(at(2024, 3, 4, 3, 0)));
    }

    #[test]
    fn test_daily_quota_strictly_past_and_rolls_over() {
        let mut limits = PlaytimeLimits {
            daily_limit_secs: Some(3600),
            ..Default::default()
        };
        limits.record_session(at(2024, 3, 4, 10, 0), 3600);
        // Exactly at quota is still allowed
        assert!(limits.permits(at(2024, 3, 4, 11, 0)));
        limits.record_session(at(2024, 3, 4, 11, 0), 1);
        assert_eq!(
            limits.block_reason(at(2024, 3, 4, 12, 0)),
            Some(BlockReason::DailyQuota)
        );
        // Next day
        assert!(limits.permits(at(2024, 3, 5, 9, 0)));
    }

    #[test]
    fn test_weekly_quota_rolls_over_on_iso_week() {
        let mut limits = PlaytimeLimits {
            weekly_limit_secs: Some(100),
            ..Default::default()
        };
        // 2024-03-04 is a Monday; 2024-03-10 is the Sunday of the same week
        limits.record_session(at(2024, 3, 4, 10, 0), 60);
        limits.record_session(at(2024, 3, 6, 10, 0), 60);
        assert_eq!(limits.usage.daily_secs, 60);
        assert_eq!(limits.usage.weekly_secs, 120);
        assert!(!limits.permits(at(2024, 3, 10, 10, 0)));
        assert!(limits.permits(at(2024, 3, 11, 10, 0)));
    }

    #[test]
    fn test_blocked_days() {
        let limits = PlaytimeLimits {
            blocked_days: vec![Weekday::Sun],
            ..Default::default()
        };
        assert_eq!(
            limits.block_reason(at(2024, 3, 10, 10, 0)),
            Some(BlockReason::BlockedDay(Weekday::Sun))
        );
        assert!(limits.permits(at(2024, 3, 11, 10, 0)));
    }

    #[test]
    fn test_usage_statistics() {
        let mut limits = PlaytimeLimits::default();
        assert_eq!(limits.usage.average_session_secs(), 0);
        limits.record_session(at(2024, 3, 4, 10, 0), 90);
        limits.record_session(at(2024, 3, 4, 11, 0), 30);
        assert_eq!(limits.usage.total_secs, 120);
        assert_eq!(limits.usage.session_count, 2);
        assert_eq!(limits.usage.average_session_secs(), 60);
        assert_eq!(format_duration(3725), "01:02:05");
        limits.reset_usage();
        assert_eq!(limits.usage, PlaytimeUsage::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("limits.json");
        assert_eq!(PlaytimeLimits::load(&path).unwrap(), PlaytimeLimits::default());

        let mut limits = PlaytimeLimits {
            quiet_hours: Some(QuietHours {
                start: hm(22, 0),
                end: hm(23, 30),
            }),
            daily_limit_secs: Some(7200),
            blocked_days: vec![Weekday::Mon, Weekday::Fri],
            ..Default::default()
        };
        limits.record_session(at(2024, 3, 4, 10, 0), 42);
        limits.save(&path).unwrap();
        assert_eq!(PlaytimeLimits::load(&path).unwrap(), limits);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            PlaytimeLimits::load(&path),
            Err(LimitsError::Json(_))
        ));
    }
}
