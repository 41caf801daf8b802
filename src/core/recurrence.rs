use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// How often a task repeats.
///
/// Daily is the only repeating pattern for now; weekly/monthly would slot
/// in as further variants carrying their own parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
}

impl Recurrence {
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether a template anchored at `anchor` produces an occurrence on
    /// `date`. The anchor's own day counts; earlier days never do.
    pub fn occurs_on(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        match self {
            Self::None => anchor == date,
            Self::Daily => anchor <= date,
        }
    }
}

/// Due moment of an occurrence on `date`: the occurrence date combined with
/// the anchor's hour and minute. Seconds are dropped — the canonical
/// time-of-day is minute resolution.
pub fn instance_due_at(anchor_due: NaiveDateTime, date: NaiveDate) -> NaiveDateTime {
    let time = anchor_due.time();
    date.and_hms_opt(time.hour(), time.minute(), 0)
        .unwrap_or_else(|| date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_occurs_from_anchor_onward() {
        let anchor = d(2024, 1, 1);
        assert!(Recurrence::Daily.occurs_on(anchor, d(2024, 1, 1)));
        assert!(Recurrence::Daily.occurs_on(anchor, d(2024, 1, 3)));
        assert!(!Recurrence::Daily.occurs_on(anchor, d(2023, 12, 31)));
    }

    #[test]
    fn one_off_occurs_only_on_its_day() {
        let anchor = d(2024, 1, 2);
        assert!(Recurrence::None.occurs_on(anchor, d(2024, 1, 2)));
        assert!(!Recurrence::None.occurs_on(anchor, d(2024, 1, 1)));
        assert!(!Recurrence::None.occurs_on(anchor, d(2024, 1, 3)));
    }

    #[test]
    fn instance_due_keeps_anchor_time_of_day() {
        let anchor = d(2024, 1, 1).and_hms_opt(9, 30, 45).unwrap();
        let due = instance_due_at(anchor, d(2024, 1, 3));
        assert_eq!(due, d(2024, 1, 3).and_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Recurrence::Daily).unwrap(), "\"daily\"");
        assert_eq!(serde_json::to_string(&Recurrence::None).unwrap(), "\"none\"");
    }
}
