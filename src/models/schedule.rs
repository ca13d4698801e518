use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Baris `schedules`. `day_of_week` 1-7, Senin = 1, Minggu = 7.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub guru_id: Uuid,
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Schedule {
    /// Interval dianggap setengah terbuka `[start, end)`: jadwal yang
    /// berakhir 09:00 tidak bentrok dengan yang mulai 09:00.
    pub fn overlaps_window(&self, start: NaiveTime, end: NaiveTime) -> bool {
        overlaps(self.start_time, self.end_time, start, end)
    }
}

pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        s.parse().unwrap()
    }

    #[test]
    fn detects_real_overlap() {
        assert!(overlaps(t("08:00:00"), t("09:30:00"), t("09:00:00"), t("10:00:00")));
        assert!(overlaps(t("09:00:00"), t("10:00:00"), t("08:00:00"), t("09:30:00")));
        // satu interval di dalam interval lain
        assert!(overlaps(t("08:00:00"), t("12:00:00"), t("09:00:00"), t("10:00:00")));
    }

    #[test]
    fn touching_boundaries_do_not_overlap() {
        assert!(!overlaps(t("08:00:00"), t("09:00:00"), t("09:00:00"), t("10:00:00")));
        assert!(!overlaps(t("09:00:00"), t("10:00:00"), t("08:00:00"), t("09:00:00")));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(t("07:00:00"), t("08:00:00"), t("10:00:00"), t("11:00:00")));
    }
}
