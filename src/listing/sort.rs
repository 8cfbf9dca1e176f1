use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::job_posting::JobPosting;

/// Columns a job listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    PostDate,
    LastDate,
    Vacancies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::CreatedAt,
        SortKey::PostDate,
        SortKey::LastDate,
        SortKey::Vacancies,
    ];

    /// Column name in `job_listings`.
    pub fn column(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::PostDate => "post_date",
            SortKey::LastDate => "last_date",
            SortKey::Vacancies => "vacancies",
        }
    }

    pub fn compare(self, a: &JobPosting, b: &JobPosting) -> Ordering {
        match self {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::PostDate => a.post_date.cmp(&b.post_date),
            SortKey::LastDate => a.last_date.cmp(&b.last_date),
            SortKey::Vacancies => a.vacancies.cmp(&b.vacancies),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.column().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unsupported sort key '{}', expected one of created_at, post_date, last_date, vacancies",
                    s
                )
            })
    }
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Unsupported sort order '{}', expected asc or desc", other)),
        }
    }
}

/// The single active sort column and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in ascending order.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggled();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn compare(&self, a: &JobPosting, b: &JobPosting) -> Ordering {
        self.direction.apply(self.key.compare(a, b))
    }
}

/// Stable sort: postings with equal keys keep their input order in both
/// directions. Missing vacancies order before any value when ascending.
pub fn sort_jobs(jobs: &mut [JobPosting], state: &SortState) {
    jobs.sort_by(|a, b| state.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn posting(id: i64, vacancies: Option<i32>, day: u32) -> JobPosting {
        JobPosting {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap(),
            post_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            organisation: format!("Org {}", id),
            job_details: None,
            vacancies,
            location: None,
            qualification: None,
            last_date: NaiveDate::from_ymd_opt(2024, 2, 29 - day).unwrap(),
            salary: None,
            picture: None,
            more_details: None,
            notification_link: None,
            apply_link: None,
        }
    }

    fn ids(jobs: &[JobPosting]) -> Vec<i64> {
        jobs.iter().map(|j| j.id).collect()
    }

    #[test]
    fn default_is_newest_first() {
        let mut jobs = vec![posting(1, None, 3), posting(2, None, 9), posting(3, None, 5)];
        sort_jobs(&mut jobs, &SortState::default());
        assert_eq!(ids(&jobs), vec![2, 3, 1]);
    }

    #[test]
    fn select_toggles_same_key_and_resets_new_key() {
        let mut state = SortState::default();
        state.select(SortKey::CreatedAt);
        assert_eq!(state, SortState::new(SortKey::CreatedAt, SortDirection::Asc));
        state.select(SortKey::CreatedAt);
        assert_eq!(state.direction, SortDirection::Desc);
        state.select(SortKey::Vacancies);
        assert_eq!(state, SortState::new(SortKey::Vacancies, SortDirection::Asc));
    }

    #[test]
    fn vacancies_descending_reverses_ascending_keys() {
        let input = vec![
            posting(1, Some(4), 1),
            posting(2, Some(1), 2),
            posting(3, None, 3),
            posting(4, Some(9), 4),
        ];

        let mut asc = input.clone();
        sort_jobs(&mut asc, &SortState::new(SortKey::Vacancies, SortDirection::Asc));
        let mut desc = input;
        sort_jobs(&mut desc, &SortState::new(SortKey::Vacancies, SortDirection::Desc));

        let asc_keys: Vec<_> = asc.iter().map(|j| j.vacancies).collect();
        let mut desc_keys: Vec<_> = desc.iter().map(|j| j.vacancies).collect();
        desc_keys.reverse();
        assert_eq!(asc_keys, desc_keys);
        assert_eq!(asc_keys, vec![None, Some(1), Some(4), Some(9)]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let input = vec![
            posting(7, Some(2), 1),
            posting(3, Some(2), 2),
            posting(5, Some(1), 3),
            posting(1, Some(2), 4),
        ];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut jobs = input.clone();
            sort_jobs(&mut jobs, &SortState::new(SortKey::Vacancies, direction));
            let tied: Vec<_> = jobs.iter().filter(|j| j.vacancies == Some(2)).map(|j| j.id).collect();
            assert_eq!(tied, vec![7, 3, 1]);
        }
    }

    #[test]
    fn last_date_compares_as_dates() {
        let mut jobs = vec![posting(1, None, 1), posting(2, None, 20), posting(3, None, 10)];
        sort_jobs(&mut jobs, &SortState::new(SortKey::LastDate, SortDirection::Asc));
        assert_eq!(ids(&jobs), vec![2, 3, 1]);
    }

    #[test]
    fn keys_parse_from_column_names() {
        assert_eq!("post_date".parse::<SortKey>().unwrap(), SortKey::PostDate);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("salary".parse::<SortKey>().is_err());
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
