use crate::listing::pagination::{PageSize, Pager};
use crate::listing::sort::{sort_jobs, SortKey, SortState};
use crate::models::job_posting::JobPosting;

/// State behind the job table: fetched rows, active sort, pager and the
/// deletion awaiting confirmation on the admin screen.
#[derive(Debug, Clone, Default)]
pub struct JobListView {
    fetched: Vec<JobPosting>,
    sorted: Vec<JobPosting>,
    sort: SortState,
    pager: Pager,
    pending_delete: Option<i64>,
}

impl JobListView {
    pub fn new(jobs: Vec<JobPosting>) -> Self {
        let mut view = Self::default();
        view.replace(jobs);
        view
    }

    /// Swaps in a freshly fetched result set, keeping sort and page size.
    pub fn replace(&mut self, jobs: Vec<JobPosting>) {
        self.fetched = jobs;
        self.pager.set_total(self.fetched.len());
        self.resort();
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.select(key);
        self.resort();
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.pager.set_page_size(size);
    }

    pub fn next_page(&mut self) {
        self.pager.next();
    }

    pub fn previous_page(&mut self) {
        self.pager.previous();
    }

    /// Rows visible on the current page.
    pub fn rows(&self) -> &[JobPosting] {
        self.pager.slice(&self.sorted)
    }

    pub fn len(&self) -> usize {
        self.fetched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetched.is_empty()
    }

    pub fn request_delete(&mut self, id: i64) {
        if self.fetched.iter().any(|job| job.id == id) {
            self.pending_delete = Some(id);
        }
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Hands out the id the user agreed to delete. The row stays until
    /// [`JobListView::remove`] is called with the server's confirmation.
    pub fn confirm_delete(&mut self) -> Option<i64> {
        self.pending_delete.take()
    }

    pub fn remove(&mut self, id: i64) {
        self.fetched.retain(|job| job.id != id);
        self.sorted.retain(|job| job.id != id);
        self.pager.set_total(self.fetched.len());
    }

    fn resort(&mut self) {
        // Always sort from fetch order so ties stay in the order the API returned.
        self.sorted = self.fetched.clone();
        sort_jobs(&mut self.sorted, &self.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::sort::SortDirection;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn postings(count: i64) -> Vec<JobPosting> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        (1..=count)
            .map(|id| JobPosting {
                id,
                created_at: base + Duration::hours(id),
                post_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                organisation: format!("Org {}", id),
                job_details: Some("Clerk".into()),
                vacancies: Some((id % 3) as i32),
                location: None,
                qualification: None,
                last_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                salary: None,
                picture: None,
                more_details: None,
                notification_link: None,
                apply_link: None,
            })
            .collect()
    }

    #[test]
    fn first_page_shows_newest_twenty() {
        let view = JobListView::new(postings(45));
        assert_eq!(view.pager().total_pages(), 3);
        let rows = view.rows();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].id, 45);
        assert_eq!(rows[19].id, 26);
    }

    #[test]
    fn resorting_keeps_current_page() {
        let mut view = JobListView::new(postings(45));
        view.next_page();
        view.sort_by(SortKey::CreatedAt);
        assert_eq!(view.sort().direction, SortDirection::Asc);
        assert_eq!(view.pager().page(), 2);
        assert_eq!(view.rows()[0].id, 21);
    }

    #[test]
    fn page_size_change_returns_to_first_page() {
        let mut view = JobListView::new(postings(45));
        view.next_page();
        view.next_page();
        view.set_page_size(PageSize::Five);
        assert_eq!(view.pager().page(), 1);
        assert_eq!(view.pager().total_pages(), 9);
        assert_eq!(view.rows().len(), 5);
    }

    #[test]
    fn deletion_needs_confirmation() {
        let mut view = JobListView::new(postings(3));
        view.request_delete(2);
        view.cancel_delete();
        assert_eq!(view.confirm_delete(), None);

        view.request_delete(2);
        assert_eq!(view.confirm_delete(), Some(2));
        assert_eq!(view.len(), 3);
        view.remove(2);
        assert_eq!(view.len(), 2);
        assert!(view.rows().iter().all(|job| job.id != 2));
    }

    #[test]
    fn unknown_ids_are_not_queued_for_deletion() {
        let mut view = JobListView::new(postings(2));
        view.request_delete(99);
        assert_eq!(view.pending_delete(), None);
    }
}
