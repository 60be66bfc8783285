use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One calendar month: first and last day, both inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// The last full calendar month strictly before `date`'s month.
    pub fn before(date: NaiveDate) -> Self {
        let end = date.with_day(1).unwrap() - Duration::days(1);
        let start = end.with_day(1).unwrap();
        Self { start, end }
    }

    /// First day of the following month, for APIs with exclusive end dates.
    pub fn exclusive_end(&self) -> NaiveDate {
        self.end + Duration::days(1)
    }

    /// Column label such as `Jan 2024`.
    pub fn label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }
}

/// Produces `n` consecutive month windows ending with the month before
/// `today`, oldest first.
pub fn trailing_months(today: NaiveDate, n: usize) -> Vec<MonthWindow> {
    let mut windows = Vec::with_capacity(n);
    let mut cursor = today;
    for _ in 0..n {
        let window = MonthWindow::before(cursor);
        cursor = window.start;
        windows.push(window);
    }
    windows.reverse();
    windows
}
