use std::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

use reportboard_common::{Category, Report, ReportBoardError, Result};

/// Label of the "no restriction" choice in both selectors.
pub const ALL_LABEL: &str = "All";

// --- Category selection ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_LABEL,
            CategoryFilter::Only(c) => c.as_str(),
        }
    }

    /// Exact match against the record's raw label. A record whose category
    /// is outside the taxonomy only passes `All`.
    pub fn matches(&self, report: &Report) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => report.category == c.as_str(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ReportBoardError;

    fn from_str(s: &str) -> Result<Self> {
        if s == ALL_LABEL {
            return Ok(CategoryFilter::All);
        }
        Category::from_label(s)
            .map(CategoryFilter::Only)
            .ok_or_else(|| ReportBoardError::InvalidCriteria(format!("unknown category {s:?}")))
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// --- Time window ---

/// Time-window selection. Every window other than `All` is the half-open
/// interval `[cutoff, +inf)` with the cutoff taken relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    All,
    /// Since local midnight.
    Today,
    /// Rolling: now minus 7 days, same time of day.
    ThisWeek,
    /// Rolling: now minus one calendar month. The day is clamped to the
    /// end of a shorter month (Mar 31 -> Feb 28/29).
    ThisMonth,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::All,
        TimeWindow::Today,
        TimeWindow::ThisWeek,
        TimeWindow::ThisMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::All => ALL_LABEL,
            TimeWindow::Today => "Today",
            TimeWindow::ThisWeek => "This Week",
            TimeWindow::ThisMonth => "This Month",
        }
    }

    /// Earliest accepted timestamp, or `None` when the window is unbounded.
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            TimeWindow::All => None,
            TimeWindow::Today => Some(now.date().and_time(NaiveTime::MIN)),
            TimeWindow::ThisWeek => Some(
                now.checked_sub_signed(Duration::days(7))
                    .unwrap_or(NaiveDateTime::MIN),
            ),
            TimeWindow::ThisMonth => Some(
                now.checked_sub_months(Months::new(1))
                    .unwrap_or(NaiveDateTime::MIN),
            ),
        }
    }
}

impl FromStr for TimeWindow {
    type Err = ReportBoardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| ReportBoardError::InvalidCriteria(format!("unknown time window {s:?}")))
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TimeWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// --- Criteria ---

/// The current search / category / time-window selection.
///
/// Category and window are typed, so a label outside the taxonomy is
/// rejected when the criteria are built and never reaches the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring; empty means no search.
    pub search_term: String,
    pub category: CategoryFilter,
    pub time_window: TimeWindow,
}

impl FilterCriteria {
    pub fn new(
        search_term: impl Into<String>,
        category: CategoryFilter,
        time_window: TimeWindow,
    ) -> Self {
        Self {
            search_term: search_term.into(),
            category,
            time_window,
        }
    }

    /// Build from the raw labels the filter controls emit.
    pub fn parse(search_term: &str, category: &str, time_window: &str) -> Result<Self> {
        Ok(Self::new(search_term, category.parse()?, time_window.parse()?))
    }

    /// True for the identity selection (`""`, `All`, `All`).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&mut self, update: CriteriaUpdate) {
        if let Some(search_term) = update.search_term {
            self.search_term = search_term;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(time_window) = update.time_window {
            self.time_window = time_window;
        }
    }
}

/// A partial criteria change. Fields left `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaUpdate {
    pub search_term: Option<String>,
    pub category: Option<CategoryFilter>,
    pub time_window: Option<TimeWindow>,
}

impl CriteriaUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = Some(category);
        self
    }

    pub fn window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }

    /// Validate raw labels into an update. Any unknown label rejects the
    /// whole update.
    pub fn parse(
        search_term: Option<&str>,
        category: Option<&str>,
        time_window: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            search_term: search_term.map(str::to_string),
            category: category.map(|c| c.parse::<CategoryFilter>()).transpose()?,
            time_window: time_window.map(|w| w.parse::<TimeWindow>()).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.search_term.is_none() && self.category.is_none() && self.time_window.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Rape".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Rape)
        );
        assert!(matches!(
            "rape".parse::<CategoryFilter>(),
            Err(ReportBoardError::InvalidCriteria(_))
        ));
        assert!("".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_time_window_parse() {
        assert_eq!("This Week".parse::<TimeWindow>().unwrap(), TimeWindow::ThisWeek);
        assert_eq!("All".parse::<TimeWindow>().unwrap(), TimeWindow::All);
        assert!(matches!(
            "Last Year".parse::<TimeWindow>(),
            Err(ReportBoardError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn test_category_filter_matches_raw_label() {
        let report = Report::new("1", "Rape", "Uptown", "2025-05-14T09:30:00", "Completed");
        assert!(CategoryFilter::All.matches(&report));
        assert!(CategoryFilter::Only(Category::Rape).matches(&report));
        assert!(!CategoryFilter::Only(Category::Negligence).matches(&report));

        let unknown = Report::new("2", "Arson", "Uptown", "2025-05-14T09:30:00", "Completed");
        assert!(CategoryFilter::All.matches(&unknown));
        assert!(Category::ALL
            .into_iter()
            .all(|c| !CategoryFilter::Only(c).matches(&unknown)));
    }

    #[test]
    fn test_cutoff_today_is_local_midnight() {
        let now = at(2025, 5, 16, 14, 30);
        assert_eq!(TimeWindow::Today.cutoff(now), Some(at(2025, 5, 16, 0, 0)));
    }

    #[test]
    fn test_cutoff_week_is_rolling() {
        let now = at(2025, 5, 16, 14, 30);
        assert_eq!(TimeWindow::ThisWeek.cutoff(now), Some(at(2025, 5, 9, 14, 30)));
    }

    #[test]
    fn test_cutoff_month_clamps_day() {
        assert_eq!(
            TimeWindow::ThisMonth.cutoff(at(2025, 5, 16, 8, 0)),
            Some(at(2025, 4, 16, 8, 0))
        );
        assert_eq!(
            TimeWindow::ThisMonth.cutoff(at(2025, 3, 31, 8, 0)),
            Some(at(2025, 2, 28, 8, 0))
        );
        assert_eq!(
            TimeWindow::ThisMonth.cutoff(at(2024, 3, 31, 8, 0)),
            Some(at(2024, 2, 29, 8, 0))
        );
        assert_eq!(
            TimeWindow::ThisMonth.cutoff(at(2025, 1, 10, 8, 0)),
            Some(at(2024, 12, 10, 8, 0))
        );
    }

    #[test]
    fn test_cutoff_all_is_unbounded() {
        assert_eq!(TimeWindow::All.cutoff(at(2025, 5, 16, 0, 0)), None);
    }

    #[test]
    fn test_criteria_parse_and_default() {
        let criteria = FilterCriteria::parse("", "All", "All").unwrap();
        assert!(criteria.is_default());

        let criteria = FilterCriteria::parse("east", "Verbal Abuse", "Today").unwrap();
        assert!(!criteria.is_default());
        assert_eq!(criteria.category, CategoryFilter::Only(Category::VerbalAbuse));
        assert_eq!(criteria.time_window, TimeWindow::Today);

        assert!(FilterCriteria::parse("", "Everything", "All").is_err());
    }

    #[test]
    fn test_partial_update_keeps_unspecified_fields() {
        let mut criteria = FilterCriteria::new(
            "ward",
            CategoryFilter::Only(Category::Rape),
            TimeWindow::Today,
        );

        criteria.apply(CriteriaUpdate::new().window(TimeWindow::ThisMonth));
        assert_eq!(criteria.search_term, "ward");
        assert_eq!(criteria.category, CategoryFilter::Only(Category::Rape));
        assert_eq!(criteria.time_window, TimeWindow::ThisMonth);

        criteria.apply(CriteriaUpdate::new().search("").category(CategoryFilter::All));
        assert_eq!(criteria.search_term, "");
        assert_eq!(criteria.category, CategoryFilter::All);
        assert_eq!(criteria.time_window, TimeWindow::ThisMonth);
    }

    #[test]
    fn test_update_parse_rejects_whole_update_on_bad_label() {
        let update = CriteriaUpdate::parse(Some("x"), None, Some("This Week")).unwrap();
        assert_eq!(update.search_term.as_deref(), Some("x"));
        assert_eq!(update.category, None);
        assert_eq!(update.time_window, Some(TimeWindow::ThisWeek));

        assert!(CriteriaUpdate::parse(Some("x"), Some("Theft"), None).is_err());
        assert!(CriteriaUpdate::parse(None, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_criteria_serializes_as_labels() {
        let criteria = FilterCriteria::new(
            "",
            CategoryFilter::Only(Category::EconomicAbuse),
            TimeWindow::ThisWeek,
        );
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["category"], "Economic Abuse");
        assert_eq!(json["time_window"], "This Week");
        assert_eq!(json["search_term"], "");
    }
}
