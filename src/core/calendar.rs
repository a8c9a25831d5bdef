//! Calendar helpers - date windows, ISO weeks and operating days.
//!
//! All reporting works on whole calendar days. A [`DateWindow`] is inclusive on
//! both ends, weeks run Monday through Sunday, and [`OperatingDays`] names the
//! weekdays on which the stall trades.

use chrono::{Datelike, Days, Duration, Local, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day in the window
    pub from: NaiveDate,
    /// Last day in the window
    pub to: NaiveDate,
}

impl DateWindow {
    /// Creates a window covering `from..=to`.
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// A window covering exactly one day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Whether `date` falls inside the window, ends included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Like [`contains`](Self::contains), but an unknown date is never inside.
    #[must_use]
    pub fn contains_opt(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| self.contains(d))
    }

    /// A window is valid when it does not end before it starts.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.from <= self.to
    }

    /// Number of days covered (0 for an invalid window).
    #[must_use]
    pub fn len_days(&self) -> i64 {
        if self.is_valid() {
            (self.to - self.from).num_days() + 1
        } else {
            0
        }
    }

    /// The same window moved by `days` (negative moves back in time).
    ///
    /// `None` when either end would leave the supported date range.
    #[must_use]
    pub fn shift_days(&self, days: i64) -> Option<Self> {
        let delta = Duration::try_days(days)?;
        Some(Self::new(
            self.from.checked_add_signed(delta)?,
            self.to.checked_add_signed(delta)?,
        ))
    }

    /// The same window moved by whole weeks; `None` when out of range.
    #[must_use]
    pub fn shift_weeks(&self, weeks: i64) -> Option<Self> {
        self.shift_days(weeks.checked_mul(7)?)
    }
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(NaiveDate::MIN)
}

/// Sunday of the week containing `date`.
#[must_use]
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date)
        .checked_add_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX)
}

/// Monday-to-Sunday window containing `date`.
#[must_use]
pub fn week_window(date: NaiveDate) -> DateWindow {
    DateWindow::new(week_start(date), week_end(date))
}

/// The week before `window`. At the start of the supported range the window is
/// returned unchanged.
#[must_use]
pub fn previous_week(window: DateWindow) -> DateWindow {
    window.shift_weeks(-1).unwrap_or(window)
}

/// The week after `window`. At the end of the supported range the window is
/// returned unchanged.
#[must_use]
pub fn next_week(window: DateWindow) -> DateWindow {
    window.shift_weeks(1).unwrap_or(window)
}

/// The Monday-Sunday week `weeks` weeks before the one containing `reference`.
///
/// `None` when that week lies before the supported date range.
#[must_use]
pub fn weeks_back(reference: NaiveDate, weeks: u32) -> Option<DateWindow> {
    week_window(reference).shift_weeks(-i64::from(weeks))
}

/// Today's date on the local clock.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The week containing today.
#[must_use]
pub fn current_week() -> DateWindow {
    week_window(today())
}

/// Named date ranges offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    /// Just the reference day
    Today,
    /// Monday-Sunday week containing the reference day
    Week,
    /// Calendar month containing the reference day
    Month,
    /// A caller-supplied window; invalid windows fall back to the reference day
    Custom(DateWindow),
}

/// Resolves a preset against a reference day.
#[must_use]
pub fn preset_window(preset: RangePreset, reference: NaiveDate) -> DateWindow {
    match preset {
        RangePreset::Today => DateWindow::single_day(reference),
        RangePreset::Week => week_window(reference),
        RangePreset::Month => month_window(reference),
        RangePreset::Custom(window) if window.is_valid() => window,
        RangePreset::Custom(_) => DateWindow::single_day(reference),
    }
}

/// First to last day of the month containing `date`.
#[must_use]
pub fn month_window(date: NaiveDate) -> DateWindow {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    DateWindow::new(first, last)
}

/// Human label for how long ago `date` was ("Today", "3 days ago", ...).
#[must_use]
pub fn relative_date_label(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days();
    match days {
        -1 => "Tomorrow".to_string(),
        d if d < 0 => format!("In {} days", d.unsigned_abs()),
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{d} days ago"),
        d if d < 30 => format!("{} weeks ago", d / 7),
        d if d < 365 => format!("{} months ago", d / 30),
        d => format!("{} years ago", d / 365),
    }
}

/// Parses a `YYYY-MM-DD` form value, falling back to `fallback` when it is empty or invalid.
#[must_use]
pub fn parse_date_or(input: &str, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").unwrap_or(fallback)
}

/// The weekdays on which sales count for weekly summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingDays(Vec<Weekday>);

impl OperatingDays {
    /// Builds the set, keeping the first occurrence of each weekday in order.
    #[must_use]
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut unique = Vec::new();
        for day in days {
            if !unique.contains(&day) {
                unique.push(day);
            }
        }
        Self(unique)
    }

    /// Whether `date` falls on an operating day.
    #[must_use]
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.0.contains(&date.weekday())
    }

    /// Configured weekdays in order.
    #[must_use]
    pub fn days(&self) -> &[Weekday] {
        &self.0
    }

    /// Dates of each operating day inside `window`, in configured order.
    #[must_use]
    pub fn dates_in(&self, window: DateWindow) -> Vec<(Weekday, NaiveDate)> {
        let monday = week_start(window.from);
        self.0
            .iter()
            .filter_map(|&day| {
                let date =
                    monday.checked_add_days(Days::new(u64::from(day.num_days_from_monday())))?;
                window.contains(date).then_some((day, date))
            })
            .collect()
    }
}

impl Default for OperatingDays {
    fn default() -> Self {
        Self(vec![Weekday::Fri, Weekday::Sat])
    }
}

/// Full English name of a weekday ("Friday").
#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
