//! Month-grid date picker.
//!
//! The picker is a view model: it lays out a month as rows of buttons and
//! interprets the tags those buttons send back. It keeps no state of its own;
//! the form decides what a selected date means.

use chrono::{Datelike, Month, NaiveDate};

use super::models::Button;

pub const IGNORE_TAG: &str = "ignore";
pub const TODAY_TAG: &str = "today";
pub const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// What a calendar button press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarEvent {
    /// A day cell was chosen.
    Select(NaiveDate),
    /// Show another month; consumes no selection.
    Navigate { year: i32, month: u32 },
    /// Shortcut for selecting the current date.
    Today,
    /// Header, weekday label or blank cell.
    Ignore,
}

impl CalendarEvent {
    /// Parses a button tag. Returns `None` for tags that are not calendar
    /// tags or that name an impossible date.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            IGNORE_TAG => return Some(CalendarEvent::Ignore),
            TODAY_TAG => return Some(CalendarEvent::Today),
            _ => {}
        }

        if let Some(rest) = tag.strip_prefix("date_") {
            let mut parts = rest.split('_');
            let year = parts.next()?.parse().ok()?;
            let month = parts.next()?.parse().ok()?;
            let day = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            return NaiveDate::from_ymd_opt(year, month, day).map(CalendarEvent::Select);
        }

        if let Some(rest) = tag.strip_prefix("cal_") {
            let (year, month) = rest.split_once('_')?;
            let year = year.parse().ok()?;
            let month = month.parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(CalendarEvent::Navigate { year, month });
        }

        None
    }
}

pub fn select_tag(date: NaiveDate) -> String {
    format!("date_{}_{}_{}", date.year(), date.month(), date.day())
}

pub fn navigate_tag(year: i32, month: u32) -> String {
    format!("cal_{}_{}", year, month)
}

/// Moves `delta` months from (year, month), rolling over year boundaries.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// One month laid out Monday-first, six rows at most.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Each week holds the day of month, or `None` for cells outside it.
    pub weeks: Vec<[Option<u32>; 7]>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let (next_year, next_month) = shift_month(year, month, 1);
        let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
        let days_in_month = (next_first - first).num_days() as u32;
        let offset = first.weekday().num_days_from_monday() as usize;

        let mut weeks = Vec::new();
        let mut week = [None; 7];
        let mut column = offset;
        for day in 1..=days_in_month {
            week[column] = Some(day);
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(week);
        }

        Some(Self { year, month, weeks })
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month()).unwrap_or_else(|| Self {
            year: date.year(),
            month: date.month(),
            weeks: Vec::new(),
        })
    }

    pub fn title(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("?");
        format!("{} {}", name, self.year)
    }

    pub fn previous(&self) -> (i32, u32) {
        shift_month(self.year, self.month, -1)
    }

    pub fn next(&self) -> (i32, u32) {
        shift_month(self.year, self.month, 1)
    }

    /// Button rows: title, weekday labels, one row per week, navigation.
    pub fn rows(&self) -> Vec<Vec<Button>> {
        let mut rows = Vec::with_capacity(self.weeks.len() + 3);
        rows.push(vec![Button::new(self.title(), IGNORE_TAG)]);
        rows.push(WEEKDAY_LABELS.iter().map(|l| Button::new(*l, IGNORE_TAG)).collect());

        for week in &self.weeks {
            let row = week
                .iter()
                .map(|cell| match cell.and_then(|d| NaiveDate::from_ymd_opt(self.year, self.month, d)) {
                    Some(date) => Button::new(date.day().to_string(), select_tag(date)),
                    None => Button::new(" ", IGNORE_TAG),
                })
                .collect();
            rows.push(row);
        }

        let (prev_year, prev_month) = self.previous();
        let (next_year, next_month) = self.next();
        rows.push(vec![
            Button::new("◀", navigate_tag(prev_year, prev_month)),
            Button::new("📅 Today", TODAY_TAG),
            Button::new("▶", navigate_tag(next_year, next_month)),
        ]);
        rows
    }
}
