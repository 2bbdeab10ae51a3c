//! Calendar date validation for the order date column.
//!
//! Dates are three hyphen-separated numbers. Which component comes first
//! and the accepted year range are deployment settings carried by
//! [`DateRules`], so one validator covers both historical layouts.

/// Component order of a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `DD-MM-YYYY`
    #[default]
    DayMonthYear,
    /// `YYYY-MM-DD`
    YearMonthDay,
}

impl DateFormat {
    /// Human-readable pattern, for prompts.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "DD-MM-YYYY",
            DateFormat::YearMonthDay => "YYYY-MM-DD",
        }
    }
}

/// Accepted date layout and inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRules {
    pub format: DateFormat,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for DateRules {
    fn default() -> Self {
        Self {
            format: DateFormat::DayMonthYear,
            min_year: 1999,
            max_year: 2025,
        }
    }
}

impl DateRules {
    /// The wide-range variant: years 1900 through 3000.
    pub fn wide() -> Self {
        Self {
            min_year: 1900,
            max_year: 3000,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: DateFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_years(mut self, min_year: i32, max_year: i32) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }

    /// Check a date string against the format, year range and calendar.
    ///
    /// Malformed input is simply invalid.
    pub fn is_valid(&self, date: &str) -> bool {
        let Some((year, month, day)) = self.parse(date) else {
            return false;
        };
        if year < self.min_year || year > self.max_year {
            return false;
        }
        if !(1..=12).contains(&month) {
            return false;
        }
        day >= 1 && day <= days_in_month(year, month)
    }

    /// Split into (year, month, day) without range checks.
    fn parse(&self, date: &str) -> Option<(i32, u32, u32)> {
        let parts: Vec<&str> = date.trim().split('-').collect();
        if parts.len() != 3 {
            return None;
        }
        match self.format {
            DateFormat::DayMonthYear => {
                let day = component(parts[0], 2)?;
                let month = component(parts[1], 2)?;
                let year = component(parts[2], 4)?;
                Some((year as i32, month, day))
            }
            DateFormat::YearMonthDay => {
                let year = component(parts[0], 4)?;
                let month = component(parts[1], 2)?;
                let day = component(parts[2], 2)?;
                Some((year as i32, month, day))
            }
        }
    }
}

/// Parse an unsigned component of 1 to `width` ASCII digits.
fn component(text: &str, width: usize) -> Option<u32> {
    if text.is_empty() || text.len() > width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`; 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}
