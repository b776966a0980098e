use chrono::{Datelike, NaiveDate};

/// Target rendering convention for a date field, detected from the field's
/// placeholder/pattern hints or inferred from its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateConvention {
    /// `MM/DD/YYYY` — the default for US ATS forms.
    MonthDayYear,
    /// `DD/MM/YYYY`
    DayMonthYear,
    /// `YYYY-MM-DD` — native date inputs.
    Iso,
    /// `MM/YYYY`
    MonthYear,
    /// `YYYY-MM` — native month inputs.
    IsoMonth,
    /// `YYYY`
    Year,
}

impl DateConvention {
    pub fn format(self, date: NaiveDate) -> String {
        match self {
            DateConvention::MonthDayYear => date.format("%m/%d/%Y").to_string(),
            DateConvention::DayMonthYear => date.format("%d/%m/%Y").to_string(),
            DateConvention::Iso => date.format("%Y-%m-%d").to_string(),
            DateConvention::MonthYear => date.format("%m/%Y").to_string(),
            DateConvention::IsoMonth => date.format("%Y-%m").to_string(),
            DateConvention::Year => date.format("%Y").to_string(),
        }
    }

    /// Parse a string rendered in this convention back to a date.
    /// Month-precision conventions land on the first of the month.
    pub fn parse(self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        match self {
            DateConvention::MonthDayYear => NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok(),
            DateConvention::DayMonthYear => NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok(),
            DateConvention::Iso => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
            DateConvention::MonthYear => {
                let (m, y) = raw.split_once('/')?;
                NaiveDate::from_ymd_opt(y.trim().parse().ok()?, m.trim().parse().ok()?, 1)
            }
            DateConvention::IsoMonth => {
                let (y, m) = raw.split_once('-')?;
                NaiveDate::from_ymd_opt(y.trim().parse().ok()?, m.trim().parse().ok()?, 1)
            }
            DateConvention::Year => NaiveDate::from_ymd_opt(raw.parse().ok()?, 1, 1),
        }
    }

    /// Whether the convention keeps day precision.
    pub fn has_day(self) -> bool {
        matches!(
            self,
            DateConvention::MonthDayYear | DateConvention::DayMonthYear | DateConvention::Iso
        )
    }
}

/// Detect a convention from a placeholder/pattern hint like "MM/DD/YYYY".
pub fn detect_convention(hint: &str) -> Option<DateConvention> {
    let h = hint.to_lowercase().replace(' ', "");
    if h.contains("yyyy-mm-dd") {
        return Some(DateConvention::Iso);
    }
    if h.contains("yyyy-mm") {
        return Some(DateConvention::IsoMonth);
    }
    if h.contains("dd/mm/yyyy") || h.contains("dd.mm.yyyy") {
        return Some(DateConvention::DayMonthYear);
    }
    if h.contains("mm/dd/yyyy") || h.contains("mm.dd.yyyy") {
        return Some(DateConvention::MonthDayYear);
    }
    if h.contains("mm/yyyy") {
        return Some(DateConvention::MonthYear);
    }
    if h.contains("yyyy") && !h.contains("mm") && !h.contains("dd") {
        return Some(DateConvention::Year);
    }
    None
}

/// Parse the date shapes profiles actually contain: ISO first, then the
/// common US forms, then month-precision variants.
pub fn parse_flexible(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y", "%B %d, %Y", "%b %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    // Month precision: 2021-05, 05/2021, May 2021
    if let Some((y, m)) = raw.split_once('-') {
        if let (Ok(y), Ok(m)) = (y.trim().parse::<i32>(), m.trim().parse::<u32>()) {
            if let Some(d) = NaiveDate::from_ymd_opt(y, m, 1) {
                return Some(d);
            }
        }
    }
    if let Some((m, y)) = raw.split_once('/') {
        if let (Ok(m), Ok(y)) = (m.trim().parse::<u32>(), y.trim().parse::<i32>()) {
            if y >= 1000 {
                if let Some(d) = NaiveDate::from_ymd_opt(y, m, 1) {
                    return Some(d);
                }
            }
        }
    }
    for fmt in ["%B %Y", "%b %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{} 1", raw), &format!("{} %d", fmt)) {
            return Some(d);
        }
    }
    None
}

/// Canonical rendering used when a field gives us no convention hint.
pub fn canonical(date: NaiveDate) -> String {
    DateConvention::MonthDayYear.format(date)
}

/// Split date parts for month/day/year input clusters.
pub fn parts(date: NaiveDate) -> (u32, u32, i32) {
    (date.month(), date.day(), date.year())
}
