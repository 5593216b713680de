use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

/// Midnight UTC of a calendar date, the instant a stored date refers to.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// Integer division rounding toward positive infinity.
pub fn div_ceil_i64(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder != 0 && ((remainder > 0) == (denominator > 0)) {
        quotient + 1
    } else {
        quotient
    }
}

pub fn is_same_year(date: NaiveDate, year: i32) -> bool {
    date.year() == year
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_between_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let days = get_days_between(start, end);
        assert_eq!(days.len(), 4);
        assert_eq!(days[2], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(get_days_between(end, start).is_empty());
    }

    #[test]
    fn ceil_division_handles_signs() {
        assert_eq!(div_ceil_i64(1, 86_400), 1);
        assert_eq!(div_ceil_i64(86_400, 86_400), 1);
        assert_eq!(div_ceil_i64(-1, 86_400), 0);
        assert_eq!(div_ceil_i64(-86_401, 86_400), -1);
        assert_eq!(div_ceil_i64(0, 86_400), 0);
    }

    #[test]
    fn leap_years() {
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2025), 365);
        assert_eq!(days_in_year(1900), 365);
    }
}
