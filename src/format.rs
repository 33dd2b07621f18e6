//! Display Formatting
//!
//! Indonesian-locale formatting helpers used by every widget: currency,
//! long dates, percentages, user initials and relative time labels.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

/// Format an amount of rupiah for stat cards
///
/// Millions collapse to one decimal with a comma ("Rp 12,5 Jt"),
/// thousands use dot grouping ("Rp 1.500"), smaller amounts are printed
/// as-is.
pub fn format_currency(amount: i64) -> String {
    if amount >= 1_000_000 {
        let millions = format!("{:.1}", amount as f64 / 1_000_000.0);
        format!("Rp {} Jt", millions.replace('.', ","))
    } else if amount >= 1_000 {
        format!("Rp {}", group_thousands(amount))
    } else {
        format!("Rp {}", amount)
    }
}

/// Axis tick label for the revenue chart, e.g. "Rp 1.200.000"
pub fn format_rupiah_tick(amount: i64) -> String {
    format!("Rp {}", group_thousands(amount))
}

/// Group digits in threes with a dot separator
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Share of each value in the total, one decimal place
///
/// An all-zero input yields "0.0" for every entry.
pub fn format_percentages(values: &[u32]) -> Vec<String> {
    let total: u64 = values.iter().map(|v| u64::from(*v)).sum();
    values
        .iter()
        .map(|v| {
            if total == 0 {
                "0.0".to_string()
            } else {
                format!("{:.1}", f64::from(*v) / total as f64 * 100.0)
            }
        })
        .collect()
}

/// Up to two upper-cased initials from a display name
pub fn user_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Januari",
        2 => "Februari",
        3 => "Maret",
        4 => "April",
        5 => "Mei",
        6 => "Juni",
        7 => "Juli",
        8 => "Agustus",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        12 => "Desember",
        _ => "",
    }
}

/// Long Indonesian date, e.g. "Senin, 19 Oktober 2026"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {} {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date.month()),
        date.year()
    )
}

/// Relative time label for notifications ("2 menit lalu")
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        "baru saja".to_string()
    } else if seconds < 3_600 {
        format!("{} menit lalu", seconds / 60)
    } else if seconds < 86_400 {
        format!("{} jam lalu", seconds / 3_600)
    } else {
        format!("{} hari lalu", seconds / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_currency_millions() {
        assert_eq!(format_currency(12_500_000), "Rp 12,5 Jt");
        assert_eq!(format_currency(1_000_000), "Rp 1,0 Jt");
    }

    #[test]
    fn test_format_currency_thousands_grouped() {
        assert_eq!(format_currency(1_500), "Rp 1.500");
        assert_eq!(format_currency(999_999), "Rp 999.999");
    }

    #[test]
    fn test_format_currency_small() {
        assert_eq!(format_currency(500), "Rp 500");
        assert_eq!(format_currency(0), "Rp 0");
    }

    #[test]
    fn test_rupiah_tick() {
        assert_eq!(format_rupiah_tick(1_200_000), "Rp 1.200.000");
        assert_eq!(group_thousands(-2_500), "-2.500");
    }

    #[test]
    fn test_warung_percentages() {
        let shares = format_percentages(&[35, 25, 15, 10, 8, 7]);
        assert_eq!(shares, vec!["35.0", "25.0", "15.0", "10.0", "8.0", "7.0"]);
    }

    #[test]
    fn test_percentages_of_zero_total() {
        assert_eq!(format_percentages(&[0, 0]), vec!["0.0", "0.0"]);
        assert_eq!(format_percentages(&[1, 3]), vec!["25.0", "75.0"]);
    }

    #[test]
    fn test_user_initials() {
        assert_eq!(user_initials("Admin Kantin"), "AK");
        assert_eq!(user_initials("budi santoso wijaya"), "BS");
        assert_eq!(user_initials("koki"), "K");
        assert_eq!(user_initials(""), "");
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_long_date(date), "Senin, 19 Oktober 2026");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(10), now), "baru saja");
        assert_eq!(relative_time(now - Duration::minutes(2), now), "2 menit lalu");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 jam lalu");
        assert_eq!(relative_time(now - Duration::days(2), now), "2 hari lalu");
    }
}
