pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `2025-03-07` (or a timestamp starting with it) -> `07 Mar 2025`.
pub(crate) fn format_date(date: Option<&str>) -> String {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return "N/A".to_string();
    };

    match parse_ymd(date.get(..10).unwrap_or(date)) {
        Some((y, month, d)) => format!("{:02} {} {:04}", d, month, y),
        None => date.to_string(),
    }
}

fn parse_ymd(s: &str) -> Option<(u32, &'static str, u32)> {
    let mut parts = s.split('-');
    let y: u32 = parts.next()?.parse().ok()?;
    let m: usize = parts.next()?.parse().ok()?;
    let d: u32 = parts.next()?.parse().ok()?;
    let month = MONTHS.get(m.checked_sub(1)?)?;
    Some((y, month, d))
}

/// Browser-local date as `YYYY-MM-DD`, the format `<input type="date">` expects.
pub(crate) fn today_iso_local() -> String {
    let d = js_sys::Date::new_0();
    let y = d.get_full_year();
    let m = d.get_month() + 1;
    let day = d.get_date();
    format!("{:04}-{:02}-{:02}", y, m, day)
}
