use crate::error::TrackerError;

/// Parse race-clock text into seconds.
///
/// Accepts `h:mm:ss[.ff]`, `mm:ss[.ff]` and `ss[.ff]`. Any non-numeric
/// segment, or more than three segments, is `InvalidFormat`; callers drop
/// the entry rather than treat it as a zero time.
pub fn parse_time(text: &str) -> Result<f64, TrackerError> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(TrackerError::invalid_format(text));
    }

    let mut values = Vec::with_capacity(parts.len());
    for part in &parts {
        match part.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => values.push(v),
            _ => return Err(TrackerError::invalid_format(text)),
        }
    }

    let seconds = match values.as_slice() {
        [h, m, s] => h * 3600.0 + m * 60.0 + s,
        [m, s] => m * 60.0 + s,
        [s] => *s,
        _ => return Err(TrackerError::invalid_format(text)),
    };
    Ok(seconds)
}

/// Render seconds as race-clock text.
///
/// `0` (or NaN) is "DNS", negative is "N/A". At an hour or more the output is
/// `h:mm:ss` with no fraction; below that it is `m:ss.ff`. Whole seconds are
/// truncated, hundredths rounded and held at 99 so they never spill into the
/// seconds column.
pub fn format_time(seconds: f64) -> String {
    if seconds == 0.0 || seconds.is_nan() {
        return "DNS".to_string();
    }
    if seconds < 0.0 {
        return "N/A".to_string();
    }

    let whole = seconds.floor();
    let h = (whole / 3600.0).floor() as u64;
    let m = ((whole % 3600.0) / 60.0).floor() as u64;
    let s = (whole % 60.0) as u64;
    let hundredths = (((seconds - whole) * 100.0).round() as u64).min(99);

    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}.{:02}", m, s, hundredths)
    }
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, 11th, 21st, 112th
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
