use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

use crate::model::EventStandard;

/// Name fragments tried, in order, when the event name carries no explicit
/// `<n>km` / `<n>m` distance. Extend by adding rows.
const FALLBACK_DISTANCES: &[(&str, f64)] = &[
    ("1500", 1500.0),
    ("3000", 3000.0),
    ("5000", 5000.0),
    ("10000", 10000.0),
    ("half", 21097.5),
    ("marathon", 42195.0),
];

fn distance_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)\s*(km|m)").expect("distance pattern is valid")
    })
}

/// Distance in meters inferred from an event's name; 0 if unrecognized
pub fn get_event_distance(name: &str) -> f64 {
    let lower = name.to_lowercase();

    if let Some(caps) = distance_pattern().captures(&lower) {
        if let Ok(value) = caps[1].parse::<f64>() {
            return match &caps[2] {
                "km" => value * 1000.0,
                _ => value,
            };
        }
    }

    FALLBACK_DISTANCES
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, meters)| *meters)
        .unwrap_or(0.0)
}

/// Events ordered by ascending distance; equal distances (including
/// unrecognized ones at 0) fall back to a natural name order.
pub fn sort_events_by_distance(events: &[EventStandard]) -> Vec<&EventStandard> {
    let mut sorted: Vec<&EventStandard> = events.iter().collect();
    sorted.sort_by(|a, b| {
        let dist_a = get_event_distance(&a.name);
        let dist_b = get_event_distance(&b.name);
        dist_a
            .total_cmp(&dist_b)
            .then_with(|| natural_cmp(&a.name, &b.name))
    });
    sorted
}

/// Human-friendly distance: "12.5 km" from 1000 m up, "800 m" below
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters)
    }
}

/// Case-insensitive comparison where digit runs compare by numeric value,
/// so "Run 2" sorts before "Run 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let l_trim = l_run.trim_start_matches('0');
                let r_trim = r_run.trim_start_matches('0');
                let ord = l_trim
                    .len()
                    .cmp(&r_trim.len())
                    .then_with(|| l_trim.cmp(r_trim));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}
