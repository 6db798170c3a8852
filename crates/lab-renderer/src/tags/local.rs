//! `{% local %}` tag: dates and times in a fixed time zone.
//!
//! Accepted forms:
//! - `{% local "2024-03-01" "14:00" %}`: a single instant
//! - `{% local "2024-03-01" "14:00" "15:30" %}`: a range ending the same day
//!   (or the next day when the end time is not after the start time)
//! - `{% local "2024-03-01" "14:00" "2024-03-02" "09:00" %}`: an arbitrary range

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::RenderContext;

/// Text emitted when the arguments cannot be interpreted.
pub(crate) const INVALID_DATETIME: &str = "invalid datetime";

const FULL_FORMAT: &str = "%A, %B %-d, %Y, %-I:%M %p %Z";
const TIME_FORMAT: &str = "%-I:%M %p %Z";
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%z";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

/// A single instant or a range, localized to the context's time zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LocalRange {
    pub start: DateTime<Tz>,
    pub end: Option<DateTime<Tz>>,
}

impl LocalRange {
    /// Parse 2, 3 or 4 unquoted arguments.
    pub(crate) fn parse(parts: &[String], tz: Tz) -> Option<Self> {
        match parts {
            [date, time] => Some(Self {
                start: localize(parse_date(date)?.and_time(parse_time(time)?), tz)?,
                end: None,
            }),
            [date, time, end_time] => {
                let date = parse_date(date)?;
                let time = parse_time(time)?;
                let end_time = parse_time(end_time)?;
                // Assumes the range is shorter than a day
                let end_date = if end_time <= time {
                    date.succ_opt()?
                } else {
                    date
                };
                Some(Self {
                    start: localize(date.and_time(time), tz)?,
                    end: Some(localize(end_date.and_time(end_time), tz)?),
                })
            }
            [date, time, end_date, end_time] => {
                let start = localize(parse_date(date)?.and_time(parse_time(time)?), tz)?;
                let end = localize(parse_date(end_date)?.and_time(parse_time(end_time)?), tz)?;
                (end >= start).then_some(Self {
                    start,
                    end: Some(end),
                })
            }
            _ => None,
        }
    }

    /// Human-readable text, e.g. `Friday, March 1, 2024, 2:00 PM EST`.
    pub(crate) fn display(&self) -> String {
        let start = self.start.format(FULL_FORMAT).to_string();
        let Some(end) = &self.end else {
            return start;
        };

        let end_format = if ends_same_day(&self.start, end) {
            TIME_FORMAT
        } else {
            FULL_FORMAT
        };
        format!("{start} - {}", end.format(end_format))
    }

    /// Path suffix for the converter link: `START` or `START/END`.
    pub(crate) fn stamp(&self) -> String {
        let mut stamp = self.start.format(STAMP_FORMAT).to_string();
        if let Some(end) = &self.end {
            write!(stamp, "/{}", end.format(STAMP_FORMAT)).unwrap();
        }
        stamp
    }
}

/// Whether `end` falls on the start's calendar day, or exactly at the
/// following midnight.
fn ends_same_day(start: &DateTime<Tz>, end: &DateTime<Tz>) -> bool {
    let start_day = start.date_naive();
    let end_day = end.date_naive();
    end_day == start_day
        || (Some(end_day) == start_day.succ_opt() && end.time() == NaiveTime::MIN)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

/// Interpret a wall-clock time in `tz`; nonexistent times (DST gaps) fail.
fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest()
}

/// Render a local tag.
///
/// Returns `false` when the arguments were invalid and the fallback text was
/// emitted instead.
pub(crate) fn render(args: &str, ctx: &RenderContext, out: &mut String) -> bool {
    let parts = super::args::split_args(args);

    let Some(range) = LocalRange::parse(&parts, ctx.timezone) else {
        out.push_str(INVALID_DATETIME);
        return false;
    };

    let stamp = range.stamp();
    write!(
        out,
        r#"<span class="local" data-local="{stamp}">{}</span> <a class="local-converter" href="{}/{stamp}" target="_blank" rel="noopener noreferrer">(convert)</a>"#,
        range.display(),
        ctx.time_converter_url.trim_end_matches('/'),
    )
    .unwrap();
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const NY: Tz = chrono_tz::America::New_York;

    fn parts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn display(values: &[&str]) -> Option<String> {
        LocalRange::parse(&parts(values), NY).map(|r| r.display())
    }

    #[test]
    fn test_single_instant() {
        assert_eq!(
            display(&["2024-03-01", "14:00"]),
            Some("Friday, March 1, 2024, 2:00 PM EST".to_owned())
        );
    }

    #[test]
    fn test_single_instant_daylight_time() {
        assert_eq!(
            display(&["2024-07-04", "09:05"]),
            Some("Thursday, July 4, 2024, 9:05 AM EDT".to_owned())
        );
    }

    #[test]
    fn test_twelve_hour_input() {
        assert_eq!(
            display(&["2024-03-01", "2:00 PM"]),
            Some("Friday, March 1, 2024, 2:00 PM EST".to_owned())
        );
    }

    #[test]
    fn test_same_day_range() {
        assert_eq!(
            display(&["2024-03-01", "14:00", "15:30"]),
            Some("Friday, March 1, 2024, 2:00 PM EST - 3:30 PM EST".to_owned())
        );
    }

    #[test]
    fn test_three_args_wrap_past_midnight() {
        let range = LocalRange::parse(&parts(&["2024-03-01", "22:00", "01:00"]), NY).unwrap();
        assert_eq!(
            range.end.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
        assert_eq!(
            range.display(),
            "Friday, March 1, 2024, 10:00 PM EST - Saturday, March 2, 2024, 1:00 AM EST"
        );
    }

    #[test]
    fn test_three_args_ending_at_midnight() {
        assert_eq!(
            display(&["2024-03-01", "22:00", "00:00"]),
            Some("Friday, March 1, 2024, 10:00 PM EST - 12:00 AM EST".to_owned())
        );
    }

    #[test]
    fn test_four_args_same_day() {
        assert_eq!(
            display(&["2024-03-01", "14:00", "2024-03-01", "16:00"]),
            Some("Friday, March 1, 2024, 2:00 PM EST - 4:00 PM EST".to_owned())
        );
    }

    #[test]
    fn test_four_args_different_days() {
        assert_eq!(
            display(&["2024-03-01", "14:00", "2024-03-03", "16:00"]),
            Some(
                "Friday, March 1, 2024, 2:00 PM EST - Sunday, March 3, 2024, 4:00 PM EST"
                    .to_owned()
            )
        );
    }

    #[test]
    fn test_four_args_end_before_start() {
        assert_eq!(display(&["2024-03-02", "14:00", "2024-03-01", "16:00"]), None);
    }

    #[test]
    fn test_wrong_argument_count() {
        assert_eq!(display(&[]), None);
        assert_eq!(display(&["2024-03-01"]), None);
        assert_eq!(display(&["2024-03-01", "1", "2", "3", "4"]), None);
    }

    #[test]
    fn test_unparseable_values() {
        assert_eq!(display(&["March 1", "14:00"]), None);
        assert_eq!(display(&["2024-03-01", "noon"]), None);
        assert_eq!(display(&["2024-02-30", "14:00"]), None);
    }

    #[test]
    fn test_nonexistent_local_time() {
        // Clocks jump from 2:00 to 3:00 on 2024-03-10 in New York
        assert_eq!(display(&["2024-03-10", "02:30"]), None);
    }

    #[test]
    fn test_stamp() {
        let range = LocalRange::parse(&parts(&["2024-03-01", "14:00", "15:30"]), NY).unwrap();
        assert_eq!(range.stamp(), "20240301T140000-0500/20240301T153000-0500");
    }

    #[test]
    fn test_render() {
        let ctx = RenderContext::new().with_time_converter_url("https://tz.example/");
        let mut out = String::new();
        assert!(render(r#""2024-03-01" "14:00""#, &ctx, &mut out));
        assert_eq!(
            out,
            r#"<span class="local" data-local="20240301T140000-0500">Friday, March 1, 2024, 2:00 PM EST</span> <a class="local-converter" href="https://tz.example/20240301T140000-0500" target="_blank" rel="noopener noreferrer">(convert)</a>"#
        );
    }

    #[test]
    fn test_render_invalid() {
        let ctx = RenderContext::new();
        let mut out = String::new();
        assert!(!render(r#""2024-03-01""#, &ctx, &mut out));
        assert_eq!(out, "invalid datetime");
    }

    #[test]
    fn test_render_uses_context_timezone() {
        let ctx = RenderContext::new().with_timezone(chrono_tz::UTC);
        let mut out = String::new();
        render(r#""2024-03-01" "14:00""#, &ctx, &mut out);
        assert!(out.contains("2:00 PM UTC"));
        assert!(out.contains("20240301T140000+0000"));
    }
}
