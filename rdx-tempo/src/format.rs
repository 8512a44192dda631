//! Duration codec: milliseconds to text and strict `HH:MM:SS` back.
//!
//! This layer holds no state and never touches the clock. The only link to
//! the registry is [`OneShotReadout`], used by [`render_remaining`] and
//! [`render_elapsed`] to fetch a one-shot's current value.
//!
//! Nothing here allocates. Rendering writes into any [`fmt::Write`], into a
//! caller-owned byte buffer, or is deferred behind a [`Rendered`] value that
//! implements `Display`.

use crate::common::TimerId;
use crate::registry::OneShotReadout;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const MS_PER_SECOND: u32 = 1_000;
const MS_PER_MINUTE: u32 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u32 = 60 * MS_PER_MINUTE;

/// Output style for rendered durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// `HH:MM:SS.mmm`, e.g. `00:00:03.512`.
    HmsMs,
    /// `HH:MM:SS`.
    Hms,
    /// Raw decimal milliseconds.
    Ms,
    /// `123 ms`, `5 sec`, `2 min`. Larger units are truncated, not rounded.
    #[default]
    AutoShort,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::HmsMs, Format::Hms, Format::Ms, Format::AutoShort];

    pub fn name(self) -> &'static str {
        match self {
            Format::HmsMs => "hms_ms",
            Format::Hms => "hms",
            Format::Ms => "ms",
            Format::AutoShort => "auto_short",
        }
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownFormat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown format, expected one of hms_ms, hms, ms, auto_short")]
pub struct UnknownFormat;

/// Why a duration string was rejected by [`parse_strict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    #[error("expected HH:MM:SS with two-digit minutes and seconds")]
    Malformed,
    #[error("minutes must be 00..=59, got {0}")]
    MinutesOutOfRange(u32),
    #[error("seconds must be 00..=59, got {0}")]
    SecondsOutOfRange(u32),
    #[error("duration does not fit in 32-bit milliseconds")]
    Overflow,
}

/// Writes `ms` in the requested style.
pub fn render_into<W: fmt::Write>(ms: u32, style: Format, out: &mut W) -> fmt::Result {
    match style {
        Format::HmsMs => {
            let (hours, minutes, seconds) = split_hms(ms);
            write!(
                out,
                "{:02}:{:02}:{:02}.{:03}",
                hours,
                minutes,
                seconds,
                ms % MS_PER_SECOND
            )
        }
        Format::Hms => {
            let (hours, minutes, seconds) = split_hms(ms);
            write!(out, "{:02}:{:02}:{:02}", hours, minutes, seconds)
        }
        Format::Ms => write!(out, "{}", ms),
        Format::AutoShort => {
            if ms < MS_PER_SECOND {
                write!(out, "{} ms", ms)
            } else if ms < MS_PER_MINUTE {
                write!(out, "{} sec", ms / MS_PER_SECOND)
            } else {
                write!(out, "{} min", ms / MS_PER_MINUTE)
            }
        }
    }
}

fn split_hms(ms: u32) -> (u32, u32, u32) {
    let total_seconds = ms / MS_PER_SECOND;
    let total_minutes = total_seconds / 60;
    (total_minutes / 60, total_minutes % 60, total_seconds % 60)
}

/// A duration waiting to be rendered. Formatting it costs no allocation.
///
/// ```
/// use tempo::format::{render, Format};
///
/// assert_eq!(render(125_000, Format::AutoShort).to_string(), "2 min");
/// assert_eq!(render(3_512, Format::HmsMs).to_string(), "00:00:03.512");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered {
    pub ms: u32,
    pub style: Format,
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_into(self.ms, self.style, f)
    }
}

pub fn render(ms: u32, style: Format) -> Rendered {
    Rendered { ms, style }
}

/// Renders into `buf`, truncating if it is too small, and returns the text.
///
/// Never writes past `buf`. Output is ASCII, so any truncation point is
/// still valid UTF-8.
pub fn render_into_buf(ms: u32, style: Format, buf: &mut [u8]) -> &str {
    let mut writer = TruncatingWriter {
        buf: &mut *buf,
        len: 0,
    };
    // A truncated write reports fmt::Error; the prefix is still what we want.
    let _ = render_into(ms, style, &mut writer);
    let len = writer.len;
    std::str::from_utf8(&buf[..len]).unwrap_or("")
}

struct TruncatingWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl fmt::Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buf.len() - self.len;
        let n = s.len().min(room);
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        if n < s.len() {
            Err(fmt::Error)
        } else {
            Ok(())
        }
    }
}

/// Parses exactly `HH:MM:SS` into milliseconds.
///
/// Hours take two or more digits and are otherwise unbounded; minutes and
/// seconds take exactly two digits in `00..=59`. Signs, whitespace, fractions
/// and trailing text are all rejected.
///
/// ```
/// use tempo::format::parse_strict;
///
/// assert_eq!(parse_strict("00:02:10"), Ok(130_000));
/// assert!(parse_strict("1:2:3").is_err());
/// ```
pub fn parse_strict(text: &str) -> Result<u32, DurationParseError> {
    let mut fields = text.split(':');
    let (Some(hh), Some(mm), Some(ss), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(DurationParseError::Malformed);
    };

    if hh.len() < 2 || mm.len() != 2 || ss.len() != 2 {
        return Err(DurationParseError::Malformed);
    }

    let hours = parse_digits(hh)?;
    let minutes = parse_digits(mm)?;
    let seconds = parse_digits(ss)?;

    if minutes > 59 {
        return Err(DurationParseError::MinutesOutOfRange(minutes));
    }
    if seconds > 59 {
        return Err(DurationParseError::SecondsOutOfRange(seconds));
    }

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND))
        .ok_or(DurationParseError::Overflow)
}

fn parse_digits(field: &str) -> Result<u32, DurationParseError> {
    field.bytes().try_fold(0u32, |acc, byte| {
        if !byte.is_ascii_digit() {
            return Err(DurationParseError::Malformed);
        }
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(u32::from(byte - b'0')))
            .ok_or(DurationParseError::Overflow)
    })
}

/// Renders the remaining time of one-shot `id`. Unknown or inactive timers render 0.
pub fn render_remaining<R: OneShotReadout + ?Sized>(timers: &R, id: TimerId, style: Format) -> Rendered {
    render(timers.remaining_ms(id), style)
}

/// Renders the elapsed time of one-shot `id`. Unknown or inactive timers render 0.
pub fn render_elapsed<R: OneShotReadout + ?Sized>(timers: &R, id: TimerId, style: Format) -> Rendered {
    render(timers.elapsed_ms(id), style)
}
