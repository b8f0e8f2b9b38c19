//! Parser for detection log lines.
//!
//! A detection line carries the MPM tag, the number of matches found, and the
//! length of the scanned buffer:
//!
//! ```text
//! 12/3/2024 -- 10:01:02 - <Notice> Notice: detect: StreamMpmFunc: matched 3 bufferlength 179 [info]
//! ```
//!
//! The grammar may start anywhere in the line and anything after the buffer
//! length is ignored. Lines without a match are not records.

use mpm_core::record::LogRecord;
use nom::{
    IResult,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1},
    combinator::map_res,
    sequence::{preceded, tuple},
};

const ANCHOR: &str = "Notice:";

/// Extracts the first detection record from `line`, if any.
///
/// Every occurrence of the `Notice:` anchor is tried in order; the first one
/// that parses in full wins.
pub fn parse_line(line: &str) -> Option<LogRecord<'_>> {
    line.match_indices(ANCHOR)
        .find_map(|(start, _)| detection(&line[start..]).ok().map(|(_, record)| record))
}

fn detection(input: &str) -> IResult<&str, LogRecord<'_>> {
    let (rest, (mpm, matched, buffer_len)) = tuple((
        preceded(tuple((tag(ANCHOR), ws1, tag("detect:"), ws1)), word),
        preceded(tuple((char(':'), ws1, tag("matched"), ws1)), number),
        preceded(tuple((ws1, tag("bufferlength"), ws1)), number),
    ))(input)?;
    Ok((rest, LogRecord::new(mpm, matched, buffer_len)))
}

fn ws1(input: &str) -> IResult<&str, &str> {
    take_while1(char::is_whitespace)(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

// Values that overflow u64 fail the parse rather than saturating.
fn number(input: &str) -> IResult<&str, u64> {
    map_res(digit1, str::parse::<u64>)(input)
}
