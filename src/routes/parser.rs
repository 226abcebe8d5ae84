// Line parsers for the routing dump
//
// Destination lines start in column 0:
//   10.0.0.0/8         *[Static/5] 2w3d 04:30:10, metric 10
// Next-hop lines are indented and follow their destination:
//                     > to 10.0.0.1 via ge-0/0/0.0

use super::{DestinationRecord, NextHopRecord};
use crate::error::FormatError;

/// True for lines that begin with a space or tab
pub fn is_next_hop_line(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Parse a destination line.
///
/// Token layout: destination, `*[protocol/preference]`, age tokens, separator, metric.
pub fn parse_destination(line: &str) -> Result<DestinationRecord, FormatError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(FormatError::new(line, "destination line has too few fields"));
    }

    let destination = parts[0].to_string();

    let source = parts[1].trim_matches(|c| matches!(c, '*' | '[' | ']'));
    let Some((protocol, preference)) = source.split_once('/') else {
        return Err(FormatError::new(line, "expected [protocol/preference]"));
    };
    let preference = preference
        .parse()
        .map_err(|_| FormatError::new(line, format!("preference {:?} is not a number", preference)))?;

    let metric_token = parts[parts.len() - 1];
    let metric = metric_token
        .parse()
        .map_err(|_| FormatError::new(line, format!("metric {:?} is not a number", metric_token)))?;

    let age = parts[2..parts.len() - 2].join(" ");
    let age = age.strip_suffix(',').unwrap_or(&age).to_string();

    Ok(DestinationRecord {
        destination,
        protocol: protocol.to_string(),
        preference,
        age,
        metric,
    })
}

/// Parse a next-hop line: `... <next_hop> <separator> <via>`
pub fn parse_next_hop(line: &str) -> Result<NextHopRecord, FormatError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(FormatError::new(line, "next-hop line has too few fields"));
    }

    let len = parts.len();
    Ok(NextHopRecord {
        next_hop: parts[len - 3].to_string(),
        via: parts[len - 1].to_string(),
    })
}
