// Tabular report of stored routes

use std::io::{self, Write};

use crate::routes::duration;
use crate::storage::DestinationRow;

pub const HEADER: &str =
    "Destination        | Prf | Metric | Next hop        | Interface     | Age";

/// Write the report. With `collapse_repeated`, a destination equal to the
/// previous row's destination is left blank, so a run of any length shows
/// the destination only on its first row.
pub fn write_report<W: Write>(
    mut out: W,
    rows: &[DestinationRow],
    collapse_repeated: bool,
) -> io::Result<()> {
    writeln!(out, "{}", HEADER)?;

    let mut previous: Option<&str> = None;
    for row in rows {
        let destination = if collapse_repeated && previous == Some(row.destination.as_str()) {
            ""
        } else {
            row.destination.as_str()
        };
        writeln!(
            out,
            "{:<18} | {:<3} | {:<6} | {:<15} | {:<13} | {}",
            destination,
            row.preference,
            row.metric,
            row.next_hop,
            row.interface,
            duration::encode(row.age)
        )?;
        previous = Some(row.destination.as_str());
    }
    Ok(())
}
