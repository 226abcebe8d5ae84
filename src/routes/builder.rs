// Folds dump lines into a RoutingTable

use indexmap::IndexMap;
use std::io::BufRead;

use super::parser::{is_next_hop_line, parse_destination, parse_next_hop};
use super::{DestinationMap, RouteEntry, RoutingTable};
use crate::error::{AppError, AppResult, FormatError};

/// Single-pass builder: each destination line is held until the next-hop
/// line that follows it.
#[derive(Debug, Default)]
pub struct TableBuilder {
    next_hops: IndexMap<String, DestinationMap>,
    pending: Option<String>,
    dropped: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line of the dump
    pub fn push_line(&mut self, line: &str) -> Result<(), FormatError> {
        if line.trim().is_empty() {
            tracing::trace!("Skipping blank line");
            return Ok(());
        }

        if !is_next_hop_line(line) {
            if let Some(previous) = self.pending.replace(line.to_string()) {
                self.drop_pending(&previous);
            }
            return Ok(());
        }

        let Some(pending) = self.pending.take() else {
            return Err(FormatError::new(
                line,
                "next-hop line without a preceding destination line",
            ));
        };

        let destination = parse_destination(&pending)?;
        let next_hop = parse_next_hop(line)?;

        let key = destination.destination.clone();
        tracing::trace!(
            "{} [{}/{}] via {} on {}",
            key,
            destination.protocol,
            destination.preference,
            next_hop.next_hop,
            next_hop.via
        );
        let entry = RouteEntry::new(destination, &next_hop);
        let group = self.next_hops.entry(next_hop.next_hop).or_default();
        if group.insert(key.clone(), entry).is_some() {
            tracing::debug!("Destination {} repeated for the same next hop, keeping last", key);
        }

        Ok(())
    }

    /// Finish the pass; a trailing unpaired destination line is discarded
    pub fn finish(mut self) -> RoutingTable {
        if let Some(pending) = self.pending.take() {
            self.drop_pending(&pending);
        }
        if self.dropped > 0 {
            tracing::debug!("Dropped {} destination line(s) without a next hop", self.dropped);
        }
        RoutingTable::from_map(self.next_hops)
    }

    fn drop_pending(&mut self, line: &str) {
        tracing::debug!("Dropping unpaired destination line: {}", line);
        self.dropped += 1;
    }
}

/// Build a table from in-memory lines
#[cfg(test)]
pub fn build_table<'a, I>(lines: I) -> AppResult<RoutingTable>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = TableBuilder::new();
    for (index, line) in lines.into_iter().enumerate() {
        builder
            .push_line(line)
            .map_err(|source| AppError::Parse { line_no: index + 1, source })?;
    }
    Ok(builder.finish())
}

/// Build a table from a readable dump
pub fn read_table<R: BufRead>(reader: R) -> AppResult<RoutingTable> {
    let mut builder = TableBuilder::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        builder
            .push_line(&line)
            .map_err(|source| AppError::Parse { line_no: index + 1, source })?;
    }

    let table = builder.finish();
    tracing::info!(
        "Parsed {} route(s) across {} next hop(s)",
        table.route_count(),
        table.next_hop_count()
    );
    Ok(table)
}
