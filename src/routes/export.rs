// JSON document form of a RoutingTable:
// {"route_table": {"next_hop": {<next_hop>: {<destination>: RouteEntry}}}}

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use super::RoutingTable;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTableDocument {
    pub route_table: RouteTableBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTableBody {
    pub next_hop: RoutingTable,
}

impl From<RoutingTable> for RouteTableDocument {
    fn from(table: RoutingTable) -> Self {
        RouteTableDocument {
            route_table: RouteTableBody { next_hop: table },
        }
    }
}

impl From<RouteTableDocument> for RoutingTable {
    fn from(document: RouteTableDocument) -> Self {
        document.route_table.next_hop
    }
}

/// Export a table as a JSON tree
pub fn to_value(table: &RoutingTable) -> AppResult<serde_json::Value> {
    let document = RouteTableDocument::from(table.clone());
    Ok(serde_json::to_value(document)?)
}

/// Import a table from a JSON tree
pub fn from_value(value: serde_json::Value) -> AppResult<RoutingTable> {
    let document: RouteTableDocument = serde_json::from_value(value)
        .map_err(|e| AppError::InvalidDocument(e.to_string()))?;
    Ok(document.into())
}

/// Write the JSON document for a table
pub fn write_json<W: Write>(writer: W, table: &RoutingTable, pretty: bool) -> AppResult<()> {
    let value = to_value(table)?;
    if pretty {
        serde_json::to_writer_pretty(writer, &value)?;
    } else {
        serde_json::to_writer(writer, &value)?;
    }
    Ok(())
}

/// Read a table from a JSON document
pub fn read_json<R: Read>(reader: R) -> AppResult<RoutingTable> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    from_value(value)
}
