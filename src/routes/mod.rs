// Routes module - routing dump parsing, table building and JSON export

pub mod builder;
pub mod duration;
pub mod export;
pub mod parser;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fields of a destination line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRecord {
    pub destination: String,
    pub protocol: String,
    pub preference: u32,
    pub age: String,
    pub metric: u32,
}

/// Fields of a next-hop line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextHopRecord {
    pub next_hop: String,
    pub via: String,
}

/// Leaf value of the routing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub preference: u32,
    pub age: String,
    pub metric: u32,
    pub via: String,
}

impl RouteEntry {
    pub fn new(destination: DestinationRecord, next_hop: &NextHopRecord) -> Self {
        RouteEntry {
            preference: destination.preference,
            age: destination.age,
            metric: destination.metric,
            via: next_hop.via.clone(),
        }
    }
}

/// Destinations keyed by prefix, in discovery order
pub type DestinationMap = IndexMap<String, RouteEntry>;

/// Next hop address -> destination -> route attributes.
///
/// Iteration follows the order in which next hops and destinations were
/// first seen in the dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable {
    next_hops: IndexMap<String, DestinationMap>,
}

impl RoutingTable {
    pub(crate) fn from_map(next_hops: IndexMap<String, DestinationMap>) -> Self {
        RoutingTable { next_hops }
    }

    pub fn next_hops(&self) -> impl Iterator<Item = (&str, &DestinationMap)> {
        self.next_hops.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[cfg(test)]
    pub fn get(&self, next_hop: &str, destination: &str) -> Option<&RouteEntry> {
        self.next_hops.get(next_hop)?.get(destination)
    }

    pub fn next_hop_count(&self) -> usize {
        self.next_hops.len()
    }

    /// Total number of routes across all next hops
    pub fn route_count(&self) -> usize {
        self.next_hops.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.next_hops.is_empty()
    }
}
