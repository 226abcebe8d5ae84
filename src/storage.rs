// SQLite storage for routing tables

use rusqlite::{Connection, Transaction, params};
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::routes::{RoutingTable, duration};

/// One row of the `destination` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRow {
    pub destination: String,
    pub preference: u32,
    pub metric: u32,
    pub next_hop: String,
    pub interface: String,
    /// Age in seconds
    pub age: u64,
}

/// Open or create a database file
pub fn open(path: &Path) -> AppResult<Connection> {
    tracing::debug!("Opening database {}", path.display());
    Ok(Connection::open(path)?)
}

#[cfg(test)]
pub fn open_in_memory() -> AppResult<Connection> {
    Ok(Connection::open_in_memory()?)
}

/// Check if a table already exists
pub fn table_exists(conn: &Connection, name: &str) -> AppResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(name) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count == 1)
}

/// Create the `next_hop` table and fill it with every next hop address
pub fn create_next_hop_table(conn: &Connection, table: &RoutingTable) -> AppResult<()> {
    conn.execute("CREATE TABLE next_hop (address TEXT)", [])?;

    let mut stmt = conn.prepare("INSERT INTO next_hop VALUES (?1)")?;
    for (next_hop, _) in table.next_hops() {
        stmt.execute(params![next_hop])?;
    }
    Ok(())
}

/// Create the `destination` table and fill it with one row per route
pub fn create_destination_table(conn: &Connection, table: &RoutingTable) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE destination (
            destination TEXT,
            preference INTEGER,
            metric INTEGER,
            next_hop TEXT,
            interface TEXT,
            age INTEGER
        )",
        [],
    )?;

    let mut stmt = conn.prepare("INSERT INTO destination VALUES (?1, ?2, ?3, ?4, ?5, ?6)")?;
    for (next_hop, destinations) in table.next_hops() {
        for (destination, entry) in destinations {
            let seconds = duration::decode(&entry.age)?;
            let age = i64::try_from(seconds).map_err(|_| {
                AppError::InvalidDocument(format!("age of {} does not fit in an INTEGER column", destination))
            })?;
            stmt.execute(params![
                destination,
                entry.preference,
                entry.metric,
                next_hop,
                entry.via,
                age
            ])?;
        }
    }
    Ok(())
}

/// Store a table, creating each relation only if it does not exist yet.
///
/// Runs in one transaction: on error neither table is left behind.
pub fn save(conn: &mut Connection, table: &RoutingTable) -> AppResult<()> {
    let tx = conn.transaction()?;
    create_if_absent(&tx, "next_hop", table, create_next_hop_table)?;
    create_if_absent(&tx, "destination", table, create_destination_table)?;
    tx.commit()?;
    Ok(())
}

fn create_if_absent(
    tx: &Transaction<'_>,
    name: &str,
    table: &RoutingTable,
    create: fn(&Connection, &RoutingTable) -> AppResult<()>,
) -> AppResult<()> {
    if table_exists(tx, name)? {
        tracing::info!("Table {} already exists, leaving it unchanged", name);
        return Ok(());
    }
    create(tx, table)?;
    tracing::info!("Created table {}", name);
    Ok(())
}

/// All destination rows ordered by destination
pub fn load_destinations(conn: &Connection) -> AppResult<Vec<DestinationRow>> {
    let mut stmt = conn.prepare(
        "SELECT destination, preference, metric, next_hop, interface, age
         FROM destination ORDER BY destination",
    )?;
    let rows = stmt.query_map([], |row| {
        let age: i64 = row.get(5)?;
        Ok(DestinationRow {
            destination: row.get(0)?,
            preference: row.get(1)?,
            metric: row.get(2)?,
            next_hop: row.get(3)?,
            interface: row.get(4)?,
            age: age.max(0) as u64,
        })
    })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::builder::build_table;

    fn sample_table() -> RoutingTable {
        build_table([
            "10.2.0.0/16 *[OSPF/10] 00:15:00, metric 30",
            "    > to 10.0.0.2 via eth1",
            "10.1.0.0/16 *[OSPF/10] 2d 00:00:10, metric 20",
            "    > to 10.0.0.2 via eth1",
            "0.0.0.0/0   *[Static/5] 1w1d 01:00:00, metric 0",
            "    > to 10.0.0.1 via eth0",
        ])
        .unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let mut conn = open_in_memory().unwrap();
        save(&mut conn, &sample_table()).unwrap();

        assert!(table_exists(&conn, "next_hop").unwrap());
        assert!(table_exists(&conn, "destination").unwrap());

        let rows = load_destinations(&conn).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            DestinationRow {
                destination: "0.0.0.0/0".to_string(),
                preference: 5,
                metric: 0,
                next_hop: "10.0.0.1".to_string(),
                interface: "eth0".to_string(),
                age: 694800,
            }
        );
        assert_eq!(rows[1].destination, "10.1.0.0/16");
        assert_eq!(rows[1].age, 2 * 86400 + 10);
    }

    #[test]
    fn test_next_hop_table_rows() {
        let mut conn = open_in_memory().unwrap();
        save(&mut conn, &sample_table()).unwrap();

        let mut stmt = conn.prepare("SELECT address FROM next_hop").unwrap();
        let addresses: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(addresses, vec!["10.0.0.2", "10.0.0.1"]);
    }

    #[test]
    fn test_save_twice_keeps_existing_tables() {
        let mut conn = open_in_memory().unwrap();
        save(&mut conn, &sample_table()).unwrap();
        save(&mut conn, &sample_table()).unwrap();

        assert_eq!(load_destinations(&conn).unwrap().len(), 3);
    }

    #[test]
    fn test_bad_age_rolls_back() {
        let table = build_table([
            "10.1.0.0/16 *[OSPF/10] 1:2, metric 20",
            "    > to 10.0.0.2 via eth1",
        ])
        .unwrap();

        let mut conn = open_in_memory().unwrap();
        let err = save(&mut conn, &table).unwrap_err();

        assert!(matches!(err, AppError::Format(_)));
        assert!(!table_exists(&conn, "next_hop").unwrap());
        assert!(!table_exists(&conn, "destination").unwrap());
    }

    #[test]
    fn test_empty_age_is_rejected() {
        let table = build_table([
            "10.0.0.0/8 *[Static/5] metric 10",
            "    > to 10.0.0.1 via eth0",
        ])
        .unwrap();

        let mut conn = open_in_memory().unwrap();
        let err = save(&mut conn, &table).unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.db");

        {
            let mut conn = open(&path).unwrap();
            save(&mut conn, &sample_table()).unwrap();
        }

        let conn = open(&path).unwrap();
        assert_eq!(load_destinations(&conn).unwrap().len(), 3);
    }
}
