//! SQLite repository implementation
//!
//! Every function takes a `&Connection`; pass a `Transaction` (it derefs to
//! one) to group several writes into one atomic unit.

use crate::errors::{from_rusqlite, house_insert_error, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::PathBuf;
use strathouse_core::model::{Category, ConfigEntry, House, HouseType, Part};

const HOUSE_COLUMNS: &str = "id, name, house_type, local_path, url, branch";
const PART_COLUMNS: &str = "id, house_name, category, name, author, version, doc, module_locator";

/// SQLite repository for config entries, houses and parts
pub struct SqliteRepo;

impl SqliteRepo {
    // ========== Config ==========

    /// Insert or replace a config value
    pub fn upsert_config(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO house_config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_config(conn: &Connection, key: &str) -> Result<Option<ConfigEntry>> {
        conn.query_row(
            "SELECT key, value FROM house_config WHERE key = ?",
            [key],
            |row| Ok(ConfigEntry::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()
        .map_err(from_rusqlite)
    }

    // ========== Houses ==========

    /// Insert a house record and return its row id
    ///
    /// # Errors
    ///
    /// `DuplicateName` if a house with the same name exists.
    pub fn insert_house(conn: &Connection, house: &House) -> Result<i64> {
        conn.execute(
            "INSERT INTO houses (name, house_type, local_path, url, branch)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                house.name,
                house.house_type.as_str(),
                house.local_path.to_string_lossy().into_owned(),
                house.url,
                house.branch,
            ],
        )
        .map_err(|e| house_insert_error(e, &house.name))?;

        Ok(conn.last_insert_rowid())
    }

    pub fn find_house_by_name(conn: &Connection, name: &str) -> Result<Option<House>> {
        conn.query_row(
            &format!("SELECT {} FROM houses WHERE name = ?", HOUSE_COLUMNS),
            [name],
            house_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// First house registered for this url and branch, if any
    pub fn find_house_by_url_branch(
        conn: &Connection,
        url: &str,
        branch: &str,
    ) -> Result<Option<House>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM houses WHERE url = ?1 AND branch = ?2 ORDER BY id LIMIT 1",
                HOUSE_COLUMNS
            ),
            [url, branch],
            house_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// All houses in registration order
    pub fn list_houses(conn: &Connection) -> Result<Vec<House>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM houses ORDER BY id", HOUSE_COLUMNS))
            .map_err(from_rusqlite)?;

        let houses = stmt
            .query_map([], house_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(houses)
    }

    /// Delete a house record; returns the number of rows removed (0 or 1)
    pub fn delete_house(conn: &Connection, name: &str) -> Result<usize> {
        conn.execute("DELETE FROM houses WHERE name = ?", [name])
            .map_err(from_rusqlite)
    }

    // ========== Parts ==========

    /// Insert a part record and return its row id
    pub fn insert_part(conn: &Connection, part: &Part) -> Result<i64> {
        conn.execute(
            "INSERT INTO parts (house_name, category, name, author, version, doc, module_locator)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                part.house_name,
                part.category.as_str(),
                part.name,
                part.author,
                part.version,
                part.doc,
                part.module_locator,
            ],
        )
        .map_err(|e| from_rusqlite(e).with_entity(part.name.clone()))?;

        Ok(conn.last_insert_rowid())
    }

    /// Delete every part owned by a house; deleting nothing is not an error
    pub fn delete_parts_by_house(conn: &Connection, house_name: &str) -> Result<usize> {
        conn.execute("DELETE FROM parts WHERE house_name = ?", [house_name])
            .map_err(from_rusqlite)
    }

    pub fn find_part_by_name(conn: &Connection, name: &str) -> Result<Option<Part>> {
        conn.query_row(
            &format!("SELECT {} FROM parts WHERE name = ?", PART_COLUMNS),
            [name],
            part_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Part names in registration order, filtered by house and/or category
    ///
    /// Both filters apply together when given.
    pub fn list_part_names(
        conn: &Connection,
        house: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<String>> {
        let mut stmt = conn
            .prepare(
                "SELECT name FROM parts
                 WHERE (?1 IS NULL OR house_name = ?1)
                   AND (?2 IS NULL OR category = ?2)
                 ORDER BY id",
            )
            .map_err(from_rusqlite)?;

        let names = stmt
            .query_map(
                rusqlite::params![house, category.map(|c| c.as_str())],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(from_rusqlite)?;

        Ok(names)
    }
}

fn house_from_row(row: &Row<'_>) -> rusqlite::Result<House> {
    let house_type: String = row.get(2)?;
    let house_type: HouseType = house_type
        .parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;
    let local_path: String = row.get(3)?;

    Ok(House {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        house_type,
        local_path: PathBuf::from(local_path),
        url: row.get(4)?,
        branch: row.get(5)?,
    })
}

fn part_from_row(row: &Row<'_>) -> rusqlite::Result<Part> {
    let category: String = row.get(2)?;
    let category: Category = category
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Part {
        id: Some(row.get(0)?),
        house_name: row.get(1)?,
        category,
        name: row.get(3)?,
        author: row.get(4)?,
        version: row.get(5)?,
        doc: row.get(6)?,
        module_locator: row.get(7)?,
    })
}
