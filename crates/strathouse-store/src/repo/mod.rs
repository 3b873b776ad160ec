//! Repository layer persisting houses, parts and config entries to SQLite

pub mod part_writer;
pub mod sqlite_repo;

pub use part_writer::PartWriter;
pub use sqlite_repo::SqliteRepo;
