use rusqlite::Connection;
use strathouse_core::errors::ExError;
use strathouse_core::model::Part;
use strathouse_core::PartSink;

use super::SqliteRepo;

/// Scanner sink that inserts each part through `conn`
///
/// Hand it a connection inside an open transaction so that a scan's parts
/// commit or roll back together with the house record.
pub struct PartWriter<'a>(pub &'a Connection);

impl PartSink for PartWriter<'_> {
    fn register(&mut self, part: &Part) -> Result<(), ExError> {
        SqliteRepo::insert_part(self.0, part).map(|_| ())
    }
}
