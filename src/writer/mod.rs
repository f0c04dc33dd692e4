pub mod delimited;
pub mod schema_gen;
pub mod sqlite;

pub use delimited::*;
pub use sqlite::{write_sqlite, SqliteWriter};
