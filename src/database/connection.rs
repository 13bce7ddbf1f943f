use crate::error::Result;
use log::debug;
use rusqlite::Connection;

// Embed migrations from the migrations directory
refinery::embed_migrations!("migrations");

/// Initializes the database connection and runs migrations
pub fn init_connection(db_path: &str) -> Result<Connection> {
    let mut conn = Connection::open(db_path)?;

    let report = migrations::runner().run(&mut conn)?;
    debug!(
        "Migrations completed successfully ({} applied) for {}",
        report.applied_migrations().len(),
        db_path
    );

    Ok(conn)
}
