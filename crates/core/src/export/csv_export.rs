use std::io::Write;
use std::path::Path;

use log::info;

use crate::cap_table::CapTable;
use crate::errors::{Error, Result};

/// Writes a `Holder,Percentage` sheet, percentages rounded to `precision`.
pub fn write_cap_table_csv<W: Write>(table: &CapTable, precision: u32, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Holder", "Percentage"])?;
    for (holder, percentage) in table.display_rows(precision) {
        csv_writer.write_record([holder, format!("{:.*}", precision as usize, percentage)])?;
    }
    csv_writer
        .flush()
        .map_err(|e| Error::Export(e.to_string()))?;
    Ok(())
}

/// Writes the cap table to a CSV file at `path`, replacing any existing file.
pub fn export_cap_table_csv(table: &CapTable, precision: u32, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| {
        Error::Export(format!("cannot create {}: {}", path.display(), e))
    })?;
    write_cap_table_csv(table, precision, file)?;
    info!("Cap table exported to {}", path.display());
    Ok(())
}
