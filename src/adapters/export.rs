use crate::core::table::Column;
use crate::domain::model::TrialRecord;
use crate::utils::error::Result;
use std::io::Write;
use std::path::Path;

/// 依欄位順序輸出 CSV，表頭用欄位標題
pub fn write_csv<W: Write>(writer: W, columns: &[Column], records: &[&TrialRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns.iter().map(|c| c.header.as_str()))?;

    for record in records {
        csv_writer.write_record(
            columns
                .iter()
                .map(|c| record.text(&c.key).unwrap_or_default()),
        )?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_csv_file<P: AsRef<Path>>(
    path: P,
    columns: &[Column],
    records: &[&TrialRecord],
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    write_csv(file, columns, records)?;
    tracing::info!("💾 Exported {} records to {}", records.len(), path.display());
    Ok(())
}
