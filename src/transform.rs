use camino::Utf8Path;

use crate::domain::ChromosomeId;
use crate::error::ForgeError;
use crate::naming::{NamingMap, rename_header};
use crate::sequence::{SequenceRecord, write_records_gz};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOutcome {
    Written,
    Skipped,
}

/// Rewrite a chromosome's sequence headers into the alternate naming
/// convention and write the renamed copy. Idempotent on the output path:
/// an existing renamed copy is never rewritten, regardless of the force flag.
pub fn ensure_alternate_naming(
    id: &ChromosomeId,
    records: &[SequenceRecord],
    map: &NamingMap,
    output: &Utf8Path,
) -> Result<TransformOutcome, ForgeError> {
    if output.as_std_path().exists() {
        return Ok(TransformOutcome::Skipped);
    }
    let alternate = map.alternate(id)?;
    let renamed: Vec<SequenceRecord> = records
        .iter()
        .map(|record| {
            let header = rename_header(&record.header(), id.as_str(), alternate);
            SequenceRecord::from_header(&header, record.residues.clone())
        })
        .collect();
    write_records_gz(output, &renamed)?;
    Ok(TransformOutcome::Written)
}
