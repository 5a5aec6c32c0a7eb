use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::PreflightError;

/// Validate that the total uncompressed size of a ZIP archive does not exceed a budget.
///
/// Sums `entry.size()` from the ZIP central directory (no decompression needed).
/// Returns `InputTooLarge` if the total exceeds the budget.
pub(crate) fn validate_zip_budget<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    budget: usize,
) -> Result<(), PreflightError> {
    let mut total: u64 = 0;
    for i in 0..archive.len() {
        if let Ok(entry) = archive.by_index_raw(i) {
            total = total.saturating_add(entry.size());
        }
    }
    if total > budget as u64 {
        return Err(PreflightError::InputTooLarge {
            size: usize::try_from(total).unwrap_or(usize::MAX),
            limit: budget,
        });
    }
    Ok(())
}

/// Extract a ZIP archive into `dest`, returning the number of files written.
///
/// The declared uncompressed size is checked against `budget` before anything
/// is written, and the bytes actually inflated are capped by the same budget
/// since the declared sizes can lie. Entries whose names would land outside
/// `dest` abort extraction.
pub fn extract_archive(data: &[u8], dest: &Path, budget: usize) -> Result<usize, PreflightError> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    validate_zip_budget(&mut archive, budget)?;

    let limit = budget as u64;
    let mut total: u64 = 0;
    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(PreflightError::UnsafeArchivePath {
                name: entry.name().to_string(),
            });
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        let allowance = limit - total;
        total += std::io::copy(&mut (&mut entry).take(allowance + 1), &mut out)?;
        if total > limit {
            drop(out);
            let _ = fs::remove_file(&target);
            tracing::warn!(entry = %entry.name(), "archive inflates past its declared size");
            return Err(PreflightError::InputTooLarge {
                size: usize::try_from(total).unwrap_or(usize::MAX),
                limit: budget,
            });
        }
        written += 1;
    }

    tracing::debug!(dest = %dest.display(), files = written, "extracted archive");
    Ok(written)
}
