//! Flat binary dataset files: packed little-endian u32 keys, no header or
//! length prefix. The key count is implied by the file size.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::keygen::Presort;

/// Canonical base name shared by a dataset and its derived artifacts,
/// e.g. `type-int_keynr-1024_presort-fullrev`.
pub fn data_file_base(key_nr: u64, presort: Presort) -> String {
    format!("type-int_keynr-{key_nr}_presort-{presort}")
}

/// Path of the `.dat` key file for the given parameters.
pub fn data_file_path(dir: &Path, key_nr: u64, presort: Presort) -> PathBuf {
    dir.join(format!("{}.dat", data_file_base(key_nr, presort)))
}

/// Write keys as packed little-endian u32 values.
pub fn write_keys(path: &Path, keys: &[u32]) -> Result<(), String> {
    let file =
        File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
    let mut out = BufWriter::new(file);

    for key in keys {
        out.write_all(&key.to_le_bytes())
            .map_err(|e| format!("write {}: {e}", path.display()))?;
    }

    out.flush()
        .map_err(|e| format!("write {}: {e}", path.display()))
}

/// Read a packed-u32 key file back into memory.
///
/// A file whose size is not a multiple of 4 is corrupt and rejected.
pub fn read_keys(path: &Path) -> Result<Vec<u32>, String> {
    let file = File::open(path).map_err(|e| format!("open {}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| format!("read {}: {e}", path.display()))?;

    if bytes.len() % 4 != 0 {
        return Err(format!(
            "{}: truncated key file ({} trailing bytes)",
            path.display(),
            bytes.len() % 4
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
