//! Local file operations used while resolving a change

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::{Error, Result};

const COMPARE_CHUNK: usize = 64 * 1024;

/// Compare two files byte for byte.
///
/// Lengths are checked first; equal-length files are then streamed in
/// fixed-size chunks so large files are never held in memory twice.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    let len_a = fs::metadata(a).map_err(|e| Error::io(a, e))?.len();
    let len_b = fs::metadata(b).map_err(|e| Error::io(b, e))?.len();
    if len_a != len_b {
        return Ok(false);
    }

    let mut file_a = File::open(a).map_err(|e| Error::io(a, e))?;
    let mut file_b = File::open(b).map_err(|e| Error::io(b, e))?;
    let mut buf_a = vec![0u8; COMPARE_CHUNK];
    let mut buf_b = vec![0u8; COMPARE_CHUNK];

    loop {
        let read_a = read_full(&mut file_a, &mut buf_a).map_err(|e| Error::io(a, e))?;
        let read_b = read_full(&mut file_b, &mut buf_b).map_err(|e| Error::io(b, e))?;
        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }
        if read_a == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; returns bytes read (0 at EOF).
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Move `src` over `dest` in a single rename.
///
/// Both paths must be on the same filesystem (callers stage `src` next to
/// `dest`). If the rename fails, `dest` keeps its previous content.
pub fn replace_file(src: &Path, dest: &Path) -> Result<()> {
    fs::rename(src, dest).map_err(|e| Error::io(dest, e))
}

/// Delete a file, treating "already gone" as success.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Canonicalize a directory without Windows verbatim prefixes.
pub fn canonical_dir(path: &Path) -> Result<std::path::PathBuf> {
    dunce::canonicalize(path).map_err(|e| Error::io(path, e))
}
