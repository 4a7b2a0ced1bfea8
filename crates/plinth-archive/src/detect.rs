use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Zip,
    Tar,
    TarGz,
    /// Not an archive: installed as a single file.
    Raw,
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";

/// Sniff the container format from the file's leading bytes.
pub fn detect(path: &Path) -> Result<Format> {
    let mut head = [0u8; USTAR_OFFSET + 5];
    let mut file = File::open(path).map_err(|source| Error::Extract {
        path: path.to_path_buf(),
        source,
    })?;
    let mut filled = 0;
    loop {
        let n = file
            .read(&mut head[filled..])
            .map_err(|source| Error::Extract {
                path: path.to_path_buf(),
                source,
            })?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == head.len() {
            break;
        }
    }
    Ok(detect_bytes(&head[..filled]))
}

fn detect_bytes(head: &[u8]) -> Format {
    if head.starts_with(ZIP_MAGIC) {
        Format::Zip
    } else if head.starts_with(GZIP_MAGIC) {
        Format::TarGz
    } else if head.len() >= USTAR_OFFSET + USTAR_MAGIC.len()
        && &head[USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()] == USTAR_MAGIC
    {
        Format::Tar
    } else {
        Format::Raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_bytes() {
        assert_eq!(detect_bytes(b"PK\x03\x04rest"), Format::Zip);
        assert_eq!(detect_bytes(&[0x1f, 0x8b, 0x08]), Format::TarGz);
        assert_eq!(detect_bytes(b"#!/bin/sh\necho hi\n"), Format::Raw);
        assert_eq!(detect_bytes(b""), Format::Raw);

        let mut tar = vec![0u8; 512];
        tar[USTAR_OFFSET..USTAR_OFFSET + 5].copy_from_slice(USTAR_MAGIC);
        assert_eq!(detect_bytes(&tar), Format::Tar);
    }
}
