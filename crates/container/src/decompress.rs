//! Streaming gzip decompression into scoped temporary files.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use tempfile::TempPath;
use tgsrender_common::error::{TgsError, TgsResult};

/// A decompressed Lottie document living in a temporary `.json` file.
///
/// The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct DecompressedAnimation {
    source: PathBuf,
    path: TempPath,
    size_bytes: u64,
}

impl DecompressedAnimation {
    /// Path of the plain JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `.tgs` file this document came from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Size of the decompressed document in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Delete the temporary file now, reporting any error.
    pub fn close(self) -> TgsResult<()> {
        self.path.close()?;
        Ok(())
    }
}

/// Decompress `input` into a new temporary file in the system temp directory.
pub fn decompress(input: &Path) -> TgsResult<DecompressedAnimation> {
    decompress_in(input, &std::env::temp_dir())
}

/// Decompress `input` into a new temporary file inside `dir`.
///
/// Returns only after the output has been flushed and synced to disk. A valid
/// archive with an empty payload yields an empty document.
pub fn decompress_in(input: &Path, dir: &Path) -> TgsResult<DecompressedAnimation> {
    let file = File::open(input).map_err(|e| TgsError::from_io_at(e, input))?;
    let mut decoder = MultiGzDecoder::new(BufReader::new(file));

    let temp = tempfile::Builder::new()
        .prefix("tgsrender-")
        .suffix(".json")
        .tempfile_in(dir)?;
    let mut writer = BufWriter::new(temp);

    let size_bytes =
        std::io::copy(&mut decoder, &mut writer).map_err(|e| classify_stream_error(e, input))?;
    writer.flush()?;
    let temp = writer
        .into_inner()
        .map_err(|e| TgsError::Io(e.into_error()))?;
    temp.as_file().sync_all()?;

    tracing::debug!(
        input = %input.display(),
        output = %temp.path().display(),
        size_bytes,
        "Decompressed sticker"
    );

    Ok(DecompressedAnimation {
        source: input.to_path_buf(),
        path: temp.into_temp_path(),
        size_bytes,
    })
}

/// Corrupt or truncated gzip data surfaces from flate2 as these kinds.
fn classify_stream_error(err: std::io::Error, input: &Path) -> TgsError {
    match err.kind() {
        ErrorKind::InvalidInput | ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
            TgsError::decompress(format!("{}: {err}", input.display()))
        }
        _ => TgsError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_stream_error() {
        let input = Path::new("x.tgs");
        let corrupt = std::io::Error::new(ErrorKind::InvalidInput, "invalid gzip header");
        assert!(matches!(
            classify_stream_error(corrupt, input),
            TgsError::Decompress { .. }
        ));

        let truncated = std::io::Error::new(ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(
            classify_stream_error(truncated, input),
            TgsError::Decompress { .. }
        ));

        let disk = std::io::Error::other("disk full");
        assert!(matches!(
            classify_stream_error(disk, input),
            TgsError::Io(_)
        ));
    }
}
