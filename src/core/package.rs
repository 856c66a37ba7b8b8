use anyhow::Result;
use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Files above this size are memory-mapped instead of read into a buffer.
const MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const COMMENTS_PART: &str = "word/comments.xml";

/// Raw bytes of a package, either owned or mapped from disk.
enum PackageBytes {
    Buffered(Vec<u8>),
    Mapped(Mmap),
}

impl AsRef<[u8]> for PackageBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            PackageBytes::Buffered(bytes) => bytes,
            PackageBytes::Mapped(mmap) => mmap,
        }
    }
}

fn load_bytes(path: &Path) -> Result<PackageBytes> {
    let file_size = std::fs::metadata(path)?.len();

    if file_size > MMAP_THRESHOLD {
        let file = File::open(path)?;
        // The mapping is read-only and dropped together with the archive.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(PackageBytes::Mapped(mmap))
    } else {
        Ok(PackageBytes::Buffered(std::fs::read(path)?))
    }
}

/// An opened Open XML package (a `.docx` zip archive).
///
/// The archive handle lives as long as this value; dropping it releases the
/// file or the mapping.
pub struct DocxPackage {
    archive: ZipArchive<Cursor<PackageBytes>>,
}

impl DocxPackage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = load_bytes(path.as_ref())?;
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| anyhow::anyhow!("not a valid Open XML package: {}", e))?;

        Ok(Self { archive })
    }

    /// Read a part as UTF-8 text. Returns `Ok(None)` when the archive has no
    /// entry with that name.
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(anyhow::anyhow!("failed to read {}: {}", name, e)),
        };

        // The declared size comes from the archive itself and is not trusted.
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        let xml = String::from_utf8(bytes)
            .map_err(|e| anyhow::anyhow!("{} is not valid UTF-8: {}", name, e))?;

        Ok(Some(match xml.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => xml,
        }))
    }

    /// Read a part that every valid document must contain.
    pub fn read_required_part(&mut self, name: &str) -> Result<String> {
        match self.read_part(name)? {
            Some(xml) => Ok(xml),
            None => anyhow::bail!("missing required part {}", name),
        }
    }
}
