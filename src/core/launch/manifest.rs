// ─── JAR Manifest ───
// Reads and writes the main section of `META-INF/MANIFEST.MF`.

use std::io::Read;
use std::path::Path;

use crate::core::error::{LauncherError, LauncherResult};

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
pub const MANIFEST_VERSION: &str = "Manifest-Version";
pub const CLASS_PATH: &str = "Class-Path";
pub const MAIN_CLASS: &str = "Main-Class";

/// Manifest lines may not exceed 72 bytes, excluding the line break.
const MAX_LINE_BYTES: usize = 72;

/// Main-section attributes in insertion order. Names compare
/// case-insensitively, as the JAR format specifies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the main section. Continuation lines (leading space) are joined;
    /// parsing stops at the first blank line.
    pub fn parse(text: &str) -> Self {
        let mut manifest = Manifest::new();
        let mut current: Option<(String, String)> = None;

        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(continuation);
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                manifest.insert(&name, value);
            }

            if line.is_empty() {
                break;
            }

            if let Some((name, value)) = line.split_once(':') {
                let value = value.strip_prefix(' ').unwrap_or(value);
                current = Some((name.to_string(), value.to_string()));
            }
        }

        if let Some((name, value)) = current {
            manifest.insert(&name, value);
        }
        manifest
    }

    /// Serialize with CRLF line endings and 72-byte line wrapping.
    /// `Manifest-Version` is always written first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(version) = self.get(MANIFEST_VERSION) {
            write_attribute(&mut out, MANIFEST_VERSION, version);
        }
        for (name, value) in &self.attributes {
            if !name.eq_ignore_ascii_case(MANIFEST_VERSION) {
                write_attribute(&mut out, name, value);
            }
        }
        out.extend_from_slice(b"\r\n");
        out
    }

    /// Read the manifest of a JAR. `Ok(None)` when the archive has none.
    pub fn read_from_jar(path: &Path) -> LauncherResult<Option<Self>> {
        let file = std::fs::File::open(path).map_err(|e| LauncherError::io(path, e))?;
        let mut archive = zip::ZipArchive::new(file)?;

        let entry_name = match archive
            .file_names()
            .find(|name| name.eq_ignore_ascii_case(MANIFEST_PATH))
        {
            Some(name) => name.to_string(),
            None => return Ok(None),
        };

        let mut entry = archive.by_name(&entry_name)?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| LauncherError::io(path, e))?;

        Ok(Some(Manifest::parse(&String::from_utf8_lossy(&bytes))))
    }
}

fn write_attribute(out: &mut Vec<u8>, name: &str, value: &str) {
    let line = format!("{}: {}", name, value);
    let mut rest = line.as_str();
    let mut limit = MAX_LINE_BYTES;

    while rest.len() > limit {
        let mut split = limit;
        while !rest.is_char_boundary(split) {
            split -= 1;
        }
        out.extend_from_slice(rest[..split].as_bytes());
        out.extend_from_slice(b"\r\n ");
        rest = &rest[split..];
        // Continuation lines spend one byte on the leading space.
        limit = MAX_LINE_BYTES - 1;
    }
    out.extend_from_slice(rest.as_bytes());
    out.extend_from_slice(b"\r\n");
}
