/*!
# Downloadable Artifact

Turns CSV text into the `(bytes, mime type, filename)` triple handed to the
download mechanism. The BOM prefix lets spreadsheet applications detect
UTF-8 instead of mangling non-ASCII names.
*/

/// UTF-8 byte-order-mark
pub const BOM: char = '\u{FEFF}';

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

pub const CSV_EXTENSION: &str = ".csv";

/// A finished export, ready to be written or downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

impl ExportArtifact {
    /// Build a BOM-prefixed artifact; `filename` is used as given
    pub fn new(csv: &str, filename: impl Into<String>) -> Self {
        let (bytes, mime_type) = build_downloadable_artifact(csv);
        Self {
            bytes,
            mime_type,
            filename: filename.into(),
        }
    }

    /// Build an artifact without the BOM prefix
    pub fn without_bom(csv: &str, filename: impl Into<String>) -> Self {
        Self {
            bytes: csv.as_bytes().to_vec(),
            mime_type: CSV_MIME_TYPE,
            filename: filename.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Prefix `csv` with the BOM and encode it as UTF-8
pub fn build_downloadable_artifact(csv: &str) -> (Vec<u8>, &'static str) {
    let mut bytes = Vec::with_capacity(csv.len() + BOM.len_utf8());
    let mut buf = [0u8; 4];
    bytes.extend_from_slice(BOM.encode_utf8(&mut buf).as_bytes());
    bytes.extend_from_slice(csv.as_bytes());
    (bytes, CSV_MIME_TYPE)
}

/// Append `.csv` unless `name` already ends with it.
///
/// The check is case-sensitive: `export.CSV` becomes `export.CSV.csv`.
pub fn normalize_filename(name: &str) -> String {
    if name.ends_with(CSV_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, CSV_EXTENSION)
    }
}
