//! Turn CWR file bytes into record lines, with encoding auto-detection.
//!
//! No record logic here: the output is the list of lines handed to the
//! validator and the assembler.

use std::path::Path;

use crate::config::ValidatorConfig;
use crate::error::{InputError, InputResult};

/// Decoded input with metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInput {
    /// One entry per record line, terminators removed.
    pub lines: Vec<String>,
    /// Detected or used encoding.
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "iso-8859-15" | "latin-9" | "latin9" => "iso-8859-15".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes with the given encoding.
///
/// Latin-1 is decoded as Windows-1252, which agrees with it on every
/// printable character. Other labels are looked up in `encoding_rs`.
pub fn decode_content(bytes: &[u8], encoding: &str) -> InputResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .map_err(|_| InputError::Encoding(encoding.to_string())),
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
        }
        "iso-8859-15" | "latin-9" | "latin9" => Ok(encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()),
        label => {
            let codec = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| InputError::Encoding(encoding.to_string()))?;
            let (decoded, _, had_errors) = codec.decode(bytes);
            if had_errors {
                return Err(InputError::Encoding(encoding.to_string()));
            }
            Ok(decoded.into_owned())
        }
    }
}

/// Split content into record lines.
///
/// Strips a leading BOM and `\r\n` / `\n` terminators. Blank lines at the
/// end of the file are dropped; blank lines inside it are kept so the
/// validator can report them.
pub fn split_lines(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Decode bytes and split them into lines.
///
/// Valid UTF-8 is taken as UTF-8; anything else goes through chardet.
pub fn read_bytes_auto(bytes: &[u8]) -> InputResult<DecodedInput> {
    let (content, encoding) = match std::str::from_utf8(bytes) {
        Ok(content) => (content.to_string(), "utf-8".to_string()),
        Err(_) => {
            let detected = detect_encoding(bytes);
            match decode_content(bytes, &detected) {
                Ok(content) => (content, detected),
                // Misdetected or unsupported charsets are most often Windows-1252.
                Err(_) => {
                    let encoding = "windows-1252".to_string();
                    (decode_content(bytes, &encoding)?, encoding)
                }
            }
        }
    };

    let lines = split_lines(&content);
    if lines.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(DecodedInput { lines, encoding })
}

/// Read a CWR file, checking its extension against the configuration.
pub fn read_file_auto<P: AsRef<Path>>(path: P, config: &ValidatorConfig) -> InputResult<DecodedInput> {
    let path = path.as_ref();
    if !config.allows_path(path) {
        return Err(InputError::UnsupportedExtension {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
            allowed: config.allowed_extensions.join(", "),
        });
    }

    let bytes = std::fs::read(path)?;
    read_bytes_auto(&bytes)
}
