use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};

use crate::warning::{PreflightWarning, WarningCode};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decode LaTeX source bytes into a `String`.
///
/// UTF-8 (with or without BOM) passes through silently. UTF-16 with a BOM and
/// anything that is not valid UTF-8 are decoded anyway, with a warning attached.
pub fn decode_text(data: &[u8]) -> (String, Option<PreflightWarning>) {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    if let Some(rest) = data.strip_prefix(UTF16_LE_BOM) {
        let (text, _) = UTF_16LE.decode_without_bom_handling(rest);
        return (text.into_owned(), Some(non_utf8_warning("UTF-16LE")));
    }
    if let Some(rest) = data.strip_prefix(UTF16_BE_BOM) {
        let (text, _) = UTF_16BE.decode_without_bom_handling(rest);
        return (text.into_owned(), Some(non_utf8_warning("UTF-16BE")));
    }

    match std::str::from_utf8(data) {
        Ok(text) => (text.to_string(), None),
        Err(_) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(data);
            (text.into_owned(), Some(non_utf8_warning("Windows-1252")))
        }
    }
}

fn non_utf8_warning(encoding: &str) -> PreflightWarning {
    PreflightWarning::new(
        WarningCode::NonUtf8Source,
        format!("source is not UTF-8; decoded as {encoding}"),
    )
}
