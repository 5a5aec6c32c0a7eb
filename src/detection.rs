use std::path::Path;

/// Magic bytes of a ZIP local file header.
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// What kind of project input a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A ZIP archive holding a whole project.
    Archive,
    /// A single LaTeX source file.
    Document,
}

/// Detect the input kind from a file path and optional header bytes.
///
/// Priority: magic bytes → file extension.
pub fn detect_input(path: &Path, header_bytes: &[u8]) -> Option<InputKind> {
    if header_bytes.starts_with(ZIP_MAGIC) {
        return Some(InputKind::Archive);
    }
    detect_by_extension(path)
}

fn detect_by_extension(path: &Path) -> Option<InputKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "zip" => Some(InputKind::Archive),
        "tex" | "ltx" | "latex" => Some(InputKind::Document),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_tex_by_extension() {
        let path = PathBuf::from("paper.tex");
        assert_eq!(detect_input(&path, &[]), Some(InputKind::Document));
    }

    #[test]
    fn test_detect_tex_variants() {
        for ext in &["tex", "TEX", "ltx", "latex"] {
            let path = PathBuf::from(format!("file.{}", ext));
            assert_eq!(
                detect_input(&path, &[]),
                Some(InputKind::Document),
                "expected Document for .{}",
                ext
            );
        }
    }

    #[test]
    fn test_detect_zip_by_extension() {
        let path = PathBuf::from("project.zip");
        assert_eq!(detect_input(&path, &[]), Some(InputKind::Archive));
    }

    #[test]
    fn test_detect_zip_magic_bytes_override_extension() {
        let path = PathBuf::from("upload.tex");
        let zip_header = [0x50, 0x4B, 0x03, 0x04];
        assert_eq!(detect_input(&path, &zip_header), Some(InputKind::Archive));
    }

    #[test]
    fn test_detect_unknown_returns_none() {
        assert_eq!(detect_input(&PathBuf::from("figure.png"), &[]), None);
        assert_eq!(detect_input(&PathBuf::from("Makefile"), &[]), None);
    }
}
