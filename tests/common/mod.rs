#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Create a temporary project directory holding the given `(relative path, content)` files.
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        write_file(dir.path(), rel, content.as_bytes());
    }
    dir
}

pub fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Build an in-memory ZIP archive from `(entry name, content)` pairs.
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub const IEEE_PAPER: &str = r"\documentclass[journal,twocolumn]{IEEEtran}
\usepackage{graphicx}
\begin{document}
\title{Sparse Reconstruction}
\author{\IEEEauthorblockN{A. Author}}
\maketitle
\begin{IEEEkeywords}
sparsity, imaging
\end{IEEEkeywords}
\IEEEPARstart{T}{his} paper studies reconstruction.
\input{sections/method}
\begin{figure}
\includegraphics[width=\linewidth]{figs/pipeline}
\end{figure}
\bibliographystyle{IEEEtran}
\bibliography{refs}
\end{document}
";
