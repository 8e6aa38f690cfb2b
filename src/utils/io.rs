use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a text input, decompressing gzip/bgzip transparently
///
/// # Errors
///
/// Returns an IO error if the file cannot be opened.
pub fn open_input(path: &Path) -> std::io::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Create (or truncate) an output file behind a buffered writer
///
/// # Errors
///
/// Returns an IO error if the file cannot be created.
pub fn create_output(path: &Path) -> std::io::Result<BufWriter<File>> {
    File::create(path).map(BufWriter::new)
}

/// `prefix` with `suffix` appended to its file name, e.g. `out/run` + `.sizes.tsv`
pub fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("out/run1"), ".sizes.tsv"),
            PathBuf::from("out/run1.sizes.tsv")
        );
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("reads.GAF.GZ")));
        assert!(is_gzipped(Path::new("graph.gfa.bgz")));
        assert!(!is_gzipped(Path::new("graph.gfa")));
    }

    #[test]
    fn test_open_gzipped_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&path).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(b"first\nsecond\n").unwrap();
        encoder.finish().unwrap();

        let mut content = String::new();
        open_input(&path).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
