use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::accumulator::Estimate;
use crate::error::EstimateError;

/// Decimal places of every value in the list layout.
pub const LIST_DECIMALS: usize = 34;

/// How a matrix estimate is written.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// One value per line, row-major, fixed 34 decimals
    #[default]
    List,
    /// Labeled square TSV with `T2..Tn` row and column names
    Table,
}

fn is_gz(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".gz")
}

/// Read an ms output file and return its tree lines.
/// If `path` ends with `.gz`, the input is decompressed on the fly.
pub fn read_ms_trees<P: AsRef<Path>>(path: P) -> Result<Vec<String>, EstimateError> {
    let p = path.as_ref();
    let file = File::open(p)?;

    let mut content = String::new();
    if is_gz(p) {
        GzDecoder::new(file).read_to_string(&mut content)?;
    } else {
        BufReader::new(file).read_to_string(&mut content)?;
    }

    let trees = ms_tree_lines(&content);
    log::debug!("Read {} tree lines from {}", trees.len(), p.display());
    Ok(trees)
}

/// Tree lines of ms output held in memory.
///
/// Everything up to and including the first `//` line is header. Every later
/// line that is neither empty nor `//` is one tree, returned with all
/// whitespace removed.
pub fn ms_tree_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .skip_while(|line| line.trim_end() != "//")
        .map(|line| line.split_whitespace().collect::<String>())
        .filter(|line| !line.is_empty() && line != "//")
        .collect()
}

/// Open `path` for writing; `None` or `-` is stdout.
/// If `path` ends with `.gz`, the output is gzip-compressed.
pub fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        Some(p) if p.as_os_str() == "-" => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        Some(p) if is_gz(p) => {
            let enc = GzEncoder::new(File::create(p)?, Compression::default());
            Ok(Box::new(BufWriter::new(enc)))
        }
        Some(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
    }
}

/// Write an estimate in the requested layout.
///
/// A scalar is always written as `Estimated E(T_iT_j) = <value>`.
pub fn write_estimate<W: Write>(out: &mut W, estimate: &Estimate, layout: Layout) -> io::Result<()> {
    match (estimate, layout) {
        (Estimate::Scalar(value), _) => writeln!(out, "Estimated E(T_iT_j) = {value}")?,
        (Estimate::Matrix { values, .. }, Layout::List) => {
            for value in values {
                writeln!(out, "{}", format_fixed(*value, LIST_DECIMALS))?;
            }
        }
        (Estimate::Matrix { size, .. }, Layout::Table) => {
            let names: Vec<String> = (0..*size).map(|k| format!("T{}", k + 2)).collect();
            write_matrix_tsv(out, &names, &estimate.rows())?;
        }
    }
    out.flush()
}

/// Write an estimate to a file or stdout, see [`open_output`].
pub fn write_estimate_to(path: Option<&Path>, estimate: &Estimate, layout: Layout) -> io::Result<()> {
    let mut out = open_output(path)?;
    write_estimate(&mut out, estimate, layout)
}

/// Write a labeled square matrix as TSV.
pub fn write_matrix_tsv<W: Write, T: std::fmt::Display>(
    out: &mut W,
    names: &[String],
    mat: &[Vec<T>],
) -> io::Result<()> {
    // Header row
    for name in names {
        write!(out, "\t{}", name)?;
    }
    writeln!(out)?;

    // Rows
    for (name, row) in names.iter().zip(mat) {
        write!(out, "{}", name)?;
        for val in row {
            write!(out, "\t{}", val)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Shortest round-trip digits of `value`, zero-padded to `decimals` places.
///
/// Values needing more than `decimals` places are rounded instead.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let shortest = value.to_string();
    if !value.is_finite() {
        return shortest;
    }
    let frac_len = shortest.split_once('.').map_or(0, |(_, frac)| frac.len());
    if frac_len > decimals {
        return format!("{value:.decimals$}");
    }

    let mut fixed = shortest;
    if frac_len == 0 {
        fixed.push('.');
    }
    fixed.extend(std::iter::repeat_n('0', decimals - frac_len));
    fixed
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_OUTPUT: &str = "ms 3 2 -T\n12345 67890\n\n//\n((1:0.5,2:0.5):1.0,3:1.5);\n\n//\n((1:0.25,3:0.25):0.5, 2:0.75);\n";

    #[test]
    fn test_header_is_skipped() {
        assert_eq!(
            ms_tree_lines(MS_OUTPUT),
            vec![
                "((1:0.5,2:0.5):1.0,3:1.5);".to_string(),
                "((1:0.25,3:0.25):0.5,2:0.75);".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_separator_means_no_trees() {
        assert!(ms_tree_lines("ms 3 2 -T\n((1:1,2:1):1,3:2);\n").is_empty());
    }

    #[test]
    fn test_crlf_separator() {
        assert_eq!(ms_tree_lines("header\r\n//\r\n(1:1,2:1);\r\n").len(), 1);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(0.1, 34), "0.1000000000000000000000000000000000");
        assert_eq!(format_fixed(2.0, 4), "2.0000");
        assert_eq!(format_fixed(1.26, 1), "1.3");
        assert_eq!(format_fixed(1e-40, 34), format!("{:.34}", 1e-40));
    }

    #[test]
    fn test_write_scalar() {
        let mut out = Vec::new();
        write_estimate(&mut out, &Estimate::Scalar(1.5), Layout::List).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Estimated E(T_iT_j) = 1.5\n");
    }

    #[test]
    fn test_write_matrix_list() {
        let estimate = Estimate::Matrix { size: 2, values: vec![1.0, 0.5, 0.5, 4.0] };
        let mut out = Vec::new();
        write_estimate(&mut out, &estimate, Layout::List).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "0.5000000000000000000000000000000000");
        assert!(lines.iter().all(|l| l.split_once('.').unwrap().1.len() == LIST_DECIMALS));
    }

    #[test]
    fn test_write_matrix_table() {
        let estimate = Estimate::Matrix { size: 2, values: vec![1.0, 0.5, 0.5, 4.0] };
        let mut out = Vec::new();
        write_estimate(&mut out, &estimate, Layout::Table).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\tT2\tT3\nT2\t1\t0.5\nT3\t0.5\t4\n"
        );
    }
}
