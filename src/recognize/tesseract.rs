//! Tesseract-backed text recognizer.
//!
//! Thin wrapper around the `tesseract` command-line binary: the cropped
//! frame is PNG-encoded and piped over stdin, and word-level boxes come back
//! as TSV on stdout.  Sparse-text page segmentation (`--psm 11`) suits a
//! ring of separated letter tiles, and a letters-only whitelist keeps
//! digits and punctuation out of the results.
//!
//! [`TesseractRecognizer::probe`] checks binary availability once at
//! startup so a missing install surfaces as a log line and a stubbed-out
//! recognizer instead of a failure on the first solve.

use std::io::Cursor;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::capture::Frame;

use super::{RecognizeError, RectF, TextDetection, TextRecognizer};

// ---------------------------------------------------------------------------
// TesseractRecognizer
// ---------------------------------------------------------------------------

/// Production recognizer shelling out to the `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: String,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractRecognizer {
    /// Use `binary` as the tesseract executable (name on `PATH` or full
    /// path).
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Check that the tesseract binary can be executed.
    ///
    /// # Errors
    ///
    /// [`RecognizeError::EngineMissing`] when the binary cannot be spawned
    /// or exits unsuccessfully on `--version`.
    pub fn probe(&self) -> Result<(), RecognizeError> {
        let status = std::process::Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| RecognizeError::EngineMissing(format!("{}: {e}", self.binary)))?;

        if status.success() {
            Ok(())
        } else {
            Err(RecognizeError::EngineMissing(format!(
                "{} --version exited with {status}",
                self.binary
            )))
        }
    }

    fn encode_png(frame: &Frame) -> Result<Vec<u8>, RecognizeError> {
        let mut png = Vec::new();
        frame
            .image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| RecognizeError::Encode(e.to_string()))?;
        Ok(png)
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, frame: &Frame) -> Result<Vec<TextDetection>, RecognizeError> {
        let png = Self::encode_png(frame)?;

        let mut child = Command::new(&self.binary)
            .args([
                "stdin",
                "stdout",
                "--psm",
                "11",
                "-c",
                "tessedit_char_whitelist=ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz",
                "tsv",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RecognizeError::EngineMissing(format!("{}: {e}", self.binary)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RecognizeError::Failed("tesseract stdin not piped".into()))?;
        stdin
            .write_all(&png)
            .await
            .map_err(|e| RecognizeError::Failed(format!("writing frame to tesseract: {e}")))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| RecognizeError::Failed(e.to_string()))?;

        if !output.status.success() {
            return Err(RecognizeError::Failed(format!(
                "tesseract exited with {}",
                output.status
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        Ok(parse_tsv(&tsv))
    }
}

// ---------------------------------------------------------------------------
// parse_tsv
// ---------------------------------------------------------------------------

/// Parse tesseract TSV output into detections.
///
/// Keeps word-level rows (level 5) with a real confidence and non-blank
/// text; structural rows (page/block/paragraph/line) and malformed lines
/// are skipped without failing the whole parse.
pub(crate) fn parse_tsv(tsv: &str) -> Vec<TextDetection> {
    let mut detections = Vec::new();

    // Header: level page_num block_num par_num line_num word_num
    //         left top width height conf text
    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }
        if fields[0] != "5" {
            continue;
        }

        let conf: f32 = match fields[10].parse() {
            Ok(c) => c,
            Err(_) => continue,
        };
        if conf < 0.0 {
            continue;
        }

        let (Ok(left), Ok(top), Ok(width), Ok(height)) = (
            fields[6].parse::<f32>(),
            fields[7].parse::<f32>(),
            fields[8].parse::<f32>(),
            fields[9].parse::<f32>(),
        ) else {
            continue;
        };

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        detections.push(TextDetection {
            text: text.to_string(),
            bounds: RectF {
                left,
                top,
                width,
                height,
            },
        });
    }

    detections
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn parses_word_rows_into_detections() {
        let tsv = format!(
            "{HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t600\t600\t-1\t\n\
             5\t1\t1\t1\t1\t1\t100\t120\t40\t48\t96.5\tC\n\
             5\t1\t1\t1\t1\t2\t200\t118\t38\t50\t91.0\tR\n"
        );
        let dets = parse_tsv(&tsv);

        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].text, "C");
        assert_eq!(
            dets[0].bounds,
            RectF {
                left: 100.0,
                top: 120.0,
                width: 40.0,
                height: 48.0,
            }
        );
        assert_eq!(dets[1].text, "R");
    }

    #[test]
    fn skips_structural_and_no_confidence_rows() {
        let tsv = format!(
            "{HEADER}\n\
             2\t1\t1\t0\t0\t0\t0\t0\t300\t300\t-1\t\n\
             4\t1\t1\t1\t1\t0\t0\t0\t300\t40\t-1\t\n\
             5\t1\t1\t1\t1\t1\t10\t10\t20\t20\t-1\tA\n"
        );
        assert!(parse_tsv(&tsv).is_empty());
    }

    #[test]
    fn skips_blank_text_and_malformed_lines() {
        let tsv = format!(
            "{HEADER}\n\
             5\t1\t1\t1\t1\t1\t10\t10\t20\t20\t80.0\t \n\
             not a tsv row\n\
             5\t1\t1\t1\t1\t2\tNaNish\t10\t20\t20\t80.0\tB\n\
             5\t1\t1\t1\t1\t3\t30\t10\t20\t20\t80.0\tZ\n"
        );
        let dets = parse_tsv(&tsv);
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].text, "Z");
    }

    #[test]
    fn empty_output_parses_to_no_detections() {
        assert!(parse_tsv("").is_empty());
        assert!(parse_tsv(HEADER).is_empty());
    }
}
