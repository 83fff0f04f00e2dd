//! Tesseract CLI recognition backend.

use async_trait::async_trait;
use std::io::Cursor;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use droute_media::FrameImage;

use crate::error::{OcrError, OcrResult};
use crate::recognizer::{RecognitionAccuracy, RecognitionConfig, TextCandidate, TextRecognizer};

/// Text recognizer shelling out to the `tesseract` binary.
pub struct TesseractRecognizer {
    binary: PathBuf,
}

impl TesseractRecognizer {
    /// Create a recognizer, verifying the engine binary is installed.
    pub fn new() -> OcrResult<Self> {
        let binary = which::which("tesseract").map_err(|_| OcrError::EngineNotFound)?;
        Ok(Self { binary })
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(
        &self,
        image: &FrameImage,
        config: &RecognitionConfig,
    ) -> OcrResult<Vec<TextCandidate>> {
        let Some(rgba) = image.to_rgba() else {
            // Sentinel or torn frame: nothing to recognize.
            return Ok(Vec::new());
        };

        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .map_err(|e| OcrError::Encode(e.to_string()))?;

        let dir = tempfile::tempdir()?;
        let input_path = dir.path().join("crop.png");
        tokio::fs::write(&input_path, &png).await?;

        let mut args = vec![
            input_path.to_string_lossy().to_string(),
            "stdout".to_string(),
        ];
        args.extend(build_engine_args(config));
        debug!("Running tesseract {}", args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(OcrError::engine_failed(
                "tesseract exited with non-zero status",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        Ok(parse_tsv_candidates(&tsv))
    }
}

/// Map a recognition config to Tesseract arguments.
///
/// Fast mode assumes a single text line (the usual overlay layout);
/// accurate mode lets the engine segment a block.
fn build_engine_args(config: &RecognitionConfig) -> Vec<String> {
    let psm = match config.accuracy {
        RecognitionAccuracy::Fast => "7",
        RecognitionAccuracy::Accurate => "6",
    };

    vec![
        "-l".to_string(),
        config.language.clone(),
        "--oem".to_string(),
        "1".to_string(),
        "--psm".to_string(),
        psm.to_string(),
        "tsv".to_string(),
    ]
}

/// Parse Tesseract TSV output into ranked candidates.
///
/// Word rows (level 5) are grouped into lines; each line becomes a
/// candidate with the mean word confidence, ranked best-first. When more
/// than one line was read, the full text is appended as a last candidate so
/// overlays that wrap across lines can still be matched as a whole.
fn parse_tsv_candidates(tsv: &str) -> Vec<TextCandidate> {
    // (block, paragraph, line) -> (words, confidences)
    let mut lines: Vec<((u32, u32, u32), Vec<String>, Vec<f32>)> = Vec::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }

        let word = cols[11].trim();
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        if word.is_empty() || conf < 0.0 {
            continue;
        }

        let key = (
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );

        match lines.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, words, confs)) => {
                words.push(word.to_string());
                confs.push(conf);
            }
            None => lines.push((key, vec![word.to_string()], vec![conf])),
        }
    }

    let mut candidates: Vec<TextCandidate> = lines
        .iter()
        .map(|(_, words, confs)| TextCandidate {
            text: words.join(" "),
            confidence: confs.iter().sum::<f32>() / confs.len() as f32 / 100.0,
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if lines.len() > 1 {
        let all_words: Vec<String> = lines
            .iter()
            .flat_map(|(_, words, _)| words.iter().cloned())
            .collect();
        let all_confs: Vec<f32> = lines.iter().flat_map(|(_, _, confs)| confs.iter().copied()).collect();
        candidates.push(TextCandidate {
            text: all_words.join(" "),
            confidence: all_confs.iter().sum::<f32>() / all_confs.len() as f32 / 100.0,
        });
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV_HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn test_engine_args_accuracy_mapping() {
        let fast = build_engine_args(&RecognitionConfig {
            language: "eng".to_string(),
            accuracy: RecognitionAccuracy::Fast,
        });
        assert!(fast.windows(2).any(|w| w == ["--psm", "7"]));

        let accurate = build_engine_args(&RecognitionConfig::default());
        assert!(accurate.windows(2).any(|w| w == ["--psm", "6"]));
        assert!(accurate.windows(2).any(|w| w == ["-l", "eng"]));
    }

    #[test]
    fn test_tsv_single_line() {
        let tsv = format!(
            "{}\n5\t1\t1\t1\t1\t1\t0\t0\t40\t10\t96\t37.7749,\n5\t1\t1\t1\t1\t2\t45\t0\t40\t10\t90\t-122.4194",
            TSV_HEADER
        );

        let candidates = parse_tsv_candidates(&tsv);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "37.7749, -122.4194");
        assert!((candidates[0].confidence - 0.93).abs() < 0.001);
    }

    #[test]
    fn test_tsv_multiple_lines_ranked_with_full_text_fallback() {
        let tsv = format!(
            "{}\n5\t1\t1\t1\t1\t1\t0\t0\t40\t10\t60\tLat:\n5\t1\t1\t1\t1\t2\t45\t0\t40\t10\t60\t37.7749\n5\t1\t1\t1\t2\t1\t0\t12\t40\t10\t90\tLon:\n5\t1\t1\t1\t2\t2\t45\t12\t40\t10\t90\t-122.4194",
            TSV_HEADER
        );

        let candidates = parse_tsv_candidates(&tsv);
        assert_eq!(candidates.len(), 3);
        // Ranked best-first by line confidence
        assert_eq!(candidates[0].text, "Lon: -122.4194");
        assert_eq!(candidates[1].text, "Lat: 37.7749");
        // Whole text appended for cross-line overlays
        assert_eq!(candidates[2].text, "Lat: 37.7749 Lon: -122.4194");
    }

    #[test]
    fn test_tsv_skips_headers_and_low_levels() {
        let tsv = format!("{}\n1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t\n", TSV_HEADER);
        assert!(parse_tsv_candidates(&tsv).is_empty());
        assert!(parse_tsv_candidates("").is_empty());
    }
}
