// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract backend: runs the `tesseract` program and reads its TSV output.
//
// The image is written to a temporary file and recognised with
//
//   tesseract <image> stdout -l <lang> tsv
//
// TSV gives one row per layout element. Word rows (level 5) carry the text and
// a per-word confidence; the page text is rebuilt from them and the page
// confidence is the mean word confidence, matching what Tesseract reports for
// the page as a whole.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use ocrdesk_core::error::{OcrdeskError, Result};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::{EngineLog, EngineLogger, Recognition, RecognitionEngine};

/// TSV `level` value for word rows.
const WORD_LEVEL: &str = "5";

/// Number of columns in a Tesseract TSV row.
const TSV_COLUMNS: usize = 12;

/// OCR engine backed by the `tesseract` command-line program.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
}

impl TesseractEngine {
    /// Use `command` (a program name on `PATH` or an absolute path).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The program this engine invokes.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run `tesseract --version` and return its first line.
    ///
    /// # Errors
    ///
    /// Returns [`OcrdeskError::EngineUnavailable`] if the program cannot be
    /// started or exits unsuccessfully.
    pub async fn version(&self) -> Result<String> {
        let output = Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| {
                OcrdeskError::EngineUnavailable(format!("cannot run {}: {err}", self.command))
            })?;
        if !output.status.success() {
            return Err(OcrdeskError::EngineUnavailable(format!(
                "{} --version exited with {}",
                self.command, output.status
            )));
        }
        // Older releases print the banner on stderr.
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_owned())
    }

    /// Language packs installed for this Tesseract (`--list-langs`).
    pub async fn installed_languages(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.command)
            .arg("--list-langs")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| {
                OcrdeskError::EngineUnavailable(format!("cannot run {}: {err}", self.command))
            })?;
        if !output.status.success() {
            return Err(OcrdeskError::EngineUnavailable(format!(
                "{} --list-langs exited with {}",
                self.command, output.status
            )));
        }
        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[async_trait]
impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    #[instrument(skip(self, image, logger), fields(command = %self.command, bytes = image.len()))]
    async fn recognize(
        &self,
        image: Arc<[u8]>,
        language: &str,
        logger: EngineLogger,
    ) -> Result<Recognition> {
        logger(EngineLog::new("loading tesseract core", 0.0));

        let input = tempfile::Builder::new()
            .prefix("ocrdesk-input-")
            .tempfile()?;
        tokio::fs::write(input.path(), &image[..]).await?;
        logger(EngineLog::new("loading tesseract core", 1.0));

        logger(EngineLog::new("recognizing text", 0.0));
        info!(language, "starting tesseract");

        let output = Command::new(&self.command)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("tsv")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    OcrdeskError::EngineUnavailable(format!("{} not found on PATH", self.command))
                } else {
                    OcrdeskError::EngineFailure(format!("failed to run {}: {err}", self.command))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "tesseract failed");
            return Err(OcrdeskError::EngineFailure(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let recognition = parse_tsv(&String::from_utf8_lossy(&output.stdout))?;
        logger(EngineLog::new("recognizing text", 1.0));

        debug!(
            chars = recognition.text.len(),
            confidence = recognition.confidence,
            "tesseract recognition complete"
        );
        Ok(recognition)
    }
}

/// Layout position of a word row: page, block, paragraph, line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineKey {
    page: u32,
    block: u32,
    paragraph: u32,
    line: u32,
}

/// Rebuild page text and mean word confidence from Tesseract TSV output.
///
/// Words on one line are joined with a space, lines with a newline, and
/// paragraphs or blocks are separated by a blank line. Rows that are not
/// words, or carry a negative confidence, are skipped. An image with no words
/// yields empty text and confidence 0.
///
/// # Errors
///
/// Returns [`OcrdeskError::EngineFailure`] if the output lacks the TSV header.
pub fn parse_tsv(tsv: &str) -> Result<Recognition> {
    let mut rows = tsv.lines();
    match rows.next() {
        Some(header) if header.starts_with("level\t") => {}
        _ => {
            return Err(OcrdeskError::EngineFailure(
                "tesseract output is missing the TSV header".into(),
            ));
        }
    }

    let mut text = String::new();
    let mut previous: Option<LineKey> = None;
    let mut confidence_sum = 0.0;
    let mut word_count = 0u32;

    for row in rows {
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < TSV_COLUMNS || fields[0] != WORD_LEVEL {
            continue;
        }
        let word = fields[11].trim();
        let Ok(confidence) = fields[10].trim().parse::<f64>() else {
            continue;
        };
        if word.is_empty() || confidence < 0.0 {
            continue;
        }
        let key = LineKey {
            page: fields[1].parse().unwrap_or(0),
            block: fields[2].parse().unwrap_or(0),
            paragraph: fields[3].parse().unwrap_or(0),
            line: fields[4].parse().unwrap_or(0),
        };

        match previous {
            None => {}
            Some(prev) if prev == key => text.push(' '),
            Some(prev)
                if prev.page != key.page
                    || prev.block != key.block
                    || prev.paragraph != key.paragraph =>
            {
                text.push_str("\n\n")
            }
            Some(_) => text.push('\n'),
        }
        text.push_str(word);
        previous = Some(key);

        confidence_sum += confidence;
        word_count += 1;
    }

    if !text.is_empty() {
        text.push('\n');
    }
    let confidence = if word_count == 0 {
        0.0
    } else {
        confidence_sum / f64::from(word_count)
    };

    Ok(Recognition { text, confidence })
}

/// Parse `tesseract --list-langs` output, dropping the banner line.
fn parse_language_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word(block: u32, par: u32, line: u32, n: u32, conf: &str, text: &str) -> String {
        format!("5\t1\t{block}\t{par}\t{line}\t{n}\t0\t0\t10\t10\t{conf}\t{text}")
    }

    #[test]
    fn rebuilds_lines_and_paragraphs() {
        let tsv = [
            HEADER.to_owned(),
            "1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t".to_owned(),
            "2\t1\t1\t0\t0\t0\t10\t10\t300\t40\t-1\t".to_owned(),
            word(1, 1, 1, 1, "96.5", "Hello"),
            word(1, 1, 1, 2, "93.5", "world"),
            word(1, 1, 2, 1, "90", "second"),
            word(2, 1, 1, 1, "80", "Next"),
        ]
        .join("\n");

        let recognition = parse_tsv(&tsv).unwrap();
        assert_eq!(recognition.text, "Hello world\nsecond\n\nNext\n");
        assert!((recognition.confidence - 90.0).abs() < 1e-9);
    }

    #[test]
    fn skips_negative_confidence_and_blank_words() {
        let tsv = [
            HEADER.to_owned(),
            word(1, 1, 1, 1, "-1", "ghost"),
            word(1, 1, 1, 2, "70", "   "),
            word(1, 1, 1, 3, "60", "kept"),
        ]
        .join("\n");

        let recognition = parse_tsv(&tsv).unwrap();
        assert_eq!(recognition.text, "kept\n");
        assert!((recognition.confidence - 60.0).abs() < 1e-9);
    }

    #[test]
    fn empty_page_has_zero_confidence() {
        let recognition = parse_tsv(&format!("{HEADER}\n")).unwrap();
        assert_eq!(recognition.text, "");
        assert_eq!(recognition.confidence, 0.0);
    }

    #[test]
    fn missing_header_is_an_engine_failure() {
        assert!(matches!(
            parse_tsv("Hello world"),
            Err(OcrdeskError::EngineFailure(_))
        ));
    }

    #[test]
    fn language_list_drops_banner() {
        let langs = parse_language_list(
            "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nosd\nspa\n",
        );
        assert_eq!(langs, vec!["eng", "osd", "spa"]);
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let engine = TesseractEngine::new("/nonexistent/ocrdesk/tesseract");
        let logger: EngineLogger = Arc::new(|_| {});
        let result = engine
            .recognize(Arc::from(vec![0u8; 4]), "eng", logger)
            .await;
        assert!(matches!(result, Err(OcrdeskError::EngineUnavailable(_))));
        assert!(matches!(
            engine.version().await,
            Err(OcrdeskError::EngineUnavailable(_))
        ));
    }
}
