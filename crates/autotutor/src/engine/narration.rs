//! Voiceover script and SubRip captions.
//!
//! Both files are plain templated text, so the same facts always produce the
//! same bytes.

use super::enricher::PropertyRecord;
use super::teaching::FORMULA_BULLETS;
use std::fmt::Write as _;
use std::time::Duration;

/// Longest caption line, in characters.
pub const MAX_CAPTION_CHARS: usize = 42;
/// Reading speed used to time captions.
const CHARS_PER_SECOND: u64 = 15;
const MIN_CUE_MILLIS: u64 = 1500;

const NAMING_CHECKLIST: &str = "Naming checklist: longest chain, lowest locants for multiple bonds, then substituents alphabetically.";

/// The ordered lines of a narration script, one fact per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    lines: Vec<String>,
}

/// One SubRip entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// 1-based sequence number.
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
    pub text: String,
}

impl Narration {
    /// Narration for a run with a known structure.
    pub fn for_structure(title: &str, smiles: &str, properties: &PropertyRecord) -> Self {
        let rings = properties.rings.unwrap_or(0);
        let lines = vec![
            format!("Title: {}", title),
            format!(
                "Formula: {} | Exact mass {:.4} u | SMILES: {}",
                properties.formula, properties.exact_mass, smiles
            ),
            du_line(properties.degree_of_unsaturation),
            format!("Heavy atoms: {} | Rings: {}", properties.heavy_atoms, rings),
            NAMING_CHECKLIST.to_string(),
        ];
        Self { lines }
    }

    /// Narration for formula-only mode. `formula_text` is spoken exactly as
    /// the user typed it.
    pub fn for_formula(title: &str, formula_text: &str, properties: &PropertyRecord) -> Self {
        let lines = vec![
            format!("Title: {}", title),
            format!("Formula: {}", formula_text),
            du_line(properties.degree_of_unsaturation),
            FORMULA_BULLETS[0].to_string(),
        ];
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The `voiceover.txt` contents: newline-separated lines with a final newline.
    pub fn voiceover(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Splits every line into caption-sized pieces laid out back to back.
    pub fn cues(&self) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut clock = Duration::ZERO;
        for line in &self.lines {
            for text in wrap(line, MAX_CAPTION_CHARS) {
                let start = clock;
                clock += cue_duration(&text);
                cues.push(Cue {
                    index: cues.len() + 1,
                    start,
                    end: clock,
                    text,
                });
            }
        }
        cues
    }

    /// The `captions.srt` contents.
    pub fn captions(&self) -> String {
        to_srt(&self.cues())
    }
}

fn du_line(du: f64) -> String {
    format!("Unsaturation (rings + double + 2*triple): DU = {:.1}", du)
}

/// Serializes cues in SubRip format.
pub fn to_srt(cues: &[Cue]) -> String {
    let mut out = String::new();
    for cue in cues {
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            cue.index,
            format_timestamp(cue.start),
            format_timestamp(cue.end),
            cue.text
        );
    }
    out
}

/// `HH:MM:SS,mmm`.
pub fn format_timestamp(at: Duration) -> String {
    let millis = at.as_millis();
    let (hours, rest) = (millis / 3_600_000, millis % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (seconds, millis) = (rest / 1000, rest % 1000);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

fn cue_duration(text: &str) -> Duration {
    let chars = text.chars().count() as u64;
    let reading = (chars * 1000).div_ceil(CHARS_PER_SECOND);
    Duration::from_millis(reading.max(MIN_CUE_MILLIS))
}

/// Greedy word wrap. Words longer than `width` are split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        let word_len = chars.len();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}
