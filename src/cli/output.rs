use crate::checker::MisspelledSet;
use crate::dict::DictionaryInfo;
use crate::HighlightRange;
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONTEXT_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Everything the front end shows for one checked file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub text: String,
    pub misspelled: MisspelledSet,
    pub ranges: Vec<HighlightRange>,
    pub suggestions: BTreeMap<String, Vec<String>>,
}

/// A highlight range resolved to a line and column (both 1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Located {
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
    pub word: String,
    #[serde(skip)]
    pub line_text: String,
}

impl FileReport {
    pub fn flagged(&self) -> usize {
        self.ranges.len()
    }

    pub fn locate(&self) -> Vec<Located> {
        let chars: Vec<char> = self.text.chars().collect();
        let mut line_starts = vec![0];
        line_starts.extend(
            chars
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == '\n')
                .map(|(i, _)| i + 1),
        );

        self.ranges
            .iter()
            .map(|range| {
                let line = line_starts.partition_point(|&s| s <= range.start) - 1;
                let line_start = line_starts[line];
                let line_end = line_starts
                    .get(line + 1)
                    .map_or(chars.len(), |next| next - 1);
                let end = range.end.min(chars.len());

                Located {
                    line: line + 1,
                    column: range.start - line_start + 1,
                    start: range.start,
                    end,
                    word: chars[range.start..end].iter().collect(),
                    line_text: chars[line_start..line_end.max(line_start)]
                        .iter()
                        .collect::<String>()
                        .trim_end_matches('\r')
                        .to_string(),
                }
            })
            .collect()
    }

    fn suggestions_for(&self, word: &str) -> &[String] {
        self.suggestions
            .iter()
            .find(|(w, _)| w.to_lowercase() == word.to_lowercase())
            .map(|(_, s)| s.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
struct JsonRange {
    #[serde(flatten)]
    location: Located,
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct JsonFile {
    file: String,
    misspelled: Vec<String>,
    ranges: Vec<JsonRange>,
}

#[derive(Debug, Serialize)]
struct JsonOutput {
    files_checked: usize,
    total_flagged: usize,
    files: Vec<JsonFile>,
}

pub fn print_reports(reports: &[FileReport], colored_output: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for report in reports {
                print_text_report(report, colored_output);
            }
            Ok(())
        }
        OutputFormat::Json => print_json_reports(reports),
    }
}

pub fn print_text_report(report: &FileReport, colored_output: bool) {
    if report.ranges.is_empty() {
        return;
    }

    let file_name = report.path.display().to_string();
    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for located in report.locate() {
        let line_info = format!("{}:{}", located.line, located.column);
        let context = format_context(&located, colored_output);
        let suggestions = report.suggestions_for(&located.word);

        if colored_output {
            println!(
                "  {} {} {}",
                line_info.blue().bold(),
                located.word.red().bold(),
                context
            );
            if !suggestions.is_empty() {
                let separator = ", ".dimmed().to_string();
                let joined = suggestions
                    .iter()
                    .map(|s| s.green().to_string())
                    .collect::<Vec<_>>()
                    .join(separator.as_str());
                println!("    {} {}", "→".dimmed(), joined);
            }
        } else {
            println!("  {} {} {}", line_info, located.word, context);
            if !suggestions.is_empty() {
                println!("    → {}", suggestions.join(", "));
            }
        }
    }
}

fn print_json_reports(reports: &[FileReport]) -> Result<()> {
    let files = reports
        .iter()
        .map(|report| JsonFile {
            file: report.path.display().to_string(),
            misspelled: report.misspelled.iter().cloned().collect(),
            ranges: report
                .locate()
                .into_iter()
                .map(|location| JsonRange {
                    suggestions: report.suggestions_for(&location.word).to_vec(),
                    location,
                })
                .collect(),
        })
        .collect();

    let output = JsonOutput {
        files_checked: reports.len(),
        total_flagged: reports.iter().map(FileReport::flagged).sum(),
        files,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// The line around the word, with the word painted when colored.
fn format_context(located: &Located, colored: bool) -> String {
    let chars: Vec<char> = located.line_text.chars().collect();
    let word_start = (located.column - 1).min(chars.len());
    let word_end = (word_start + located.end - located.start).min(chars.len());
    let start = word_start.saturating_sub(CONTEXT_CHARS);
    let end = (word_end + CONTEXT_CHARS).min(chars.len());

    let before: String = chars[start..word_start].iter().collect();
    let word: String = chars[word_start..word_end].iter().collect();
    let after: String = chars[word_end..end].iter().collect();

    let word = if colored {
        word.red().bold().underline().to_string()
    } else {
        word
    };
    let prefix = if start > 0 { "..." } else { "" };
    let suffix = if end < chars.len() { "..." } else { "" };

    format!("{prefix}{}{word}{}{suffix}", before.trim_start(), after.trim_end())
}

pub fn print_check_summary(total_flagged: usize, files: &[impl AsRef<Path>], colored: bool) {
    println!();
    if total_flagged == 0 {
        if colored {
            println!("{}", "✓ No spelling errors found!".green().bold());
        } else {
            println!("✓ No spelling errors found!");
        }
        return;
    }

    let error_word = if total_flagged == 1 { "error" } else { "errors" };
    let file_word = if files.len() == 1 { "file" } else { "files" };
    if colored {
        println!(
            "{} {} {} found in {} {}",
            "✗".red().bold(),
            total_flagged.to_string().red().bold(),
            error_word,
            files.len(),
            file_word
        );
    } else {
        println!(
            "✗ {} {} found in {} {}",
            total_flagged,
            error_word,
            files.len(),
            file_word
        );
    }
}

pub fn print_suggestions(word: &str, suggestions: Option<&[String]>, colored: bool) {
    match suggestions {
        None => println!("'{}' is spelled correctly", word),
        Some([]) => println!("No suggestions for '{}'", word),
        Some(list) if colored => {
            let joined = list
                .iter()
                .map(|s| s.green().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("{} {}", word.red().bold(), joined);
        }
        Some(list) => println!("{} {}", word, list.join(", ")),
    }
}

pub fn print_dictionaries(infos: &[DictionaryInfo], root: &Path, colored: bool) {
    if infos.is_empty() {
        if colored {
            println!("{}", "No dictionaries installed.".yellow());
        } else {
            println!("No dictionaries installed.");
        }
        println!("Run `spellmark dict build <WORDLIST> <LANG>` to add one.");
        return;
    }

    println!("Installed dictionaries:\n");
    for info in infos {
        let size = format!("{}KB, {} words", info.size_bytes / 1024, info.word_count);
        if colored {
            println!("  {} {} ({})", "✓".green(), info.language.cyan().bold(), size.dimmed());
        } else {
            println!("  ✓ {} ({})", info.language, size);
        }
    }
    println!("\nDictionary directory: {}", root.display());
}

pub fn print_dictionary_info(language: &str, info: Option<&DictionaryInfo>, colored: bool) {
    let Some(info) = info else {
        if colored {
            println!("{} Dictionary for {} not found.", "✗".red().bold(), language.yellow());
        } else {
            println!("✗ Dictionary for {} not found.", language);
        }
        return;
    };

    println!("Dictionary: {}", info.language);
    println!("  Path: {}", info.path.display());
    println!("  Size: {} KB", info.size_bytes / 1024);
    println!("  Words: {}", info.word_count);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(text: &str, ranges: &[(usize, usize)]) -> FileReport {
        FileReport {
            path: PathBuf::from("notes.txt"),
            text: text.to_string(),
            misspelled: MisspelledSet::new(),
            ranges: ranges
                .iter()
                .map(|&(s, e)| HighlightRange::new(s, e))
                .collect(),
            suggestions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_locate_lines_and_columns() {
        let report = report("first line\nThe quikc fox\r\nend", &[(15, 20), (26, 29)]);
        let located = report.locate();

        assert_eq!(located[0].line, 2);
        assert_eq!(located[0].column, 5);
        assert_eq!(located[0].word, "quikc");
        assert_eq!(located[0].line_text, "The quikc fox");
        assert_eq!(located[1].line, 3);
        assert_eq!(located[1].word, "end");
    }

    #[test]
    fn test_context_plain() {
        let report = report("The quikc brown fox", &[(4, 9)]);
        let located = &report.locate()[0];
        assert_eq!(format_context(located, false), "The quikc brown fox");
    }

    #[test]
    fn test_context_truncates_long_lines() {
        let text = format!("{} wrod {}", "a".repeat(50), "b".repeat(50));
        let report = report(&text, &[(51, 55)]);
        let context = format_context(&report.locate()[0], false);
        assert!(context.starts_with("..."));
        assert!(context.ends_with("..."));
        assert!(context.contains(" wrod "));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
