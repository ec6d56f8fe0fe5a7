use crate::cli::check::FileCheck;
use crate::cli::output::{print_text_report, FileReport};
use anyhow::Result;
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewChoice {
    Skip,
    Ignore,
    Add,
    Quit,
}

const CHOICES: [(ReviewChoice, &str); 4] = [
    (ReviewChoice::Skip, "Skip"),
    (ReviewChoice::Ignore, "Ignore for this run"),
    (ReviewChoice::Add, "Add to personal dictionary"),
    (ReviewChoice::Quit, "Quit"),
];

/// Walk the flagged words of `check`, then recheck and print what is left.
///
/// Returns the remaining number of flagged ranges and whether the user quit.
pub fn review(check: &FileCheck, report: &FileReport, colored: bool) -> Result<(usize, bool)> {
    let mut quit = false;

    for word in &report.misspelled {
        let suggestions = report.suggestions.get(word).map(Vec::as_slice).unwrap_or(&[]);
        match prompt(word, suggestions, colored)? {
            ReviewChoice::Skip => {}
            ReviewChoice::Ignore => check.session().ignore_word(word),
            ReviewChoice::Add => check.session().add_word(word),
            ReviewChoice::Quit => {
                quit = true;
                break;
            }
        }
    }

    let updated = check.recheck();
    print_text_report(&updated, colored);
    Ok((updated.flagged(), quit))
}

fn prompt(word: &str, suggestions: &[String], colored: bool) -> Result<ReviewChoice> {
    let shown = if colored {
        word.red().bold().to_string()
    } else {
        word.to_string()
    };
    let mut title = format!("Misspelling: {shown}");
    if !suggestions.is_empty() {
        title.push_str(&format!(" (did you mean: {})", suggestions.join(", ")));
    }

    let labels: Vec<&str> = CHOICES.iter().map(|(_, label)| *label).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(title)
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(selection.map_or(ReviewChoice::Quit, |i| CHOICES[i].0))
}
