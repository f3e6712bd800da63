/*!
 * Text cleanup passes over a caption sequence.
 *
 * Every pass mutates caption content in place, never reorders the sequence,
 * and returns how many changes it made. A count of zero is a normal outcome.
 */

use log::{info, warn};
use regex::{NoExpand, RegexBuilder};

use crate::subtitle_processor::Caption;

/// Replace every case-insensitive occurrence of `search` with `replace`.
///
/// Matches are found leftmost-first and scanning resumes after each replaced
/// span, so a replacement that itself contains `search` is not re-matched.
/// The replacement is inserted literally.
pub fn search_and_replace(captions: &mut [Caption], search: &str, replace: &str) -> usize {
    info!("Replacing \"{}\" with \"{}\"...", search, replace);

    if search.is_empty() {
        warn!("Skipping replacement with an empty search string");
        return 0;
    }

    let pattern = match RegexBuilder::new(&regex::escape(search))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!("Could not build matcher for \"{}\": {}", search, e);
            return 0;
        }
    };

    let mut replacements_performed = 0;
    for caption in captions.iter_mut() {
        let matches = pattern.find_iter(caption.content()).count();
        if matches == 0 {
            continue;
        }

        let replaced = pattern
            .replace_all(caption.content(), NoExpand(replace))
            .into_owned();
        caption.set_content(replaced);
        replacements_performed += matches;
    }

    info!("{} replacements performed", replacements_performed);
    replacements_performed
}

/// Collapse every run of two or more spaces to a single space.
/// Returns the number of space characters removed.
pub fn collapse_multiple_spaces(captions: &mut [Caption]) -> usize {
    info!("Removing multiple spaces...");

    let mut spaces_removed = 0;
    for caption in captions.iter_mut() {
        let (collapsed, removed) = collapse_spaces(caption.content());
        if removed > 0 {
            caption.set_content(collapsed);
            spaces_removed += removed;
        }
    }

    info!("{} extra spaces removed", spaces_removed);
    spaces_removed
}

// Drops each space that is directly followed by another space
fn collapse_spaces(text: &str) -> (String, usize) {
    let mut collapsed = String::with_capacity(text.len());
    let mut removed = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ' ' && chars.peek() == Some(&' ') {
            removed += 1;
            continue;
        }
        collapsed.push(c);
    }

    (collapsed, removed)
}

/// Strip leading and trailing whitespace from each caption.
/// Returns the number of captions that changed.
pub fn trim_edges(captions: &mut [Caption]) -> usize {
    info!("Removing trailing spaces...");

    let mut trims_performed = 0;
    for caption in captions.iter_mut() {
        let trimmed = caption.content().trim();
        if trimmed.len() != caption.content().len() {
            let trimmed = trimmed.to_string();
            caption.set_content(trimmed);
            trims_performed += 1;
        }
    }

    info!("{} successful trims performed", trims_performed);
    trims_performed
}

/// Result of capitalizing one caption's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capitalization {
    /// The rewritten content
    pub text: String,
    /// Positions forced to uppercase
    pub capitalizations: usize,
    /// Whether the next caption starts a new sentence
    pub capitalize_next: bool,
}

/// Capitalize one caption's content given whether it opens a sentence.
///
/// The first character is forced to uppercase when `capitalize_first` is set,
/// as is every character that follows a `". "`. Empty content never opens a
/// sentence for the caption after it.
pub fn capitalize_content(text: &str, capitalize_first: bool) -> Capitalization {
    let chars: Vec<char> = text.chars().collect();
    let mut forced = vec![false; chars.len()];

    if capitalize_first && !chars.is_empty() {
        forced[0] = true;
    }
    for i in 2..chars.len() {
        if chars[i - 2] == '.' && chars[i - 1] == ' ' {
            forced[i] = true;
        }
    }

    let mut rewritten = String::with_capacity(text.len());
    for (c, force) in chars.iter().zip(&forced) {
        if *force {
            rewritten.push(uppercase_char(*c));
        } else {
            rewritten.push(*c);
        }
    }

    let capitalize_next = rewritten.ends_with('.');
    Capitalization {
        text: rewritten,
        capitalizations: forced.iter().filter(|f| **f).count(),
        capitalize_next,
    }
}

// Characters whose uppercase form is longer than one character stay as they are
fn uppercase_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Capitalize sentence starts across the whole sequence.
///
/// The "starts a sentence" flag is carried from caption to caption: the
/// first caption always starts one, and each later caption does when the
/// previous caption ended with a period.
pub fn capitalize_sentences(captions: &mut [Caption]) -> usize {
    info!("Auto-capitalizing sentences...");

    let (_, capitalizations_performed) =
        captions
            .iter_mut()
            .fold((true, 0), |(capitalize_first, total), caption| {
                let result = capitalize_content(caption.content(), capitalize_first);
                caption.set_content(result.text);
                (result.capitalize_next, total + result.capitalizations)
            });

    info!("{} capitalizations performed", capitalizations_performed);
    capitalizations_performed
}
