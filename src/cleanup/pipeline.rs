/*!
 * Fixed-order cleanup pipeline.
 *
 * Passes always run in the same order because each one reads the text the
 * previous one produced: replacements, space collapsing, edge trimming,
 * then sentence capitalization (which needs trimmed content so the first
 * character is the real first character).
 */

use std::fmt;
use std::time::{Duration, Instant};
use log::debug;

use crate::app_config::{Config, PassesConfig, Replacement};
use crate::subtitle_processor::Caption;
use super::passes;

/// The cleanup passes, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupPass {
    SearchReplace,
    CollapseSpaces,
    TrimEdges,
    Capitalize,
}

impl CleanupPass {
    /// Execution order of the pipeline
    pub const ORDER: [CleanupPass; 4] = [
        CleanupPass::SearchReplace,
        CleanupPass::CollapseSpaces,
        CleanupPass::TrimEdges,
        CleanupPass::Capitalize,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SearchReplace => "search and replace",
            Self::CollapseSpaces => "collapse multiple spaces",
            Self::TrimEdges => "trim edges",
            Self::Capitalize => "auto-capitalize sentences",
        }
    }
}

impl fmt::Display for CleanupPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Change count reported by one pass invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub pass: CleanupPass,
    /// Extra detail, e.g. the replacement pair
    pub label: String,
    pub changes: usize,
}

/// Counts collected over one pipeline run
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    /// One entry per pass invocation, in execution order
    pub outcomes: Vec<PassOutcome>,
    pub duration: Duration,
}

impl CleanupReport {
    /// Sum of the changes made by every invocation of `pass`
    pub fn changes_for(&self, pass: CleanupPass) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.pass == pass)
            .map(|outcome| outcome.changes)
            .sum()
    }

    pub fn total_changes(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.changes).sum()
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{} replacements, {} extra spaces removed, {} trims, {} capitalizations ({} changes in {:.1?})",
            self.changes_for(CleanupPass::SearchReplace),
            self.changes_for(CleanupPass::CollapseSpaces),
            self.changes_for(CleanupPass::TrimEdges),
            self.changes_for(CleanupPass::Capitalize),
            self.total_changes(),
            self.duration,
        )
    }
}

/// Ordered set of cleanup passes applied to a caption sequence
#[derive(Debug, Clone)]
pub struct CleanupPipeline {
    replacements: Vec<Replacement>,
    passes: PassesConfig,
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanupPipeline {
    /// Pipeline with every pass enabled and no replacement pairs
    pub fn new() -> Self {
        Self {
            replacements: Vec::new(),
            passes: PassesConfig::default(),
        }
    }

    /// Pipeline using the replacement pairs and pass switches of `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            replacements: config.replacements.clone(),
            passes: config.passes.clone(),
        }
    }

    /// Append a search/replace pair; pairs run in the order added
    pub fn with_replacement(mut self, search: &str, replace: &str) -> Self {
        self.replacements.push(Replacement::new(search, replace));
        self
    }

    /// Enable or disable one pass
    pub fn with_pass(mut self, pass: CleanupPass, enabled: bool) -> Self {
        match pass {
            CleanupPass::SearchReplace => self.passes.search_replace = enabled,
            CleanupPass::CollapseSpaces => self.passes.collapse_spaces = enabled,
            CleanupPass::TrimEdges => self.passes.trim_edges = enabled,
            CleanupPass::Capitalize => self.passes.capitalize = enabled,
        }
        self
    }

    pub fn is_enabled(&self, pass: CleanupPass) -> bool {
        match pass {
            CleanupPass::SearchReplace => self.passes.search_replace,
            CleanupPass::CollapseSpaces => self.passes.collapse_spaces,
            CleanupPass::TrimEdges => self.passes.trim_edges,
            CleanupPass::Capitalize => self.passes.capitalize,
        }
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Run every enabled pass over `captions`, in order
    pub fn run(&self, captions: &mut [Caption]) -> CleanupReport {
        let start_time = Instant::now();
        let mut report = CleanupReport::default();

        for pass in CleanupPass::ORDER {
            if !self.is_enabled(pass) {
                debug!("Skipping disabled pass: {}", pass);
                continue;
            }

            match pass {
                CleanupPass::SearchReplace => {
                    for replacement in &self.replacements {
                        let changes = passes::search_and_replace(
                            captions,
                            &replacement.search,
                            &replacement.replace,
                        );
                        report.outcomes.push(PassOutcome {
                            pass,
                            label: format!("\"{}\" -> \"{}\"", replacement.search, replacement.replace),
                            changes,
                        });
                    }
                }
                CleanupPass::CollapseSpaces => {
                    let changes = passes::collapse_multiple_spaces(captions);
                    report.outcomes.push(PassOutcome { pass, label: String::new(), changes });
                }
                CleanupPass::TrimEdges => {
                    let changes = passes::trim_edges(captions);
                    report.outcomes.push(PassOutcome { pass, label: String::new(), changes });
                }
                CleanupPass::Capitalize => {
                    let changes = passes::capitalize_sentences(captions);
                    report.outcomes.push(PassOutcome { pass, label: String::new(), changes });
                }
            }
        }

        report.duration = start_time.elapsed();
        report
    }
}
