/*!
 * Caption text cleanup.
 *
 * - `passes`: the individual text transforms
 * - `pipeline`: runs them over a caption sequence in a fixed order
 */

pub mod passes;
pub mod pipeline;

pub use passes::{
    capitalize_content, capitalize_sentences, collapse_multiple_spaces, search_and_replace,
    trim_edges, Capitalization,
};
pub use pipeline::{CleanupPass, CleanupPipeline, CleanupReport, PassOutcome};
