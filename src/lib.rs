/*!
 * # captidy - caption file cleanup
 *
 * A Rust library for tidying subtitle caption files: parse the numbered
 * blocks, run a fixed sequence of text cleanups over the captions, and
 * write them back in the same format.
 *
 * ## Features
 *
 * - Tolerant block parser (stray characters around indices, truncated final block)
 * - Case-insensitive literal search and replace
 * - Collapsing of repeated spaces and trimming of caption edges
 * - Sentence capitalization that carries across caption boundaries
 * - Interactive or unattended single-file runs, and batch folder runs
 *
 * ## Architecture
 *
 * - `subtitle_processor`: `Caption`, the parser and the serializer
 * - `cleanup`: the cleanup passes and the pipeline running them
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `interaction`: Prompts for preview and output filename
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]

pub mod app_config;
pub mod app_controller;
pub mod cleanup;
pub mod errors;
pub mod file_utils;
pub mod interaction;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use cleanup::{CleanupPass, CleanupPipeline, CleanupReport};
pub use errors::{AppError, ParseError};
pub use subtitle_processor::{serialize, BlankLinePolicy, Caption, CaptionDocument, CaptionParser};
