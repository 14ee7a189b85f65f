//! Batch runner over in-memory pages.
//!
//! The runner never touches the filesystem: it takes page contents, hands
//! each to the engine and returns one report per page, in input order.
//! Pages are independent, so they are transformed in parallel.

use crate::page::PageContext;
use crate::transform::{Engine, Mode, TransformError};
use rayon::prelude::*;
use std::path::PathBuf;

/// One page to transform.
#[derive(Debug, Clone)]
pub struct PageInput {
    /// Path on disk, used for reporting and writing back.
    pub path: PathBuf,
    pub context: PageContext,
    pub content: String,
}

/// What happened to one page.
#[derive(Debug)]
pub enum Outcome {
    /// New content to write.
    Changed(String),
    /// Transform succeeded but produced the input again.
    Unchanged,
    /// Left as it was.
    Skipped(TransformError),
}

#[derive(Debug)]
pub struct PageReport {
    pub path: PathBuf,
    pub outcome: Outcome,
    pub warnings: Vec<TransformError>,
}

impl PageReport {
    /// Report for a page that could not even be read.
    pub fn skipped(path: PathBuf, error: TransformError) -> Self {
        Self {
            path,
            outcome: Outcome::Skipped(error),
            warnings: Vec::new(),
        }
    }
}

/// Counts over a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn from_reports(reports: &[PageReport]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            summary.processed += 1;
            match report.outcome {
                Outcome::Changed(_) => summary.changed += 1,
                Outcome::Unchanged => summary.unchanged += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
            }
            summary
        })
    }
}

/// Transform every page of `inputs` with `mode`.
///
/// `on_done` is called once per page as it finishes, from worker threads.
pub fn run<F>(inputs: Vec<PageInput>, mode: Mode, engine: &Engine<'_>, on_done: F) -> Vec<PageReport>
where
    F: Fn(&PageReport) + Sync,
{
    inputs
        .into_par_iter()
        .map(|input| {
            let report = transform_page(input, mode, engine);
            on_done(&report);
            report
        })
        .collect()
}

fn transform_page(input: PageInput, mode: Mode, engine: &Engine<'_>) -> PageReport {
    let PageInput {
        path,
        context,
        content,
    } = input;

    match engine.transform(mode, &context, &content) {
        Ok(transformed) => {
            let outcome = if transformed.content == content {
                Outcome::Unchanged
            } else {
                Outcome::Changed(transformed.content)
            };
            PageReport {
                path,
                outcome,
                warnings: transformed.warnings,
            }
        }
        Err(err) => PageReport::skipped(path, err),
    }
}
