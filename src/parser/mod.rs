pub mod classify;
pub mod extract;
pub mod fragments;
pub mod sections;
pub mod segment;

use std::collections::HashSet;

use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::pdf::SpanSource;
use crate::record::QuestionRecord;
use fragments::Fragment;
use sections::SectionTracker;
pub use segment::RejectedQuestion;

/// Knobs for one traversal. Built from `settings::Settings`.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Leading pages skipped outright, header detection included.
    pub cover_pages: usize,
    pub header_marker: String,
    pub bold_marker: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            cover_pages: 1,
            header_marker: sections::DEFAULT_HEADER_MARKER.to_string(),
            bold_marker: "Bold".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<QuestionRecord>,
    pub rejected: Vec<RejectedQuestion>,
    /// Ids dropped because an earlier record already used them.
    pub duplicates: Vec<String>,
    pub pages_scanned: usize,
    pub pages_failed: usize,
}

/// Pipeline: spans → fragments → grade sections → questions, page by page.
///
/// The grade accumulator starts unset here and is carried across pages, so a
/// header on one page governs every following page until the next header.
pub fn extract_document<S: SpanSource>(
    source: &S,
    options: &ParseOptions,
    pb: &ProgressBar,
) -> Extraction {
    let mut sections = SectionTracker::new(options.header_marker.as_str());
    let mut seen_ids = HashSet::new();
    let mut out = Extraction::default();

    for page_index in 0..source.page_count() {
        pb.inc(1);
        if page_index < options.cover_pages {
            continue;
        }
        let page = page_index + 1;

        let fragments = match page_fragments(source, page_index, &options.bold_marker) {
            Ok(f) => f,
            Err(e) => {
                warn!(page, error = %e, "skipping unreadable page");
                out.pages_failed += 1;
                continue;
            }
        };
        out.pages_scanned += 1;

        let found = segment::extract_questions_from_page(&fragments, page, &mut sections);
        for record in found.records {
            if seen_ids.insert(record.id.clone()) {
                out.records.push(record);
            } else {
                warn!(page, id = %record.id, "duplicate question id, keeping the first");
                out.duplicates.push(record.id);
            }
        }
        out.rejected.extend(found.rejected);
    }

    info!(
        pages = out.pages_scanned,
        questions = out.records.len(),
        rejected = out.rejected.len(),
        "extraction finished"
    );
    out
}

pub fn page_fragments<S: SpanSource>(
    source: &S,
    page_index: usize,
    bold_marker: &str,
) -> Result<Vec<Fragment>, crate::error::ExtractError> {
    let spans = source.page_spans(page_index)?;
    Ok(fragments::from_spans(&spans, bold_marker))
}
