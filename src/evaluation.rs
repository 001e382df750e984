//! Citation coverage for a single answer: which retrieved sources the answer
//! actually cites, which it ignores, and which markers point nowhere.

use crate::citations::{parse, resolve_index};
use crate::models::{CitationReport, Segment, SourceRecord};

use std::collections::BTreeSet;

pub fn citation_report(answer: &str, sources: &[SourceRecord]) -> CitationReport {
    let mut citations_found = 0;
    let mut cited = BTreeSet::new();
    let mut unresolved = BTreeSet::new();

    for segment in parse(answer) {
        if let Segment::Citation {
            referenced_indices, ..
        } = segment
        {
            citations_found += 1;
            for index in referenced_indices {
                if resolve_index(index, sources).is_resolved() {
                    cited.insert(index);
                } else {
                    unresolved.insert(index);
                }
            }
        }
    }

    let uncited_sources = (1..=sources.len()).filter(|i| !cited.contains(i)).collect();
    let accuracy = if sources.is_empty() {
        0.0
    } else {
        cited.len() as f64 / sources.len() as f64
    };

    CitationReport {
        citations_found,
        sources_used: sources.len(),
        cited_sources: cited.into_iter().collect(),
        uncited_sources,
        unresolved_indices: unresolved.into_iter().collect(),
        accuracy,
    }
}
