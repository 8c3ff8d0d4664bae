use std::collections::BTreeMap;

use crate::parser::Extraction;

/// Counts for the console report. Keys are sorted for stable output.
pub struct Summary {
    pub total: usize,
    pub by_grade: BTreeMap<&'static str, usize>,
    pub by_topic: BTreeMap<&'static str, usize>,
    pub rejected: BTreeMap<&'static str, usize>,
    pub duplicates: usize,
    pub pages_scanned: usize,
    pub pages_failed: usize,
}

impl Summary {
    pub fn new(extraction: &Extraction) -> Self {
        let mut by_grade = BTreeMap::new();
        let mut by_topic = BTreeMap::new();
        for r in &extraction.records {
            *by_grade.entry(r.grade_level.as_str()).or_insert(0) += 1;
            *by_topic.entry(r.topic.as_str()).or_insert(0) += 1;
        }

        let mut rejected = BTreeMap::new();
        for q in &extraction.rejected {
            *rejected.entry(q.rejection.reason()).or_insert(0) += 1;
        }

        Summary {
            total: extraction.records.len(),
            by_grade,
            by_topic,
            rejected,
            duplicates: extraction.duplicates.len(),
            pages_scanned: extraction.pages_scanned,
            pages_failed: extraction.pages_failed,
        }
    }

    pub fn render(&self, with_rejections: bool) -> String {
        let mut out = String::new();
        out.push_str("=== STATISTICS ===\n");
        out.push_str(&format!("Total questions extracted: {}\n", self.total));

        out.push_str("\nBy grade level:\n");
        for (grade, n) in &self.by_grade {
            out.push_str(&format!("  {grade}: {n} questions\n"));
        }

        out.push_str("\nBy topic:\n");
        for (topic, n) in &self.by_topic {
            out.push_str(&format!("  {topic}: {n} questions\n"));
        }

        if with_rejections {
            out.push_str(&format!(
                "\nPages: {} scanned, {} unreadable\n",
                self.pages_scanned, self.pages_failed
            ));
            out.push_str(&format!("Rejected: {}\n", self.rejected.values().sum::<usize>()));
            for (reason, n) in &self.rejected {
                out.push_str(&format!("  {reason}: {n}\n"));
            }
            if self.duplicates > 0 {
                out.push_str(&format!("Duplicate ids dropped: {}\n", self.duplicates));
            }
        }
        out
    }
}

pub fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
