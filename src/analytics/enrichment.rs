//! Sample texts and source attribution for detected trends

use std::collections::HashMap;

use crate::models::{RawEvent, SourceCount};

/// Most recent event texts for a category, newest first
///
/// Events with equal timestamps keep their input order.
pub fn sample_texts(events: &[RawEvent], category: &str, limit: usize) -> Vec<String> {
    let mut matching: Vec<&RawEvent> = events.iter().filter(|e| e.category == category).collect();

    // stable sort: ties stay in input order
    matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    matching
        .into_iter()
        .take(limit)
        .map(|e| e.text.clone())
        .collect()
}

/// Sources contributing the most events to a category
///
/// Ordered by count descending; ties are broken by first appearance.
pub fn top_sources(events: &[RawEvent], category: &str, limit: usize) -> Vec<SourceCount> {
    let mut counts: Vec<SourceCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for event in events.iter().filter(|e| e.category == category) {
        match index.get(event.source.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(event.source.as_str(), counts.len());
                counts.push(SourceCount {
                    source: event.source.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn events() -> Vec<RawEvent> {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        vec![
            RawEvent::new("old rash", "SIDE_EFFECTS", "fda", t0),
            RawEvent::new("price hike", "PRICING", "rss", t0 + Duration::minutes(9)),
            RawEvent::new("nausea", "SIDE_EFFECTS", "pubmed", t0 + Duration::minutes(5)),
            RawEvent::new("headache", "SIDE_EFFECTS", "rss", t0 + Duration::minutes(5)),
            RawEvent::new("dizziness", "SIDE_EFFECTS", "pubmed", t0 + Duration::minutes(7)),
            RawEvent::new("fatigue", "SIDE_EFFECTS", "rss", t0 + Duration::minutes(1)),
        ]
    }

    #[test]
    fn test_samples_newest_first() {
        let samples = sample_texts(&events(), "SIDE_EFFECTS", 3);
        assert_eq!(samples, vec!["dizziness", "nausea", "headache"]);
    }

    #[test]
    fn test_samples_only_from_category() {
        let samples = sample_texts(&events(), "PRICING", 5);
        assert_eq!(samples, vec!["price hike"]);
        assert!(sample_texts(&events(), "EFFICACY", 5).is_empty());
    }

    #[test]
    fn test_top_sources_ties_keep_first_seen() {
        let sources = top_sources(&events(), "SIDE_EFFECTS", 3);
        let names: Vec<_> = sources.iter().map(|s| s.source.as_str()).collect();

        // pubmed and rss both have 2; pubmed appears first
        assert_eq!(names, vec!["pubmed", "rss", "fda"]);
        assert_eq!(sources[0].count, 2);
        assert_eq!(sources[2].count, 1);
    }

    #[test]
    fn test_top_sources_limit() {
        assert_eq!(top_sources(&events(), "SIDE_EFFECTS", 1).len(), 1);
        assert!(top_sources(&events(), "SIDE_EFFECTS", 0).is_empty());
    }
}
