//! Test fixtures for integration tests
//!
//! Raw event exports and aggregated tables in the shapes the upstream
//! collectors produce.

/// Raw events as exported from the event store: five minutes of steady
/// side-effect reports followed by a burst, plus background pricing chatter
pub const RAW_EVENTS_JSON: &str = r#"[
    {"text": "Mild rash after first dose", "category": "SIDE_EFFECTS", "source": "pubmed", "timestamp": "2025-03-01T10:00:05Z"},
    {"text": "Headache reported", "category": "SIDE_EFFECTS", "source": "rss", "timestamp": "2025-03-01T10:00:40Z"},
    {"text": "Nausea in trial arm", "category": "SIDE_EFFECTS", "source": "clinicaltrials", "timestamp": "2025-03-01T10:01:10Z"},
    {"text": "Dizziness case", "category": "SIDE_EFFECTS", "source": "pubmed", "timestamp": "2025-03-01T10:01:50Z"},
    {"text": "Fatigue noted", "category": "SIDE_EFFECTS", "source": "rss", "timestamp": "2025-03-01T10:02:15Z"},
    {"text": "Insomnia report", "category": "SIDE_EFFECTS", "source": "pubmed", "timestamp": "2025-03-01T10:02:45Z"},
    {"text": "Dry mouth", "category": "SIDE_EFFECTS", "source": "fda", "timestamp": "2025-03-01T10:03:05Z"},
    {"text": "Joint pain", "category": "SIDE_EFFECTS", "source": "pubmed", "timestamp": "2025-03-01T10:03:35Z"},
    {"text": "Safety signal A", "category": "SIDE_EFFECTS", "source": "fda", "timestamp": "2025-03-01T10:04:01Z"},
    {"text": "Safety signal B", "category": "SIDE_EFFECTS", "source": "fda", "timestamp": "2025-03-01T10:04:07Z"},
    {"text": "Safety signal C", "category": "SIDE_EFFECTS", "source": "pubmed", "timestamp": "2025-03-01T10:04:12Z"},
    {"text": "Safety signal D", "category": "SIDE_EFFECTS", "source": "fda", "timestamp": "2025-03-01T10:04:20Z"},
    {"text": "Safety signal E", "category": "SIDE_EFFECTS", "source": "rss", "timestamp": "2025-03-01T10:04:31Z"},
    {"text": "Safety signal F", "category": "SIDE_EFFECTS", "source": "fda", "timestamp": "2025-03-01T10:04:40Z"},
    {"text": "Safety signal G", "category": "SIDE_EFFECTS", "source": "pubmed", "timestamp": "2025-03-01T10:04:48Z"},
    {"text": "Safety signal H", "category": "SIDE_EFFECTS", "source": "fda", "timestamp": "2025-03-01T10:04:55Z"},
    {"text": "Price cut announced", "category": "PRICING", "source": "rss", "timestamp": "2025-03-01T10:00:30Z"},
    {"category": "PRICING", "createdAt": "2025-03-01T10:02:30Z"}
]"#;

/// Aggregated table as written by the bucketing step of a dataframe tool
pub const AGGREGATED_CSV: &str = "\
category,hour,count
BRAND_PERCEPTION,2025-03-01 10:00:00,5
BRAND_PERCEPTION,2025-03-01 10:01:00,5
BRAND_PERCEPTION,2025-03-01 10:02:00,5
BRAND_PERCEPTION,2025-03-01 10:03:00,5
BRAND_PERCEPTION,2025-03-01 10:04:00,5
SIDE_EFFECTS,2025-03-01 10:04:00,8
SIDE_EFFECTS,2025-03-01 10:00:00,2
SIDE_EFFECTS,2025-03-01 10:01:00,2
SIDE_EFFECTS,2025-03-01 10:02:00,2
SIDE_EFFECTS,2025-03-01 10:03:00,2
";
