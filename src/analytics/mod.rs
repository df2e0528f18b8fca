//! Analytics module for trend detection and reporting

pub mod detector;
pub mod enrichment;
pub mod rolling;
pub mod summary;

pub use detector::{detect_trends, Evaluation, TrendDetector};
pub use enrichment::{sample_texts, top_sources};
pub use rolling::{rolling_means, RollingPoint};
pub use summary::{format_trend_summary, title_case, DetectionReport, SeverityBreakdown};
