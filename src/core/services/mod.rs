pub mod analytics_service;
pub mod split_service;

pub use analytics_service::{AnalyticsService, GroupDimension};
pub use split_service::{EditOp, SplitService};
