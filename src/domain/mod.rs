// Domain layer - Report records, dashboard figures and chart descriptions
pub mod chart;
pub mod fixtures;
pub mod records;
pub mod report;
pub mod summary;
