//! Google Analytics 4 dashboard: a report gateway that reshapes four fixed
//! GA4 reports into one JSON envelope, and a renderer that turns that
//! envelope into summary figures and charts.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use presentation::app_state::AppState;
pub use presentation::routes::router;
