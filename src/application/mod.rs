// Application layer - Use cases and the ports they depend on
pub mod analytics_repository;
pub mod dashboard_controller;
pub mod renderer;
pub mod report_service;
