// Presentation layer - HTTP handlers, page rendering and live updates
pub mod app_state;
pub mod charts;
pub mod handlers;
pub mod live;
pub mod view_controller;
pub mod views;
