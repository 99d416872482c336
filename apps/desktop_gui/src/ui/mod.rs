//! UI layer for the desktop GUI: upload panel and drop target.

pub mod app;

pub use app::SmartDocApp;
