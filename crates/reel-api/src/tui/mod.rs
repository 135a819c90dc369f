//! Interactive terminal movie browser

pub mod app;
pub mod display;
pub mod ui;
pub mod worker;

pub use app::{App, run};
pub use display::{MovieDisplay, TrendingDisplay};
