pub mod client;
pub mod models;

pub use client::{CalendlyClient, PageOptions, ScheduledEventFilter, SchedulingApi};
