//! Core types, trait definitions and components for the Hirely marketplace.
//!
//! No HTTP or database code lives here. The
//! four components ([`registry::JobRegistry`], [`tracker::ActivityTracker`],
//! [`scheduler::InterviewScheduler`], [`aggregator::EvaluationAggregator`])
//! are generic over a [`store::MarketStore`] backend.

pub mod activity;
pub mod actor;
pub mod aggregator;
pub mod error;
pub mod evaluation;
pub mod interview;
pub mod job;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};
