//! Multimodal transit route planner.
//!
//! Answers "how do I get from here to there by bus, metro and on foot?" with
//! up to five ranked, loopless routes over a static stop network.

pub mod domain;
pub mod estimator;
pub mod network;
pub mod planner;
pub mod web;
