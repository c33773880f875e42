// Keyword extraction and matching engine.
// Implements: catalog, JD analysis, candidate matching, outreach messages, run orchestration.
// Everything below `handlers` is synchronous and free of I/O.

pub mod catalog;
pub mod handlers;
pub mod jd_analyzer;
pub mod matcher;
pub mod orchestrator;
pub mod outreach;
