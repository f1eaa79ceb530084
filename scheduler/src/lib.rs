//! Simulated module registration processes driven to completion under
//! round robin, priority and multi-level feedback queue scheduling.

pub mod scheduler;
