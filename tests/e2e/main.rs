//! End-to-end scenarios for editing sessions.

mod scenarios;
