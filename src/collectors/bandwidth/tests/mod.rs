//! Test module organization for bandwidth checks
//!
//! Cross-module tests for the sampling protocol, grouped by the component
//! under test.
