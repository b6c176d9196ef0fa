//! Unit tests for the regions document format.
//!
//! These tests verify decoding of hand-written documents, rejection of
//! malformed input, and round trips through the encoder.

mod roundtrip_tests;
