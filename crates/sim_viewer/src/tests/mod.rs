//! Cross-module tests

mod viewer_integration;
