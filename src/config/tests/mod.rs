//! Unit tests for dockenv configuration.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Basic type and serialisation tests
//! - [`validation`] - `AppConfig::validate` tests
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests
//! - [`loader_tests`] - environment and CLI layer collection tests

mod helpers;
