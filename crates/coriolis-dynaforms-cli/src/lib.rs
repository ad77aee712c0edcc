// crates/coriolis-dynaforms-cli/src/lib.rs
// ============================================================================
// Module: Dynaforms CLI Library
// Description: Shared helpers for the dynaforms command-line interface.
// Purpose: Provide reusable components (i18n) for the CLI binary and tests.
// Dependencies: coriolis-dynaforms
// ============================================================================

//! ## Overview
//! This library houses the CLI message catalog. The binary entry point
//! (`src/main.rs`) routes every user-facing line through [`t!`](crate::t) so output
//! stays consistent across English and Polish.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
