// crates/coriolis-dynaforms/src/tests.rs
// ============================================================================
// Module: Engine Test Lint Configuration
// Description: Shared test-only lint relaxations for engine unit tests.
// Purpose: Allow panic-based assertions in tests.
// Dependencies: coriolis-dynaforms
// ============================================================================

//! ## Overview
//! Provides test-only lint relaxations for engine unit tests.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Modules
// ============================================================================

mod i18n;
