//! # Bounty Testkit
//!
//! Testing utilities for the Bounty protocol.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: manual clocks, recording settlement backends, and
//!   pre-wired protocol setups
//! - **Generators**: proptest strategies for property-based testing,
//!   including whole operation sequences for the conservation property
//! - **Golden vectors**: deterministic attestation vectors for
//!   cross-implementation verification of the signed message layout
//!
//! ## Fixtures
//!
//! ```rust
//! use bounty_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let attestation = fixture.attest(500);
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use bounty_testkit::generators::op_sequence;
//!
//! proptest! {
//!     #[test]
//!     fn conservation(ops in op_sequence(50)) {
//!         // apply ops, check Ledger::conservation_holds()
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{ManualClock, MockSettlement, TestFixture};
