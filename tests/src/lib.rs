//! # DSES Test Suite
//!
//! End-to-end flows through the chaincode dispatcher and the transactional
//! in-memory ledger.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Registry and incentive flows
//!     ├── flows.rs      # One flow per registry guarantee
//!     └── atomicity.rs  # Failed invocations leave no trace
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dses-tests
//! cargo test -p dses-tests integration::atomicity
//! ```

pub mod integration;
