//! # Chorus Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs       # Cluster: coordinator + registered participants on loopback
//! │   └── integration/      # Cross-crate scenarios over real sockets
//! │       ├── two_phase_commit.rs
//! │       ├── playback_ordering.rs
//! │       ├── clocks.rs
//! │       ├── notifications.rs
//! │       └── runtime.rs
//! └── benches/
//!     └── ordering_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ch-tests
//! cargo test -p ch-tests integration::two_phase_commit
//! cargo bench -p ch-tests
//! ```

pub mod fixtures;
pub mod integration;
