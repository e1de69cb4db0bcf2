//! Topological sorting for graphs given as adjacency lists.
//!
//! A graph is a slice of `Vec<usize>`: entry `i` lists the targets of the edges
//! leaving node `i`. [`topological_sort`] returns one order in which every edge
//! points forward, or a [`SortError`] saying why none exists.
//!
//! ```
//! let graph = vec![vec![1, 2], vec![3], vec![3], vec![]];
//! assert_eq!(dagsort::topological_sort(&graph).unwrap(), vec![0, 1, 2, 3]);
//!
//! let ring = vec![vec![1], vec![0]];
//! assert!(matches!(
//!     dagsort::topological_sort(&ring),
//!     Err(dagsort::SortError::CycleDetected { .. })
//! ));
//! ```
//!
//! Each call owns its working tables, so concurrent calls on shared graphs are
//! safe. Nothing is logged unless the caller installs a `tracing` subscriber.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod report;

pub use engine::{sort, topological_sort, validate, verify_order};
pub use error::{OrderViolation, SortError, SortResult, VerifyError};
