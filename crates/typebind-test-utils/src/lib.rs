//! Utilities shared by typebind tests.
//!
//! [`PairFixture`] builds the reference hierarchy programmatically; [`PAIRS_TABLE`] describes the
//! same declarations as a TOML type table so loader and CLI tests exercise identical shapes.

mod fixtures;

pub use fixtures::PairFixture;

/// TOML type table with the `com.example` pair hierarchy plus three concrete instantiations:
/// `StringIntegerType`, `StringIntegerInterface` and `StringIntegerAbstract`.
pub const PAIRS_TABLE: &str = include_str!("../testdata/pairs.toml");
