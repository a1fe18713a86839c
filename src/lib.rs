//! An [exact cover] solver library using Knuth's [dancing links (DLX)] algorithm.
//!
//! [exact cover]: https://en.wikipedia.org/wiki/Exact_cover
//! [dancing links (DLX)]: https://en.wikipedia.org/wiki/Dancing_Links
//!
//! # Concept
//!
//! Many puzzle-like problems — Sudoku, pentomino tiling, the N-queens problem — can be
//! modeled as exact cover problems: given a universe of named elements and a family of
//! named subsets, find every selection of subsets whose disjoint union is exactly the
//! universe. This library provides the matrix and search used to solve that problem
//! once it's been modeled this way; modeling the puzzle itself is left to the caller
//! (see `demos/` in the repository for a Sudoku and a pentomino encoder).
//!
//! # Basic example
//!
//! ```
//! use exact_cover::Matrix;
//!
//! let mut mat = Matrix::from_elements(["1", "2", "3"]);
//! mat.define_subset("A", ["1", "2", "3"]);
//! mat.define_subset("B", ["1"]);
//! mat.define_subset("C", ["2"]);
//! mat.define_subset("D", ["3"]);
//! mat.define_subset("E", ["1", "2"]);
//! mat.define_subset("F", ["2", "3"]);
//!
//! let solution_count = mat.search(false);
//! assert_eq!(solution_count, 4);
//! ```
//!
//! Register a sink to see which subsets made up each solution:
//!
//! ```
//! use exact_cover::{Matrix, SolutionCollector};
//!
//! let mut mat = Matrix::from_elements(["1", "2", "3"]);
//! mat.define_subset("A", ["1", "2", "3"]);
//! mat.define_subset("B", ["1"]);
//! mat.define_subset("C", ["2"]);
//! mat.define_subset("D", ["3"]);
//!
//! mat.set_solution_sink(Some(Box::<SolutionCollector>::default()));
//! mat.search(false);
//! ```

pub mod dlx;
mod parse;

pub use dlx::{Matrix, SolutionCollector, SolutionSink};
pub use parse::DEFAULT_SEPARATORS;
