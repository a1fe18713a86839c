//! The toroidal matrix: universe/subset construction, cover/uncover, pre-seeding, and
//! the Algorithm X search.

use indexmap::IndexMap;

use super::callback::SolutionSink;
use super::node::{NodeId, Pool};
use crate::parse::tokenize;

/// A sparse 0/1 incidence matrix between a universe of named elements and a family of
/// named subsets, represented as Knuth's toroidal doubly-linked structure.
///
/// Build it by listing the universe's elements, then define subsets over them. Once
/// built, [`Matrix::search`] finds every selection of subsets whose disjoint union is
/// exactly the universe.
///
/// A matrix owns every node it allocates and every name it was given; cover and uncover
/// never allocate or free a node; they only rewrite link fields.
pub struct Matrix {
    pool: Pool,
    /// Element name for column `1..=col_count`; index `0` is unused.
    col_names: Vec<String>,
    /// Live row count for column `1..=col_count`; index `0` is unused.
    col_sizes: Vec<usize>,
    /// Owning subset name for a row-cell node id; empty for the root and headers.
    row_names: Vec<String>,
    name_to_col: IndexMap<String, usize>,
    col_count: usize,
    subset_count: usize,
    required_names: Vec<String>,
    /// Column numbers covered by pre-seeding, in the order they were covered. Unwound in
    /// reverse (LIFO) when the matrix is dropped.
    uncover_anchors: Vec<usize>,
    sink: Option<Box<dyn SolutionSink>>,
    trace: bool,
}

impl Matrix {
    /// Builds a universe from an ordered list of element names.
    ///
    /// A name already present is skipped (traced as a warning) rather than creating a
    /// second column; empty names are skipped silently.
    pub fn from_elements<I, S>(elements: I) -> Matrix
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mat = Matrix {
            pool: Pool::new(),
            col_names: vec![String::new()],
            col_sizes: vec![0],
            row_names: vec![String::new()],
            name_to_col: IndexMap::new(),
            col_count: 0,
            subset_count: 0,
            required_names: Vec::new(),
            uncover_anchors: Vec::new(),
            sink: None,
            trace: false,
        };

        for name in elements {
            let name = name.as_ref();
            if name.is_empty() {
                continue;
            }
            if mat.name_to_col.contains_key(name) {
                log::warn!("element {:?} already exists in universe; not added again", name);
                continue;
            }

            mat.col_count += 1;
            let col = mat.col_count;
            let header = mat.pool.alloc(col);
            debug_assert_eq!(header, col, "column header ids must equal column numbers");

            let tail = mat.pool.nodes[Pool::ROOT].left;
            mat.pool.insert_right(tail, header);

            mat.col_names.push(name.to_string());
            mat.col_sizes.push(0);
            mat.row_names.push(String::new());
            mat.name_to_col.insert(name.to_string(), col);
        }

        mat
    }

    /// Builds a universe from a delimited string (e.g. `"A,B,C"`).
    ///
    /// `separators` is a set of bytes that delimit tokens; empty tokens are skipped.
    pub fn from_delimited(elements: &str, separators: &str) -> Matrix {
        let tokens: Vec<&str> = tokenize(elements, separators).collect();
        Matrix::from_elements(tokens)
    }

    /// Adds a subset (a row) to the matrix.
    ///
    /// Unknown element names are skipped with a trace warning; duplicate element names
    /// within the subset are skipped. A subset with no resolved elements contributes
    /// nothing and returns `false`.
    pub fn define_subset<I, S>(&mut self, subset_name: &str, elements: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen_cols: Vec<usize> = Vec::new();
        let mut first_in_row: Option<NodeId> = None;
        let mut last_in_row: Option<NodeId> = None;

        for name in elements {
            let name = name.as_ref();
            if name.is_empty() {
                continue;
            }
            let col = match self.name_to_col.get(name) {
                Some(&col) => col,
                None => {
                    log::warn!(
                        "unknown element {:?} in subset {:?}; skipped",
                        name,
                        subset_name
                    );
                    continue;
                }
            };
            if seen_cols.contains(&col) {
                log::warn!(
                    "element {:?} already included in subset {:?}; skipped",
                    name,
                    subset_name
                );
                continue;
            }
            seen_cols.push(col);

            let node = self.pool.alloc(col);
            debug_assert_eq!(node, self.row_names.len(), "node ids and row_names must stay in lockstep");
            self.row_names.push(subset_name.to_string());

            let header_up = self.pool.nodes[col].up;
            self.pool.insert_down(header_up, node);
            self.col_sizes[col] += 1;

            match last_in_row {
                None => first_in_row = Some(node),
                Some(last) => self.pool.insert_right(last, node),
            }
            last_in_row = Some(node);
        }

        if first_in_row.is_some() {
            self.subset_count += 1;
            true
        } else {
            false
        }
    }

    /// Adds a subset from a delimited string of element names.
    pub fn define_subset_delimited(
        &mut self,
        subset_name: &str,
        elements: &str,
        separators: &str,
    ) -> bool {
        let tokens: Vec<&str> = tokenize(elements, separators).collect();
        self.define_subset(subset_name, tokens)
    }

    /// Number of subsets successfully defined so far.
    pub fn subset_count(&self) -> usize {
        self.subset_count
    }

    /// Names of the universe's elements, in insertion order.
    pub fn elements(&self) -> &[String] {
        &self.col_names[1..]
    }

    /// Whether the matrix is fully covered, i.e. the root's horizontal list is empty.
    pub fn is_empty(&self) -> bool {
        self.pool.nodes[Pool::ROOT].right == Pool::ROOT
    }

    /// Enables or disables per-matrix diagnostic tracing to stderr.
    pub fn set_trace(&mut self, on: bool) {
        self.trace = on;
    }

    pub fn is_trace(&self) -> bool {
        self.trace
    }

    /// Registers a solution sink, returning whichever sink was previously registered.
    /// Passing `None` disables reporting.
    pub fn set_solution_sink(
        &mut self,
        sink: Option<Box<dyn SolutionSink>>,
    ) -> Option<Box<dyn SolutionSink>> {
        std::mem::replace(&mut self.sink, sink)
    }

    /// Forces a named subset into every solution found by a subsequent [`Matrix::search`].
    ///
    /// Among all rows named `subset_name`, the first one reachable by scanning columns in
    /// universe-insertion order and, within each column, rows in insertion order is
    /// chosen. Returns `false` if no such row exists — either the name is unknown, or
    /// every row of that name has already had one of its columns covered by a previous
    /// requirement.
    pub fn require_in_solution(&mut self, subset_name: &str) -> bool {
        let root = Pool::ROOT;
        let mut col = self.pool.nodes[root].right;

        while col != root {
            let mut r = self.pool.nodes[col].down;
            while r != col {
                if self.row_names[r] == subset_name {
                    let mut anchors = Vec::new();
                    let mut j = r;
                    loop {
                        let c = self.pool.nodes[j].col;
                        self.cover(c);
                        anchors.push(c);
                        j = self.pool.nodes[j].right;
                        if j == r {
                            break;
                        }
                    }
                    if self.trace {
                        log::trace!("subset {:?} required in solution", subset_name);
                    }
                    self.uncover_anchors.extend(anchors);
                    self.required_names.push(subset_name.to_string());
                    return true;
                }
                r = self.pool.nodes[r].down;
            }
            col = self.pool.nodes[col].right;
        }

        if self.trace {
            log::trace!(
                "subset {:?} unknown or incompatible; not required in solution",
                subset_name
            );
        }
        false
    }

    /// Runs Algorithm X, reporting every exact cover found through the registered sink.
    /// If `one_only` is set, search stops after the first solution.
    ///
    /// Returns the number of solutions found. On return the matrix is structurally
    /// identical to its pre-call state (modulo any pre-seeding already in effect).
    pub fn search(&mut self, one_only: bool) -> u64 {
        if self.trace {
            log::trace!(
                "searching for {} exact cover solution{}",
                if one_only { "the first" } else { "all" },
                if one_only { "" } else { "s" }
            );
        }

        let mut chosen: Vec<NodeId> = Vec::with_capacity(self.col_count);
        let count = self.search_step(&mut chosen, one_only);

        if count == 0 {
            self.invoke_sink(&[]);
        }
        if self.trace {
            log::trace!("{} solution{} found", count, if count == 1 { "" } else { "s" });
        }
        count
    }

    fn search_step(&mut self, chosen: &mut Vec<NodeId>, one_only: bool) -> u64 {
        if self.is_empty() {
            let names = self.solution_names(chosen);
            self.invoke_sink(&names);
            return 1;
        }

        let col = self.choose_column();
        if self.col_sizes[col] == 0 {
            return 0;
        }

        self.cover(col);
        let mut found = 0u64;
        let mut r = self.pool.nodes[col].down;
        while r != col {
            chosen.push(r);

            let mut j = self.pool.nodes[r].right;
            while j != r {
                self.cover(self.pool.nodes[j].col);
                j = self.pool.nodes[j].right;
            }

            found += self.search_step(chosen, one_only);

            let mut j = self.pool.nodes[r].left;
            while j != r {
                self.uncover(self.pool.nodes[j].col);
                j = self.pool.nodes[j].left;
            }
            chosen.pop();

            if one_only && found > 0 {
                break;
            }
            r = self.pool.nodes[r].down;
        }
        self.uncover(col);

        found
    }

    fn solution_names(&self, chosen: &[NodeId]) -> Vec<String> {
        let mut names = self.required_names.clone();
        names.extend(chosen.iter().map(|&r| self.row_names[r].clone()));
        names
    }

    fn invoke_sink(&mut self, names: &[String]) {
        if let Some(mut sink) = self.sink.take() {
            sink.on_solution(self, names);
            self.sink = Some(sink);
        } else if self.trace {
            if names.is_empty() {
                log::trace!("no exact cover solution found");
            } else {
                log::trace!("solution: {}", names.join(", "));
            }
        }
    }

    /// Minimum-remaining-values heuristic: the live column with the smallest size, ties
    /// broken by first occurrence in the scan.
    fn choose_column(&self) -> usize {
        let root = Pool::ROOT;
        let mut best = self.pool.nodes[root].right;
        debug_assert_ne!(best, root, "choose_column called on an already-empty matrix");

        let mut best_size = self.col_sizes[best];
        let mut j = self.pool.nodes[best].right;
        while j != root {
            if self.col_sizes[j] < best_size {
                best = j;
                best_size = self.col_sizes[j];
            }
            j = self.pool.nodes[j].right;
        }
        best
    }

    /// Removes column `col` from the root's horizontal list, then for every row
    /// intersecting it, unlinks every other cell of that row from its own column.
    fn cover(&mut self, col: usize) {
        self.pool.unlink_horizontal(col);

        let mut i = self.pool.nodes[col].down;
        while i != col {
            let mut j = self.pool.nodes[i].right;
            while j != i {
                self.pool.unlink_vertical(j);
                self.col_sizes[self.pool.nodes[j].col] -= 1;
                j = self.pool.nodes[j].right;
            }
            i = self.pool.nodes[i].down;
        }
    }

    /// The exact mirror of [`Matrix::cover`]: restores every cell removed by the matching
    /// cover, in the reverse traversal order, then relinks `col` itself.
    fn uncover(&mut self, col: usize) {
        let mut i = self.pool.nodes[col].up;
        while i != col {
            let mut j = self.pool.nodes[i].left;
            while j != i {
                self.col_sizes[self.pool.nodes[j].col] += 1;
                self.pool.relink_vertical(j);
                j = self.pool.nodes[j].left;
            }
            i = self.pool.nodes[i].up;
        }

        self.pool.relink_horizontal(col);
    }

    /// Consumes the matrix, releasing its resources.
    ///
    /// Equivalent to simply dropping the matrix; provided so callers that think in terms
    /// of an explicit lifecycle (build, search, destroy) have a name for the last step.
    pub fn destroy(self) {}
}

impl Drop for Matrix {
    fn drop(&mut self) {
        // Unwind pre-seeding covers in strict LIFO order, mirroring their original cover
        // order, so the matrix is logically restored to its post-build state before its
        // nodes are freed.
        for &col in self.uncover_anchors.clone().iter().rev() {
            self.uncover(col);
        }
        self.uncover_anchors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlx::SolutionCollector;

    fn knuth_instance() -> Matrix {
        let mut mat = Matrix::from_elements(["A", "B", "C", "D", "E", "F", "G"]);
        mat.define_subset("L1", ["C", "E", "F"]);
        mat.define_subset("L2", ["A", "D", "G"]);
        mat.define_subset("L3", ["B", "C", "F"]);
        mat.define_subset("L4", ["A", "D"]);
        mat.define_subset("L5", ["B", "G"]);
        mat.define_subset("L6", ["D", "E", "G"]);
        mat
    }

    #[test]
    fn solution_collector_gathers_every_solution() {
        let mut mat = knuth_instance();
        mat.set_solution_sink(Some(Box::<SolutionCollector>::default()));
        let count = mat.search(false);
        assert_eq!(count, 1);
    }

    #[test]
    fn scenario_a_knuth_instance_has_one_solution() {
        let mut mat = knuth_instance();
        let solutions = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink_solutions = solutions.clone();
        mat.set_solution_sink(Some(Box::new(move |_: &Matrix, names: &[String]| {
            sink_solutions.borrow_mut().push(names.to_vec());
        })));
        let count = mat.search(false);
        assert_eq!(count, 1);

        let mut sol = solutions.borrow()[0].clone();
        sol.sort();
        assert_eq!(sol, vec!["L1", "L4", "L5"]);
    }

    #[test]
    fn scenario_d_infeasible_instance_has_no_solution() {
        let mut mat = Matrix::from_elements(["A", "B"]);
        mat.define_subset("La", ["A"]);

        let count = mat.search(false);
        assert_eq!(count, 0);
    }

    #[test]
    fn scenario_e_preseeded_full_cover() {
        let mut mat = Matrix::from_elements(["A", "B"]);
        mat.define_subset("La", ["A"]);
        mat.define_subset("Lb", ["B"]);

        assert!(mat.require_in_solution("La"));
        assert!(mat.require_in_solution("Lb"));

        let collected = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let collected2 = collected.clone();
        mat.set_solution_sink(Some(Box::new(move |_: &Matrix, names: &[String]| {
            collected2.borrow_mut().push(names.to_vec());
        })));

        let count = mat.search(false);
        assert_eq!(count, 1);
        assert_eq!(collected.borrow()[0], vec!["La".to_string(), "Lb".to_string()]);
    }

    #[test]
    fn scenario_f_preseeded_conflict_falls_back() {
        let mut mat = Matrix::from_elements(["A", "B"]);
        mat.define_subset("La", ["A"]);
        mat.define_subset("Lb", ["B"]);
        mat.define_subset("L", ["A", "B"]);

        assert!(mat.require_in_solution("La"));
        assert!(!mat.require_in_solution("L"));

        let count = mat.search(false);
        assert_eq!(count, 1);
    }

    #[test]
    fn duplicate_element_name_is_not_added_twice() {
        let mat = Matrix::from_elements(["A", "A", "B"]);
        assert_eq!(mat.col_count, 2);
    }

    #[test]
    fn subset_with_no_resolved_elements_is_rejected() {
        let mut mat = Matrix::from_elements(["A", "B"]);
        assert!(!mat.define_subset("empty", Vec::<&str>::new()));
        assert!(!mat.define_subset("unknown-only", ["Z"]));
        assert_eq!(mat.subset_count(), 0);
    }

    #[test]
    fn cover_uncover_round_trip_restores_pool_bit_for_bit() {
        let mut mat = knuth_instance();
        let before = mat.pool.nodes.clone();
        let before_sizes = mat.col_sizes.clone();

        mat.cover(3); // column C
        assert_ne!(mat.pool.nodes, before);

        mat.uncover(3);
        assert_eq!(mat.pool.nodes, before);
        assert_eq!(mat.col_sizes, before_sizes);
    }

    #[test]
    fn nested_cover_uncover_round_trips_restore_state() {
        let mut mat = knuth_instance();
        let before = mat.pool.nodes.clone();
        let before_sizes = mat.col_sizes.clone();

        mat.cover(1);
        mat.cover(2);
        mat.cover(3);
        mat.uncover(3);
        mat.uncover(2);
        mat.uncover(1);

        assert_eq!(mat.pool.nodes, before);
        assert_eq!(mat.col_sizes, before_sizes);
    }

    #[test]
    fn search_restores_matrix_after_returning() {
        let mut mat = knuth_instance();
        let before = mat.pool.nodes.clone();
        let before_sizes = mat.col_sizes.clone();

        mat.search(false);

        assert_eq!(mat.pool.nodes, before);
        assert_eq!(mat.col_sizes, before_sizes);
    }

    #[test]
    fn one_only_stops_after_first_solution() {
        // Universe with two disjoint single-element subsets covering it two ways each
        // isn't quite right for a >1-solution case; build one with two distinct covers.
        let mut mat = Matrix::from_elements(["A", "B"]);
        mat.define_subset("X", ["A", "B"]);
        mat.define_subset("Y", ["A"]);
        mat.define_subset("Z", ["B"]);

        let count = mat.search(true);
        assert_eq!(count, 1);
    }

    #[test]
    fn search_is_deterministic_across_runs() {
        let mut mat1 = knuth_instance();
        let mut mat2 = knuth_instance();

        let sols1 = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sols1b = sols1.clone();
        mat1.set_solution_sink(Some(Box::new(move |_: &Matrix, n: &[String]| {
            sols1b.borrow_mut().push(n.to_vec());
        })));
        let sols2 = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sols2b = sols2.clone();
        mat2.set_solution_sink(Some(Box::new(move |_: &Matrix, n: &[String]| {
            sols2b.borrow_mut().push(n.to_vec());
        })));

        mat1.search(false);
        mat2.search(false);

        assert_eq!(*sols1.borrow(), *sols2.borrow());
    }

    #[test]
    fn drop_unwinds_preseeded_covers() {
        let mut mat = Matrix::from_elements(["A", "B"]);
        mat.define_subset("La", ["A"]);
        mat.define_subset("Lb", ["B"]);
        assert!(mat.require_in_solution("La"));
        // Dropping must not panic and must unwind the anchor without leaving dangling
        // indices; exercised implicitly at end of scope.
    }
}
