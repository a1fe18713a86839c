//! Pentomino tiling solved as an exact cover problem.
//!
//! A piece constraint per pentomino ("this piece is placed exactly once") plus a
//! cell constraint per open board square ("this square is covered exactly once")
//! gives one column per constraint; every `(piece, orientation, translation)` that
//! fits on the board becomes a subset covering its piece column and the cell
//! columns it occupies. The Y-pentomino's orientation is fixed to break the
//! symmetry of the board, halving the number of equivalent solutions reported.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use exact_cover::Matrix;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Point {
    x: i32,
    y: i32,
}

/// A piece's cells, normalized so the minimum x/y coordinate is zero.
#[derive(Clone, PartialEq, Eq, Debug)]
struct Shape {
    cells: Vec<Point>,
    width: i32,
    height: i32,
}

impl Shape {
    fn from_rows(rows: &[&[u8]]) -> Shape {
        let mut cells = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &b) in row.iter().enumerate() {
                if b == b'#' {
                    cells.push(Point { x: x as i32, y: y as i32 });
                }
            }
        }
        Shape::normalized(cells)
    }

    fn normalized(cells: Vec<Point>) -> Shape {
        let min_x = cells.iter().map(|c| c.x).min().unwrap();
        let min_y = cells.iter().map(|c| c.y).min().unwrap();
        let max_x = cells.iter().map(|c| c.x).max().unwrap();
        let max_y = cells.iter().map(|c| c.y).max().unwrap();
        let mut cells: Vec<Point> =
            cells.iter().map(|c| Point { x: c.x - min_x, y: c.y - min_y }).collect();
        cells.sort_by_key(|c| (c.y, c.x));
        Shape { cells, width: max_x - min_x + 1, height: max_y - min_y + 1 }
    }

    fn rotated(&self) -> Shape {
        let cells = self.cells.iter().map(|c| Point { x: -c.y, y: c.x }).collect();
        Shape::normalized(cells)
    }

    fn reflected(&self) -> Shape {
        let cells = self.cells.iter().map(|c| Point { x: -c.x, y: c.y }).collect();
        Shape::normalized(cells)
    }

    /// All distinct orientations reachable by rotation and reflection.
    fn unique_orientations(&self) -> Vec<Shape> {
        let mut found = Vec::new();
        for base in [self.clone(), self.reflected()] {
            let mut shape = base;
            for _ in 0..4 {
                if !found.contains(&shape) {
                    found.push(shape.clone());
                }
                shape = shape.rotated();
            }
        }
        found
    }

    fn translated(&self, dx: i32, dy: i32) -> Vec<Point> {
        self.cells.iter().map(|c| Point { x: c.x + dx, y: c.y + dy }).collect()
    }
}

struct Board {
    open: Vec<Vec<bool>>,
    width: i32,
    height: i32,
}

impl Board {
    fn from_rows(rows: &[&[u8]]) -> Board {
        let open: Vec<Vec<bool>> = rows.iter().map(|r| r.iter().map(|&b| b == b'.').collect()).collect();
        Board { width: open[0].len() as i32, height: open.len() as i32, open }
    }

    fn fits(&self, cells: &[Point]) -> bool {
        cells.iter().all(|p| {
            p.x >= 0
                && p.x < self.width
                && p.y >= 0
                && p.y < self.height
                && self.open[p.y as usize][p.x as usize]
        })
    }
}

fn cell_name(p: Point) -> String {
    format!("cell_{}_{}", p.x, p.y)
}

/// Builds the exact cover matrix: one piece column per named piece, one cell
/// column per open board square, and one subset per `(piece, orientation,
/// translation)` placement that fits on the board.
fn build_matrix(board: &Board, pieces: &[(&str, Shape, bool)]) -> Matrix {
    let mut columns: Vec<String> = pieces.iter().map(|(name, _, _)| name.to_string()).collect();
    for y in 0..board.height {
        for x in 0..board.width {
            if board.open[y as usize][x as usize] {
                columns.push(cell_name(Point { x, y }));
            }
        }
    }

    let mut mat = Matrix::from_elements(columns);

    for (name, shape, fix_orientation) in pieces {
        let orientations = if *fix_orientation { vec![shape.clone()] } else { shape.unique_orientations() };

        for oriented in &orientations {
            for dy in 0..=(board.height - oriented.height) {
                for dx in 0..=(board.width - oriented.width) {
                    let cells = oriented.translated(dx, dy);
                    if !board.fits(&cells) {
                        continue;
                    }

                    let subset_name = format!("{name}@{dx},{dy}#{}", orientations.iter().position(|o| o == oriented).unwrap());
                    let mut elements = vec![name.to_string()];
                    elements.extend(cells.iter().map(|&p| cell_name(p)));
                    mat.define_subset(&subset_name, elements);
                }
            }
        }
    }

    mat
}

fn print_solution(board: &Board, pieces: &[(&str, Shape, bool)], names: &[String]) {
    let mut grid: Vec<Vec<char>> = board
        .open
        .iter()
        .map(|row| row.iter().map(|&open| if open { ' ' } else { '#' }).collect())
        .collect();

    for subset_name in names {
        let Some(piece_name) = subset_name.split('@').next() else { continue };
        let Some((_, shape, fix_orientation)) = pieces.iter().find(|(n, _, _)| *n == piece_name) else { continue };
        let rest = &subset_name[piece_name.len() + 1..];
        let (coords, orient_idx) = rest.split_once('#').unwrap();
        let (dx, dy) = coords.split_once(',').unwrap();
        let (dx, dy): (i32, i32) = (dx.parse().unwrap(), dy.parse().unwrap());

        let orientations =
            if *fix_orientation { vec![shape.clone()] } else { shape.unique_orientations() };
        let oriented = &orientations[orient_idx.parse::<usize>().unwrap()];

        let mark = piece_name.chars().next().unwrap();
        for p in oriented.translated(dx, dy) {
            grid[p.y as usize][p.x as usize] = mark;
        }
    }

    for row in &grid {
        let line: String = row.iter().collect();
        println!("{line}");
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let board = Board::from_rows(&[
        b"........",
        b"........",
        b"........",
        b"...##...",
        b"...##...",
        b"........",
        b"........",
        b"........",
    ]);

    let pieces: Vec<(&str, Shape, bool)> = vec![
        ("F", Shape::from_rows(&[b".##", b"##.", b".#."]), false),
        ("I", Shape::from_rows(&[b"#####"]), false),
        ("L", Shape::from_rows(&[b"####", b"#..."]), false),
        ("N", Shape::from_rows(&[b".###", b"##.."]), false),
        ("P", Shape::from_rows(&[b"###", b".##"]), false),
        ("T", Shape::from_rows(&[b"###", b".#.", b".#."]), false),
        ("U", Shape::from_rows(&[b"#.#", b"###"]), false),
        ("V", Shape::from_rows(&[b"#..", b"#..", b"###"]), false),
        ("W", Shape::from_rows(&[b"#..", b"##.", b".##"]), false),
        ("X", Shape::from_rows(&[b".#.", b"###", b".#."]), false),
        // Fixed orientation breaks the board's symmetry.
        ("Y", Shape::from_rows(&[b"####", b".#.."]), true),
        ("Z", Shape::from_rows(&[b"##.", b".#.", b".##"]), false),
    ];

    log::info!("building the exact cover matrix");
    let mut mat = build_matrix(&board, &pieces);

    let solutions = Rc::new(RefCell::new(Vec::new()));
    let sink_solutions = solutions.clone();
    mat.set_solution_sink(Some(Box::new(move |_m: &Matrix, names: &[String]| {
        if !names.is_empty() {
            sink_solutions.borrow_mut().push(names.to_vec());
        }
    })));

    log::info!("searching for solutions");
    let start = Instant::now();
    let solution_count = mat.search(false);
    let elapsed = start.elapsed();

    for names in solutions.borrow().iter() {
        print_solution(&board, &pieces, names);
        println!();
    }

    println!("found {solution_count} solutions in {:.3}s", elapsed.as_secs_f64());
}
