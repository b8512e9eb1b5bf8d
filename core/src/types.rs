use ndarray::Array2;

/// Single coordinate axis used for the grid side length and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Which cells count as adjacent to a given cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Neighborhood {
    /// All 8 surrounding cells, used for mine counts.
    Surrounding,
    /// Up, down, left and right only, used for flood-fill propagation.
    Orthogonal,
}

impl Neighborhood {
    const fn displacements(self) -> &'static [(i8, i8)] {
        match self {
            Self::Surrounding => &SURROUNDING,
            Self::Orthogonal => &ORTHOGONAL,
        }
    }
}

const SURROUNDING: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2, neighborhood: Neighborhood) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2, neighborhood: Neighborhood) -> NeighborIter {
        let (rows, cols) = self.dim();
        let bounds = (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(cols).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, bounds, neighborhood)
    }
}

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (rows, cols) = bounds;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= rows {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= cols {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(i8, i8)],
    index: usize,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2, neighborhood: Neighborhood) -> Self {
        Self {
            center,
            bounds,
            displacements: neighborhood.displacements(),
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let &delta = self.displacements.get(self.index)?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(center: Coord2, bounds: Coord2, neighborhood: Neighborhood) -> Vec<Coord2> {
        NeighborIter::new(center, bounds, neighborhood).collect()
    }

    #[test]
    fn corner_has_three_surrounding_neighbors() {
        assert_eq!(
            collect((0, 0), (3, 3), Neighborhood::Surrounding),
            vec![(0, 1), (1, 0), (1, 1)]
        );
    }

    #[test]
    fn center_has_eight_surrounding_neighbors() {
        assert_eq!(collect((1, 1), (3, 3), Neighborhood::Surrounding).len(), 8);
    }

    #[test]
    fn orthogonal_skips_diagonals_and_out_of_bounds() {
        assert_eq!(
            collect((0, 2), (3, 3), Neighborhood::Orthogonal),
            vec![(1, 2), (0, 1)]
        );
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        assert!(collect((0, 0), (1, 1), Neighborhood::Surrounding).is_empty());
    }
}
