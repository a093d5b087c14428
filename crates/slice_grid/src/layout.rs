/// Row/column arrangement for a batch of slices, chosen so the grid is
/// as close to square as possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    /// Layout for `count` cells: `rows = ceil(sqrt(count))`,
    /// `cols = ceil(count / rows)`.
    pub fn for_count(count: usize) -> Self {
        if count == 0 {
            return GridLayout { rows: 0, cols: 0 };
        }
        let rows = (count as f64).sqrt().ceil() as usize;
        let cols = count.div_ceil(rows);
        GridLayout { rows, cols }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major position of a cell index.
    pub fn position(&self, cell: usize) -> (usize, usize) {
        (cell / self.cols, cell % self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_square_shapes() {
        assert_eq!(GridLayout::for_count(1), GridLayout { rows: 1, cols: 1 });
        assert_eq!(GridLayout::for_count(2), GridLayout { rows: 2, cols: 1 });
        assert_eq!(GridLayout::for_count(3), GridLayout { rows: 2, cols: 2 });
        assert_eq!(GridLayout::for_count(4), GridLayout { rows: 2, cols: 2 });
        assert_eq!(GridLayout::for_count(5), GridLayout { rows: 3, cols: 2 });
        assert_eq!(GridLayout::for_count(7), GridLayout { rows: 3, cols: 3 });
        assert_eq!(GridLayout::for_count(12), GridLayout { rows: 4, cols: 3 });
    }

    #[test]
    fn grid_always_covers_count() {
        for count in 1..=64 {
            let layout = GridLayout::for_count(count);
            assert_eq!(layout.rows, (count as f64).sqrt().ceil() as usize);
            assert_eq!(layout.cols, count.div_ceil(layout.rows));
            assert!(layout.cell_count() >= count, "count {count}: {layout:?}");
        }
    }

    #[test]
    fn zero_count_has_no_cells() {
        assert_eq!(GridLayout::for_count(0).cell_count(), 0);
    }

    #[test]
    fn positions_are_row_major() {
        let layout = GridLayout::for_count(5);
        assert_eq!(layout.position(0), (0, 0));
        assert_eq!(layout.position(1), (0, 1));
        assert_eq!(layout.position(2), (1, 0));
        assert_eq!(layout.position(5), (2, 1));
    }
}
