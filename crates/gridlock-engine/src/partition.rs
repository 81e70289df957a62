//! Work partitioning of the board interior.
//!
//! [`partition()`] maps `(height, width, slice_count)` to a set of
//! disjoint rectangular [`Slice`]s that together cover every interior
//! cell exactly once. The border ring is never assigned.
//!
//! # Policy
//!
//! 1. Split along the axis with the larger interior extent (ties go to
//!    rows) whenever that extent is at least `slice_count`. Each slice is
//!    a contiguous band spanning the whole interior on the other axis;
//!    band sizes differ by at most one, the leading bands taking the
//!    remainder.
//! 2. If `slice_count` exceeds the interior cell count, the leading
//!    slices take one cell each (row-major) and the rest are empty.
//! 3. Otherwise both extents are smaller than `slice_count`. Leading
//!    slices take single cells row-major until the remaining slices match
//!    the remaining rows, then each takes the rest of one row. Callers
//!    normally avoid this shape with [`needs_serial_fallback()`].

use std::error::Error;
use std::fmt;
use std::ops::Range;

use smallvec::SmallVec;

/// Axis a partition was split along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Bands of whole rows.
    Row,
    /// Bands of whole columns.
    Column,
}

/// A rectangular, possibly empty, region of the interior.
///
/// `rows` and `cols` are half-open ranges in board coordinates. The
/// `axis` records which dimension the partition was split along, so
/// [`start()`](Slice::start) and [`end()`](Slice::end) describe the band
/// along that axis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slice {
    axis: Axis,
    rows: Range<usize>,
    cols: Range<usize>,
}

/// Slice collection returned by [`partition()`].
pub type Slices = SmallVec<[Slice; 8]>;

impl Slice {
    /// Slice covering `rows × cols`.
    pub fn new(axis: Axis, rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { axis, rows, cols }
    }

    /// Band `start..end` along `axis`, spanning the full interior of a
    /// `height × width` board on the other axis.
    pub fn band(axis: Axis, start: usize, end: usize, height: usize, width: usize) -> Self {
        match axis {
            Axis::Row => Self::new(axis, start..end, 1..width - 1),
            Axis::Column => Self::new(axis, 1..height - 1, start..end),
        }
    }

    /// Every interior cell of a `height × width` board.
    pub fn interior(height: usize, width: usize) -> Self {
        Self::band(Axis::Row, 1, height - 1, height, width)
    }

    /// The single cell `(x, y)`.
    pub fn cell(x: usize, y: usize) -> Self {
        Self::new(Axis::Row, y..y + 1, x..x + 1)
    }

    /// A slice with no cells.
    pub fn empty() -> Self {
        Self::new(Axis::Row, 0..0, 0..0)
    }

    /// Split axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// First index along the split axis.
    pub fn start(&self) -> usize {
        self.along().start
    }

    /// One past the last index along the split axis.
    pub fn end(&self) -> usize {
        self.along().end
    }

    /// Width of the band along the split axis.
    pub fn extent(&self) -> usize {
        self.along().len()
    }

    fn along(&self) -> &Range<usize> {
        match self.axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.cols,
        }
    }

    /// Row range.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// Column range.
    pub fn cols(&self) -> Range<usize> {
        self.cols.clone()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// Whether the slice has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `(x, y)` lies in the slice.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.rows.contains(&y) && self.cols.contains(&x)
    }

    /// Cells as `(x, y)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols.clone();
        self.rows
            .clone()
            .flat_map(move |y| cols.clone().map(move |x| (x, y)))
    }
}

/// Errors from [`partition()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionError {
    /// Zero slices were requested.
    NoSlices,
    /// The board has no interior cell.
    NoInterior {
        /// Board height.
        height: usize,
        /// Board width.
        width: usize,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSlices => write!(f, "at least one slice must be requested"),
            Self::NoInterior { height, width } => {
                write!(f, "{width}x{height} board has no interior cells")
            }
        }
    }
}

impl Error for PartitionError {}

/// Whether both interior extents are smaller than `slice_count`.
///
/// Such boards are cheaper to step on one thread than to split.
pub fn needs_serial_fallback(height: usize, width: usize, slice_count: usize) -> bool {
    height.saturating_sub(2) < slice_count && width.saturating_sub(2) < slice_count
}

/// Split the interior of a `height × width` board into `slice_count`
/// disjoint slices covering it exactly.
pub fn partition(height: usize, width: usize, slice_count: usize) -> Result<Slices, PartitionError> {
    if slice_count == 0 {
        return Err(PartitionError::NoSlices);
    }
    if height < 3 || width < 3 {
        return Err(PartitionError::NoInterior { height, width });
    }

    let rows = height - 2;
    let cols = width - 2;
    let (axis, extent) = if rows >= cols {
        (Axis::Row, rows)
    } else {
        (Axis::Column, cols)
    };

    if extent >= slice_count {
        Ok(split_axis(axis, extent, slice_count, height, width))
    } else if slice_count > rows.saturating_mul(cols) {
        Ok(one_cell_each(slice_count, height, width))
    } else {
        Ok(cells_then_rows(slice_count, height, width))
    }
}

fn split_axis(axis: Axis, extent: usize, n: usize, height: usize, width: usize) -> Slices {
    let base = extent / n;
    let remainder = extent % n;
    let mut out = Slices::with_capacity(n);
    let mut start = 1;
    for i in 0..n {
        let len = base + usize::from(i < remainder);
        out.push(Slice::band(axis, start, start + len, height, width));
        start += len;
    }
    out
}

fn one_cell_each(n: usize, height: usize, width: usize) -> Slices {
    let mut out = Slices::with_capacity(n);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            out.push(Slice::cell(x, y));
        }
    }
    let overflow = n - out.len();
    out.extend(std::iter::repeat_with(Slice::empty).take(overflow));
    out
}

// Requires rows < n, cols < n and n <= rows * cols; under those bounds
// the single-cell phase always hands over before the interior runs out.
fn cells_then_rows(n: usize, height: usize, width: usize) -> Slices {
    let rows = height - 2;
    let cols = width - 2;
    let mut out = Slices::with_capacity(n);
    // Interior-relative cursor.
    let mut row = 0;
    let mut col = 0;
    for i in 0..n {
        let slices_left = n - i;
        let rows_left = rows - row;
        if slices_left > rows_left {
            out.push(Slice::cell(col + 1, row + 1));
            col += 1;
            if col == cols {
                col = 0;
                row += 1;
            }
        } else {
            out.push(Slice::new(
                Axis::Row,
                row + 1..row + 2,
                col + 1..width - 1,
            ));
            col = 0;
            row += 1;
        }
    }
    out
}
