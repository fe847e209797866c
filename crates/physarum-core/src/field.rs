//! Pheromone field: a decaying 2D scalar grid at reduced resolution.
//! Each cell covers `cell_size` world units along both axes and holds one
//! trail concentration value.

use crate::vec2::Vec2;
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    ZeroCellSize,
    NotDivisible {
        axis: &'static str,
        extent: u32,
        cell_size: u32,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::ZeroCellSize => write!(f, "cell_size must be positive"),
            GridError::NotDivisible {
                axis,
                extent,
                cell_size,
            } => write!(
                f,
                "world {axis} ({extent}) is not divisible by cell_size ({cell_size})"
            ),
        }
    }
}

impl Error for GridError {}

#[derive(Clone, Debug)]
pub struct Field {
    columns: usize,
    rows: usize,
    cell_size: u32,
    data: Vec<f64>,
}

impl Field {
    /// Build a zero-filled field. Panics if either world dimension is not an
    /// exact multiple of `cell_size`.
    pub fn new(world_width: u32, world_height: u32, cell_size: u32) -> Self {
        Self::try_new(world_width, world_height, cell_size).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(world_width: u32, world_height: u32, cell_size: u32) -> Result<Self, GridError> {
        Self::check_dimensions(world_width, world_height, cell_size)?;
        // One extra cell per axis so that the far world edge rounds into the grid.
        let columns = (world_width / cell_size) as usize + 1;
        let rows = (world_height / cell_size) as usize + 1;
        Ok(Self {
            columns,
            rows,
            cell_size,
            data: vec![0.0; columns * rows],
        })
    }

    pub fn check_dimensions(
        world_width: u32,
        world_height: u32,
        cell_size: u32,
    ) -> Result<(), GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        for (axis, extent) in [("width", world_width), ("height", world_height)] {
            if extent % cell_size != 0 {
                return Err(GridError::NotDivisible {
                    axis,
                    extent,
                    cell_size,
                });
            }
        }
        Ok(())
    }

    /// Multiply every cell by `multiplier`.
    pub fn decay(&mut self, multiplier: f64) {
        for cell in &mut self.data {
            *cell *= multiplier;
        }
    }

    /// Add `amount` to the cell nearest `at`. Points outside the grid are ignored.
    pub fn deposit(&mut self, at: Vec2, amount: f64) {
        if let Some(idx) = self.cell_index(at) {
            self.data[idx] += amount;
        }
    }

    /// Value of the cell nearest `at`, or 0 outside the grid.
    pub fn sample_at_point(&self, at: Vec2) -> f64 {
        self.cell_index(at).map_or(0.0, |idx| self.data[idx])
    }

    /// Mean over the square window of `ceil(radius / cell_size)` cells around
    /// the cell nearest `at`. Cells outside the grid are skipped; an empty
    /// window samples as 0.
    pub fn sample_in_radius(&self, at: Vec2, radius: f64) -> f64 {
        let cell_size = self.cell_size as f64;
        let cx = (at.x / cell_size).round();
        let cy = (at.y / cell_size).round();
        if !cx.is_finite() || !cy.is_finite() {
            return 0.0;
        }
        let reach = (radius / cell_size).ceil().max(0.0) as i64;
        let (cx, cy) = (cx as i64, cy as i64);

        let x_lo = cx.saturating_sub(reach).max(0);
        let x_hi = cx.saturating_add(reach).min(self.columns as i64 - 1);
        let y_lo = cy.saturating_sub(reach).max(0);
        let y_hi = cy.saturating_add(reach).min(self.rows as i64 - 1);
        if x_lo > x_hi || y_lo > y_hi {
            return 0.0;
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        for iy in y_lo..=y_hi {
            let row = iy as usize * self.columns;
            for ix in x_lo..=x_hi {
                sum += self.data[row + ix as usize];
                count += 1;
            }
        }
        sum / count as f64
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Row-major cell values; X selects the column, Y the row.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn value(&self, ix: usize, iy: usize) -> Option<f64> {
        (ix < self.columns && iy < self.rows).then(|| self.data[iy * self.columns + ix])
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    pub fn occupied_cells(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0.0).count()
    }

    /// Grid coordinates of the cell nearest `at`, if it lies on the grid.
    pub fn cell_of(&self, at: Vec2) -> Option<(usize, usize)> {
        let cell_size = self.cell_size as f64;
        let gx = (at.x / cell_size).round();
        let gy = (at.y / cell_size).round();
        // Negated range checks also reject NaN.
        if !(gx >= 0.0 && gx < self.columns as f64) || !(gy >= 0.0 && gy < self.rows as f64) {
            return None;
        }
        Some((gx as usize, gy as usize))
    }

    fn cell_index(&self, at: Vec2) -> Option<usize> {
        self.cell_of(at).map(|(ix, iy)| iy * self.columns + ix)
    }
}
