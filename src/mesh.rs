use bytemuck::{Pod, Zeroable};
use itertools::iproduct;
use log::debug;
use nalgebra::Vector3;
use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

/// Default number of grid columns. Much denser than the 640 sensor columns.
pub const DEFAULT_X_RES: usize = 1280;
/// Default number of grid rows.
pub const DEFAULT_Y_RES: usize = 1024;

/// Interleaved vertex layout for uploading the grid into a vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct GridVertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
}

/// A static lattice of points with texture coordinates, drawn as point topology.
///
/// Vertices are laid out x-major: the vertex of cell `(x, y)` is at index
/// `x * y_res + y`. The geometry never changes after construction, only the colors
/// sampled for each vertex do.
#[derive(Clone, Debug)]
pub struct MeshGrid {
    positions: Array2<f32>,
    texcoords: Array2<f32>,
    indices: Vec<u32>,
    x_res: usize,
    y_res: usize,
}

impl MeshGrid {
    /// Builds the grid.
    ///
    /// # Arguments
    ///
    /// * `x_res` - Number of columns, at least 2.
    /// * `y_res` - Number of rows, at least 2.
    ///
    /// # Returns
    ///
    /// * The grid, or `InvalidParameter` for degenerate or too large resolutions.
    pub fn new(x_res: usize, y_res: usize) -> Result<Self> {
        if x_res < 2 || y_res < 2 {
            return Err(Error::invalid_parameter(format!(
                "mesh grid resolution must be at least 2x2, got {x_res}x{y_res}"
            )));
        }
        let num_vertices = x_res
            .checked_mul(y_res)
            .filter(|n| *n <= u32::MAX as usize)
            .ok_or_else(|| {
                Error::invalid_parameter(format!(
                    "mesh grid resolution {x_res}x{y_res} overflows 32-bit indices"
                ))
            })?;

        let mut positions = Array2::<f32>::zeros((num_vertices, 3));
        let mut texcoords = Array2::<f32>::zeros((num_vertices, 2));
        let mut indices = Vec::with_capacity(num_vertices);

        let x_last = (x_res - 1) as f32;
        let y_last = (y_res - 1) as f32;
        for (x, y) in iproduct!(0..x_res, 0..y_res) {
            let index = x * y_res + y;
            indices.push(index as u32);

            let x_per = x as f32 / x_last;
            let y_per = y as f32 / y_last;

            positions[(index, 0)] = (x_per * 2.0 - 1.0) * x_res as f32;
            positions[(index, 1)] = (y_per * 2.0 - 1.0) * y_res as f32;
            texcoords[(index, 0)] = x_per;
            texcoords[(index, 1)] = y_per;
        }

        debug!("Built {x_res}x{y_res} point grid with {num_vertices} vertices");
        Ok(Self {
            positions,
            texcoords,
            indices,
            x_res,
            y_res,
        })
    }

    /// Grid resolution as `(x_res, y_res)`.
    pub fn resolution(&self) -> (usize, usize) {
        (self.x_res, self.y_res)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex positions, shape `(N, 3)`.
    pub fn positions(&self) -> ArrayView2<f32> {
        self.positions.view()
    }

    /// Texture coordinates, shape `(N, 2)`.
    pub fn texcoords(&self) -> ArrayView2<f32> {
        self.texcoords.view()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn position(&self, index: usize) -> Vector3<f32> {
        Vector3::new(
            self.positions[(index, 0)],
            self.positions[(index, 1)],
            self.positions[(index, 2)],
        )
    }

    pub fn texcoord(&self, index: usize) -> (f32, f32) {
        (self.texcoords[(index, 0)], self.texcoords[(index, 1)])
    }

    /// Positions and texture coordinates interleaved, ready for a vertex buffer.
    pub fn vertices(&self) -> Vec<GridVertex> {
        (0..self.len())
            .map(|i| GridVertex {
                position: [
                    self.positions[(i, 0)],
                    self.positions[(i, 1)],
                    self.positions[(i, 2)],
                ],
                texcoord: [self.texcoords[(i, 0)], self.texcoords[(i, 1)]],
            })
            .collect()
    }

    /// The index list as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
