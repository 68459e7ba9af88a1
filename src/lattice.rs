//! ═══════════════════════════════════════════════════════════════════════════════
//! LATTICE — Volumetric Diffusion over a 3×3×3 Node Grid
//! ═══════════════════════════════════════════════════════════════════════════════
//!
//! 27 nodes, one per (i,j,k) in {0,1,2}³, coupled to their von Neumann
//! neighbors. Each step injects an external signal (center node at full
//! strength, periphery attenuated), runs one flux sweep, and aggregates
//! the node states into a single output vector.
//!
//! Adjacency is precomputed once as index lists into the node array, so
//! the graph is cycle-free from an ownership standpoint and never mutated
//! after construction.
//! ═══════════════════════════════════════════════════════════════════════════════

use rand::Rng;

use crate::config::{LatticeConfig, SweepMode};
use crate::error::{ManifoldError, ManifoldResult};
use crate::state::StateVector;

/// Nodes per axis
pub const GRID_SIDE: usize = 3;

/// Total node count
pub const GRID_VOLUME: usize = GRID_SIDE * GRID_SIDE * GRID_SIDE;

/// Grid position of the distinguished injection node
pub const CENTER: (usize, usize, usize) = (1, 1, 1);

// ═══════════════════════════════════════════════════════════════════════════════
// NODE
// ═══════════════════════════════════════════════════════════════════════════════

/// One lattice cell: a fixed grid position and a mutable state vector
#[derive(Debug, Clone)]
pub struct Node {
    position: (usize, usize, usize),
    state: StateVector,
}

impl Node {
    pub fn position(&self) -> (usize, usize, usize) {
        self.position
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LATTICE
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed 3×3×3 diffusion grid
#[derive(Debug, Clone)]
pub struct Lattice {
    dim: usize,
    config: LatticeConfig,
    nodes: Vec<Node>,
    /// neighbors[idx] lists the flat indices adjacent to idx; symmetric by
    /// construction and never mutated after `new`
    neighbors: Vec<Vec<usize>>,
}

/// Flat index for grid position (i,j,k)
pub fn node_index(i: usize, j: usize, k: usize) -> usize {
    i * GRID_SIDE * GRID_SIDE + j * GRID_SIDE + k
}

/// Grid position for a flat index
pub fn position_of(idx: usize) -> (usize, usize, usize) {
    (
        idx / (GRID_SIDE * GRID_SIDE),
        (idx / GRID_SIDE) % GRID_SIDE,
        idx % GRID_SIDE,
    )
}

impl Lattice {
    /// Build the grid with node states drawn uniformly from
    /// [-init_spread, init_spread] and full coherence.
    pub fn new(dim: usize, config: LatticeConfig, rng: &mut impl Rng) -> Self {
        let spread = config.init_spread;
        let nodes: Vec<Node> = (0..GRID_VOLUME)
            .map(|idx| {
                let values = if spread > 0.0 {
                    (0..dim).map(|_| rng.gen_range(-spread..spread)).collect()
                } else {
                    vec![0.0; dim]
                };
                Node {
                    position: position_of(idx),
                    state: StateVector::new(values),
                }
            })
            .collect();

        let neighbors = (0..GRID_VOLUME).map(Self::neighbors_of).collect();

        Self {
            dim,
            config,
            nodes,
            neighbors,
        }
    }

    /// Von Neumann neighbors: one axis-aligned unit step, in range on all axes
    fn neighbors_of(idx: usize) -> Vec<usize> {
        let (i, j, k) = position_of(idx);
        let mut out = Vec::with_capacity(6);
        let shifts: [(isize, isize, isize); 6] = [
            (-1, 0, 0),
            (1, 0, 0),
            (0, -1, 0),
            (0, 1, 0),
            (0, 0, -1),
            (0, 0, 1),
        ];
        for (di, dj, dk) in shifts {
            let ni = i as isize + di;
            let nj = j as isize + dj;
            let nk = k as isize + dk;
            let side = GRID_SIDE as isize;
            if (0..side).contains(&ni) && (0..side).contains(&nj) && (0..side).contains(&nk) {
                out.push(node_index(ni as usize, nj as usize, nk as usize));
            }
        }
        out
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn neighbor_indices(&self, idx: usize) -> &[usize] {
        &self.neighbors[idx]
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Injection
    // ───────────────────────────────────────────────────────────────────────────

    /// Distribute an external signal across the grid: the center node
    /// receives the full vector, every other node receives it scaled by
    /// `ambient_gain`.
    pub fn inject(&mut self, input: &StateVector) -> ManifoldResult<()> {
        if input.len() != self.dim {
            return Err(ManifoldError::Shape {
                expected: self.dim,
                actual: input.len(),
            });
        }
        let center = node_index(CENTER.0, CENTER.1, CENTER.2);
        let ambient = input.scaled(self.config.ambient_gain);
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            let contribution = if idx == center { input } else { &ambient };
            // dimensions already checked against self.dim
            node.state.add_assign_checked(contribution)?;
        }
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Diffusion
    // ───────────────────────────────────────────────────────────────────────────

    /// Flux vector for one node against the current node states:
    /// flux[d] = Σ over neighbors of (neighbor[d] − self[d])
    fn flux_for(&self, idx: usize) -> Vec<f64> {
        let own = self.nodes[idx].state.values();
        let mut flux = vec![0.0; self.dim];
        for &n in &self.neighbors[idx] {
            let other = self.nodes[n].state.values();
            for d in 0..self.dim {
                flux[d] += other[d] - own[d];
            }
        }
        flux
    }

    /// One flux sweep over all nodes.
    ///
    /// InPlace: nodes update in flat index order, so a node later in the
    /// order reads neighbors already updated this pass. Buffered: every
    /// flux is computed against the pass's starting state. Node coherence
    /// is untouched either way.
    pub fn diffuse(&mut self) {
        let rate = self.config.coupling / self.config.tau * self.config.dt;
        match self.config.sweep {
            SweepMode::InPlace => {
                for idx in 0..GRID_VOLUME {
                    let flux = self.flux_for(idx);
                    let state = self.nodes[idx].state.values_mut();
                    for d in 0..flux.len() {
                        state[d] += flux[d] * rate;
                    }
                }
            }
            SweepMode::Buffered => {
                let fluxes: Vec<Vec<f64>> =
                    (0..GRID_VOLUME).map(|idx| self.flux_for(idx)).collect();
                for (idx, flux) in fluxes.iter().enumerate() {
                    let state = self.nodes[idx].state.values_mut();
                    for d in 0..flux.len() {
                        state[d] += flux[d] * rate;
                    }
                }
            }
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Aggregation
    // ───────────────────────────────────────────────────────────────────────────

    /// Inject, run one sweep, and return the elementwise average of all
    /// node states. The output's coherence is the average node coherence
    /// (grid coherence); diffusion never rewrites it.
    pub fn process_step(&mut self, input: &StateVector) -> ManifoldResult<StateVector> {
        self.inject(input)?;
        self.diffuse();

        let mut total = vec![0.0; self.dim];
        let mut total_coherence = 0.0;
        for node in &self.nodes {
            total_coherence += node.state.coherence();
            for (d, v) in node.state.values().iter().enumerate() {
                total[d] += v;
            }
        }
        let n = GRID_VOLUME as f64;
        for v in &mut total {
            *v /= n;
        }
        tracing::debug!(grid_coherence = total_coherence / n, "lattice sweep");
        Ok(StateVector::with_coherence(total, total_coherence / n))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
