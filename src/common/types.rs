//! Common types used throughout kinorrt

use nalgebra::{DMatrix, DVector};

use crate::common::error::{PlannerError, PlannerResult};

/// A state reached at a specific time from a specific parent via a
/// specific control input.
///
/// Nodes live in an arena ([`Tree`]) and refer to their parent by index,
/// so the tree stays acyclic and can be cleared in one shot.
#[derive(Debug, Clone)]
pub struct Node {
    /// Coordinates in the state space
    pub x: DVector<f64>,
    /// Control input used to arrive here (None for the root)
    pub u: Option<DVector<f64>>,
    /// Arrival time
    pub t: f64,
    /// Index of the parent node in the tree (None for the root)
    pub parent: Option<usize>,
}

impl Node {
    pub fn root(x: DVector<f64>) -> Self {
        Node { x, u: None, t: 0.0, parent: None }
    }

    pub fn new(x: DVector<f64>, u: DVector<f64>, t: f64, parent: usize) -> Self {
        Node { x, u: Some(u), t, parent: Some(parent) }
    }

    /// Euclidean distance from this node's state to another state
    pub fn distance_to(&self, x_other: &DVector<f64>) -> f64 {
        (&self.x - x_other).norm()
    }
}

/// Arena of explored nodes, insertion-order preserved.
///
/// The first element is always the start node. Nodes are append-only during
/// growth; `reset` is the only batch-clear operation and reinserts a fresh
/// root with the original start coordinates.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    start: DVector<f64>,
}

impl Tree {
    pub fn new(start: DVector<f64>) -> Self {
        let root = Node::root(start.clone());
        Tree { nodes: vec![root], start }
    }

    /// Append a node, returning its index
    pub fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Discard all nodes and reinsert a fresh start node
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::root(self.start.clone()));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn start_state(&self) -> &DVector<f64> {
        &self.start
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

/// Serialized form of a solution: `[x(n x L), u(m x L), t(L), dx(n x L)]`
/// with matrices stored row-wise.
pub type SolutionArrays = (Vec<Vec<f64>>, Vec<Vec<f64>>, Vec<f64>, Vec<Vec<f64>>);

/// A planned trajectory, ordered forward in time from start to goal.
///
/// Columns index path samples; `x` and `dx` have one row per state
/// dimension, `u` one row per control dimension.
#[derive(Debug, Clone)]
pub struct Solution {
    /// State sequence (n x L)
    pub x: DMatrix<f64>,
    /// Control sequence (m x L)
    pub u: DMatrix<f64>,
    /// Time sequence (L)
    pub t: DVector<f64>,
    /// State derivative sequence (n x L)
    pub dx: DMatrix<f64>,
    /// Time of arrival at the goal, `max(t)`
    pub time_to_goal: f64,
}

impl Solution {
    /// Assemble a solution from its sequences, checking shape coherence.
    pub fn from_parts(
        x: DMatrix<f64>,
        u: DMatrix<f64>,
        t: DVector<f64>,
        dx: DMatrix<f64>,
    ) -> PlannerResult<Self> {
        let length = t.len();
        if length == 0 {
            return Err(PlannerError::InvalidParameter(
                "solution must contain at least one sample".to_string(),
            ));
        }
        if x.ncols() != length || u.ncols() != length || dx.ncols() != length {
            return Err(PlannerError::InvalidParameter(format!(
                "inconsistent solution lengths: x={}, u={}, t={}, dx={}",
                x.ncols(),
                u.ncols(),
                length,
                dx.ncols()
            )));
        }
        if dx.nrows() != x.nrows() {
            return Err(PlannerError::InvalidParameter(format!(
                "state and derivative dimensions differ: {} vs {}",
                x.nrows(),
                dx.nrows()
            )));
        }
        let time_to_goal = t.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Ok(Solution { x, u, t, dx, time_to_goal })
    }

    /// Number of path samples
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.len() == 0
    }

    /// State dimension
    pub fn state_dim(&self) -> usize {
        self.x.nrows()
    }

    /// Control dimension
    pub fn control_dim(&self) -> usize {
        self.u.nrows()
    }

    /// Convert to the persisted array-of-arrays form
    pub fn to_arrays(&self) -> SolutionArrays {
        let rows = |m: &DMatrix<f64>| -> Vec<Vec<f64>> {
            (0..m.nrows())
                .map(|i| m.row(i).iter().cloned().collect())
                .collect()
        };
        (
            rows(&self.x),
            rows(&self.u),
            self.t.iter().cloned().collect(),
            rows(&self.dx),
        )
    }

    /// Rebuild a solution from the persisted array-of-arrays form.
    ///
    /// `time_to_goal` and the length are reconstructed from `t`.
    pub fn from_arrays(arrays: SolutionArrays) -> PlannerResult<Self> {
        let (x_rows, u_rows, t_values, dx_rows) = arrays;
        let length = t_values.len();

        let matrix = |rows: &[Vec<f64>], name: &str| -> PlannerResult<DMatrix<f64>> {
            if rows.is_empty() {
                return Err(PlannerError::InvalidParameter(format!(
                    "{} sequence has no rows",
                    name
                )));
            }
            for row in rows {
                if row.len() != length {
                    return Err(PlannerError::InvalidParameter(format!(
                        "{} row length {} does not match time length {}",
                        name,
                        row.len(),
                        length
                    )));
                }
            }
            Ok(DMatrix::from_fn(rows.len(), length, |i, j| rows[i][j]))
        };

        let x = matrix(&x_rows, "state")?;
        let u = matrix(&u_rows, "control")?;
        let dx = matrix(&dx_rows, "derivative")?;
        Solution::from_parts(x, u, DVector::from_vec(t_values), dx)
    }

    /// Persist the solution as JSON in the array-of-arrays form
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> PlannerResult<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(file, &self.to_arrays())?;
        Ok(())
    }

    /// Load a solution previously written by `save_json`
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> PlannerResult<Self> {
        let file = std::fs::File::open(path)?;
        let arrays: SolutionArrays = serde_json::from_reader(file)?;
        Solution::from_arrays(arrays)
    }
}

/// Proportional-derivative gain pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdGains {
    pub kp: f64,
    pub kd: f64,
}

impl PdGains {
    pub fn new(kp: f64, kd: f64) -> Self {
        Self { kp, kd }
    }
}

impl Default for PdGains {
    fn default() -> Self {
        Self { kp: 25.0, kd: 10.0 }
    }
}

/// Error-feedback wiring for the trajectory-tracking controller.
///
/// The wiring is chosen explicitly at configuration time; state dimensions
/// it does not cover are rejected instead of falling through to a
/// degenerate zero control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GainWiring {
    /// One degree of freedom: state `(q, dq)`, one PD pair on actuator 0
    OneDof(PdGains),
    /// Two degrees of freedom: state `(q1, q2, dq1, dq2)`, two diagonal
    /// PD pairs on actuators 0 and 1, no cross-coupling
    TwoDof(PdGains, PdGains),
}

impl GainWiring {
    /// State dimension this wiring expects
    pub fn state_dim(&self) -> usize {
        match self {
            GainWiring::OneDof(_) => 2,
            GainWiring::TwoDof(_, _) => 4,
        }
    }

    /// Minimum number of actuators this wiring drives
    pub fn min_control_dim(&self) -> usize {
        match self {
            GainWiring::OneDof(_) => 1,
            GainWiring::TwoDof(_, _) => 2,
        }
    }
}
