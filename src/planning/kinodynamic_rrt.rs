//! Kinodynamic RRT (Rapidly-exploring Random Tree) motion planner
//!
//! Grows a tree of dynamically reachable states by forward simulation of
//! discretized control inputs, alternating randomized exploration with
//! goal-directed best-of-inputs extension, until a node lands inside the
//! goal region. The tree is reset and regrown whenever a node budget is
//! exceeded without success.

use itertools::Itertools;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::common::{Dynamics, Node, PlannerError, PlannerResult, Solution, Tree};

/// Callback invoked after each accepted node with the node and the current
/// tree size. Used to decouple incremental visualization from the search.
pub type NodeObserver = Box<dyn FnMut(&Node, usize)>;

/// Configuration for the kinodynamic RRT planner
#[derive(Debug, Clone)]
pub struct KinodynamicRrtConfig {
    /// Integration step size [s]
    pub dt: f64,
    /// Goal acceptance radius in state space
    pub goal_radius: f64,
    /// Probability of random exploration; goal-directed best-of extension
    /// happens with probability `1 - alpha`
    pub alpha: f64,
    /// Maximum accepted nodes before the tree is reset
    pub max_nodes: usize,
    /// Nodes arriving at or after this time are ineligible for extension [s]
    pub max_solution_time: f64,
    /// Nearest-neighbor scan cap; larger trees scan only this many of the
    /// most recent nodes
    pub nn_scan_cap: usize,
    /// Number of linearly spaced levels per control dimension
    pub control_levels: usize,
    /// Whether to run the system's input-validity predicate per candidate
    pub check_input_validity: bool,
    /// Cap on randomized-input redraws when validity checking is on
    pub max_input_resamples: usize,
    /// Overall iteration cap for one planning run
    pub max_iterations: usize,
    /// Start-proximity cutoff used while backtracking the solution path
    pub eps: f64,
}

impl Default for KinodynamicRrtConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            goal_radius: 0.2,
            alpha: 0.9,
            max_nodes: 25_000,
            max_solution_time: 10.0,
            nn_scan_cap: 500,
            control_levels: 3,
            check_input_validity: false,
            max_input_resamples: 100,
            max_iterations: 1_000_000,
            eps: 1e-3,
        }
    }
}

impl KinodynamicRrtConfig {
    fn validate(&self) -> PlannerResult<()> {
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(PlannerError::InvalidParameter(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if !(self.goal_radius > 0.0) {
            return Err(PlannerError::InvalidParameter(format!(
                "goal_radius must be positive, got {}",
                self.goal_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(PlannerError::InvalidParameter(format!(
                "alpha must lie in [0, 1], got {}",
                self.alpha
            )));
        }
        if !(self.max_solution_time > 0.0) {
            return Err(PlannerError::InvalidParameter(format!(
                "max_solution_time must be positive, got {}",
                self.max_solution_time
            )));
        }
        if !(self.eps > 0.0) {
            return Err(PlannerError::InvalidParameter(format!(
                "eps must be positive, got {}",
                self.eps
            )));
        }
        if self.max_nodes == 0
            || self.nn_scan_cap == 0
            || self.max_input_resamples == 0
            || self.max_iterations == 0
        {
            return Err(PlannerError::InvalidParameter(
                "node, scan, resample, and iteration budgets must be nonzero".to_string(),
            ));
        }
        if self.control_levels < 2 {
            return Err(PlannerError::InvalidParameter(format!(
                "control_levels must be at least 2, got {}",
                self.control_levels
            )));
        }
        Ok(())
    }
}

/// Kinodynamic RRT planner over an abstract dynamical system
pub struct KinodynamicRrt<D: Dynamics> {
    system: D,
    config: KinodynamicRrtConfig,
    tree: Tree,
    rng: StdRng,
    control_set: Vec<DVector<f64>>,
    observer: Option<NodeObserver>,
    resets: usize,
}

impl<D: Dynamics> KinodynamicRrt<D> {
    /// Create a planner rooted at `x_start`.
    ///
    /// The dynamics interface is checked once here: bound vectors must match
    /// the declared dimensions and be ordered. Mismatches are fatal.
    pub fn new(system: D, x_start: DVector<f64>, config: KinodynamicRrtConfig) -> PlannerResult<Self> {
        config.validate()?;
        validate_system(&system)?;
        if x_start.len() != system.state_dim() {
            return Err(PlannerError::InvalidParameter(format!(
                "start state has dimension {}, system expects {}",
                x_start.len(),
                system.state_dim()
            )));
        }
        let control_set = discretize_controls(&system, config.control_levels);
        Ok(KinodynamicRrt {
            tree: Tree::new(x_start),
            rng: StdRng::from_entropy(),
            system,
            config,
            control_set,
            observer: None,
            resets: 0,
        })
    }

    /// Fix the random source for reproducible runs
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Register a callback invoked after each accepted node
    pub fn set_observer(&mut self, observer: NodeObserver) {
        self.observer = Some(observer);
    }

    /// The tree grown so far
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of tree resets during the last planning run
    pub fn reset_count(&self) -> usize {
        self.resets
    }

    pub fn config(&self) -> &KinodynamicRrtConfig {
        &self.config
    }

    pub fn system(&self) -> &D {
        &self.system
    }

    /// Grow the tree by pure random exploration, without a goal.
    ///
    /// Returns the number of nodes actually accepted.
    pub fn grow(&mut self, iterations: usize) -> usize {
        let mut accepted = 0;
        for _ in 0..iterations {
            let target = self.sample_random_state();
            if self.attempt(&target, false).is_some() {
                accepted += 1;
            }
        }
        accepted
    }

    /// Search for a trajectory from the start state to the goal region.
    ///
    /// Runs the sample / nearest-neighbor / extend loop until a node lands
    /// within `goal_radius` of `x_goal`, resetting the tree whenever
    /// `max_nodes` nodes accumulate without success. Fails with a
    /// `PlanningError` once `max_iterations` iterations are spent.
    pub fn plan(&mut self, x_goal: &DVector<f64>) -> PlannerResult<Solution> {
        if x_goal.len() != self.system.state_dim() {
            return Err(PlannerError::InvalidParameter(format!(
                "goal state has dimension {}, system expects {}",
                x_goal.len(),
                self.system.state_dim()
            )));
        }

        self.tree.reset();
        self.resets = 0;
        let mut accepted: usize = 0;

        for iteration in 0..self.config.max_iterations {
            // Goal-directed attempts use the best-of extender; random
            // exploration uses a randomized input.
            let goal_directed = self.rng.gen::<f64>() > self.config.alpha;
            let target = if goal_directed {
                x_goal.clone()
            } else {
                self.sample_random_state()
            };

            let index = match self.attempt(&target, goal_directed) {
                Some(index) => index,
                None => {
                    debug!("iteration {}: no eligible neighbor or valid input, skipping", iteration);
                    continue;
                }
            };
            accepted += 1;

            let goal_distance = match self.tree.get(index) {
                Some(node) => node.distance_to(x_goal),
                None => {
                    return Err(PlannerError::CorruptedTree(format!(
                        "accepted node index {} missing from tree",
                        index
                    )))
                }
            };
            if goal_distance < self.config.goal_radius {
                info!(
                    "path to goal found after {} iterations ({} resets)",
                    iteration + 1,
                    self.resets
                );
                return self.extract_path(index);
            }

            if accepted >= self.config.max_nodes {
                info!("search failed after {} nodes: resetting tree", accepted);
                self.tree.reset();
                accepted = 0;
                self.resets += 1;
            }
        }

        Err(PlannerError::PlanningError(format!(
            "search budget exhausted: no path found within {} iterations",
            self.config.max_iterations
        )))
    }

    /// One sample/nearest/extend/append attempt. Returns the index of the
    /// accepted node, or None when the iteration is a silent skip.
    fn attempt(&mut self, target: &DVector<f64>, best_of: bool) -> Option<usize> {
        let near_index = self.nearest_neighbor(target)?;
        let parent = self.tree.get(near_index)?.clone();

        let new_node = if best_of {
            self.extend_best_of(&parent, near_index, target)
        } else {
            self.extend_randomized(&parent, near_index)
        }?;

        let index = self.tree.push(new_node);
        if let Some(observer) = self.observer.as_mut() {
            if let Some(node) = self.tree.get(index) {
                observer(node, index + 1);
            }
        }
        Some(index)
    }

    /// Sample a state uniformly within the system's bounds
    fn sample_random_state(&mut self) -> DVector<f64> {
        let n = self.system.state_dim();
        let (x_lb, x_ub) = self.system.state_bounds();
        let mut values = Vec::with_capacity(n);
        for i in 0..n {
            values.push(Uniform::new_inclusive(x_lb[i], x_ub[i]).sample(&mut self.rng));
        }
        DVector::from_vec(values)
    }

    /// Closest eligible node to `x_target`.
    ///
    /// Small trees are scanned in full; beyond `nn_scan_cap` nodes only the
    /// most recently appended window is scanned, trading completeness for
    /// bounded latency. Nodes at or past the time horizon are skipped even
    /// when they are closest overall. The first strict minimum wins.
    fn nearest_neighbor(&self, x_target: &DVector<f64>) -> Option<usize> {
        let len = self.tree.len();
        let first = if len <= self.config.nn_scan_cap {
            0
        } else {
            len - self.config.nn_scan_cap
        };

        let mut closest: Option<usize> = None;
        let mut min_distance = f64::INFINITY;
        for index in first..len {
            let node = match self.tree.get(index) {
                Some(node) => node,
                None => continue,
            };
            if node.t >= self.config.max_solution_time {
                continue;
            }
            let distance = node.distance_to(x_target);
            if distance < min_distance {
                min_distance = distance;
                closest = Some(index);
            }
        }
        closest
    }

    /// One explicit-Euler step from `parent` under control `u`
    fn step(&self, parent: &Node, parent_index: usize, u: DVector<f64>) -> Node {
        let x_next = &parent.x + self.system.derivative(&parent.x, &u) * self.config.dt;
        Node::new(x_next, u, parent.t + self.config.dt, parent_index)
    }

    /// Extend with a control drawn uniformly from the discretized set.
    ///
    /// With validity checking on, redraws up to `max_input_resamples` times
    /// before giving the iteration up.
    fn extend_randomized(&mut self, parent: &Node, parent_index: usize) -> Option<Node> {
        let attempts = if self.config.check_input_validity {
            self.config.max_input_resamples
        } else {
            1
        };
        for _ in 0..attempts {
            let j = self.rng.gen_range(0..self.control_set.len());
            let u = &self.control_set[j];
            if self.config.check_input_validity && !self.system.is_valid_input(&parent.x, u) {
                continue;
            }
            return Some(self.step(parent, parent_index, u.clone()));
        }
        debug!(
            "no valid control drawn after {} resamples",
            self.config.max_input_resamples
        );
        None
    }

    /// Extend with the discretized control whose one-step result lands
    /// closest to `x_target`. Returns None when every candidate is invalid.
    fn extend_best_of(
        &self,
        parent: &Node,
        parent_index: usize,
        x_target: &DVector<f64>,
    ) -> Option<Node> {
        self.control_set
            .iter()
            .filter(|u| {
                !self.config.check_input_validity || self.system.is_valid_input(&parent.x, u)
            })
            .map(|u| self.step(parent, parent_index, u.clone()))
            .min_by_key(|node| OrderedFloat(node.distance_to(x_target)))
    }

    /// Backtrack parent links from the goal node and assemble the solution
    /// in forward time order.
    ///
    /// The walk stops at the first node within `eps` of the start state
    /// (inclusive). A chain longer than the tree itself means the parent
    /// links are corrupted; that aborts the run instead of returning a
    /// wrong path.
    fn extract_path(&self, goal_index: usize) -> PlannerResult<Solution> {
        let start = self.tree.start_state().clone();
        let max_hops = self.tree.len();

        let mut samples: Vec<(DVector<f64>, DVector<f64>, f64)> = Vec::new();
        let mut index = goal_index;
        let mut hops = 0;
        loop {
            let node = self.tree.get(index).ok_or_else(|| {
                PlannerError::CorruptedTree(format!("node index {} out of bounds", index))
            })?;
            let u = node
                .u
                .clone()
                .unwrap_or_else(|| self.system.neutral_control());
            samples.push((node.x.clone(), u, node.t));

            if node.distance_to(&start) <= self.config.eps {
                break;
            }
            index = node.parent.ok_or_else(|| {
                PlannerError::CorruptedTree(
                    "parent chain ended away from the start state".to_string(),
                )
            })?;
            hops += 1;
            if hops > max_hops {
                return Err(PlannerError::CorruptedTree(format!(
                    "parent chain exceeded {} hops without reaching the start state",
                    max_hops
                )));
            }
        }
        samples.reverse();

        let n = self.system.state_dim();
        let m = self.system.control_dim();
        let length = samples.len();
        let mut x = DMatrix::zeros(n, length);
        let mut u = DMatrix::zeros(m, length);
        let mut dx = DMatrix::zeros(n, length);
        let mut t = DVector::zeros(length);
        for (j, (xs, us, ts)) in samples.iter().enumerate() {
            x.set_column(j, xs);
            u.set_column(j, us);
            dx.set_column(j, &self.system.derivative(xs, us));
            t[j] = *ts;
        }
        Solution::from_parts(x, u, t, dx)
    }
}

/// Check the dynamics interface for internal consistency
fn validate_system<D: Dynamics>(system: &D) -> PlannerResult<()> {
    let n = system.state_dim();
    let m = system.control_dim();
    if n == 0 || m == 0 {
        return Err(PlannerError::InvalidParameter(format!(
            "state and control dimensions must be nonzero, got n={}, m={}",
            n, m
        )));
    }
    let (x_lb, x_ub) = system.state_bounds();
    if x_lb.len() != n || x_ub.len() != n {
        return Err(PlannerError::InvalidParameter(format!(
            "state bounds have lengths {}/{}, expected {}",
            x_lb.len(),
            x_ub.len(),
            n
        )));
    }
    let (u_lb, u_ub) = system.control_bounds();
    if u_lb.len() != m || u_ub.len() != m {
        return Err(PlannerError::InvalidParameter(format!(
            "control bounds have lengths {}/{}, expected {}",
            u_lb.len(),
            u_ub.len(),
            m
        )));
    }
    if x_lb.iter().zip(x_ub.iter()).any(|(lo, hi)| lo > hi) {
        return Err(PlannerError::InvalidParameter(
            "state lower bound exceeds upper bound".to_string(),
        ));
    }
    if u_lb.iter().zip(u_ub.iter()).any(|(lo, hi)| lo > hi) {
        return Err(PlannerError::InvalidParameter(
            "control lower bound exceeds upper bound".to_string(),
        ));
    }
    if system.neutral_control().len() != m {
        return Err(PlannerError::InvalidParameter(format!(
            "neutral control has dimension {}, expected {}",
            system.neutral_control().len(),
            m
        )));
    }
    Ok(())
}

/// Cartesian product of linearly spaced levels per control dimension
fn discretize_controls<D: Dynamics>(system: &D, levels: usize) -> Vec<DVector<f64>> {
    let (u_lb, u_ub) = system.control_bounds();
    let axes: Vec<Vec<f64>> = (0..system.control_dim())
        .map(|k| linspace(u_lb[k], u_ub[k], levels))
        .collect();
    axes.into_iter()
        .multi_cartesian_product()
        .map(DVector::from_vec)
        .collect()
}

fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::DoubleIntegrator;
    use std::cell::Cell;
    use std::rc::Rc;

    fn test_system() -> DoubleIntegrator {
        DoubleIntegrator::new(10.0, -1.0, 4.0, 5.0)
    }

    fn goal() -> DVector<f64> {
        DVector::from_vec(vec![3.14, 0.0])
    }

    #[test]
    fn test_config_default() {
        let config = KinodynamicRrtConfig::default();
        assert_eq!(config.dt, 0.05);
        assert_eq!(config.goal_radius, 0.2);
        assert_eq!(config.control_levels, 3);
        assert_eq!(config.max_nodes, 25_000);
    }

    #[test]
    fn test_config_validation() {
        let mut config = KinodynamicRrtConfig::default();
        config.alpha = 1.5;
        let result = KinodynamicRrt::new(test_system(), DVector::zeros(2), config);
        assert!(matches!(result, Err(PlannerError::InvalidParameter(_))));
    }

    #[test]
    fn test_start_dimension_mismatch_rejected() {
        let result = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(3),
            KinodynamicRrtConfig::default(),
        );
        assert!(matches!(result, Err(PlannerError::InvalidParameter(_))));
    }

    #[test]
    fn test_malformed_dynamics_rejected() {
        struct BadBounds;
        impl Dynamics for BadBounds {
            fn state_dim(&self) -> usize {
                2
            }
            fn control_dim(&self) -> usize {
                1
            }
            fn state_bounds(&self) -> (DVector<f64>, DVector<f64>) {
                // length 3 vs declared n = 2
                (DVector::zeros(3), DVector::zeros(3))
            }
            fn control_bounds(&self) -> (DVector<f64>, DVector<f64>) {
                (DVector::from_vec(vec![-1.0]), DVector::from_vec(vec![1.0]))
            }
            fn derivative(&self, _x: &DVector<f64>, u: &DVector<f64>) -> DVector<f64> {
                DVector::from_vec(vec![0.0, u[0]])
            }
        }
        let result = KinodynamicRrt::new(BadBounds, DVector::zeros(2), KinodynamicRrtConfig::default());
        assert!(matches!(result, Err(PlannerError::InvalidParameter(_))));
    }

    #[test]
    fn test_control_set_is_cartesian_grid() {
        let planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        let levels: Vec<f64> = planner.control_set.iter().map(|u| u[0]).collect();
        assert_eq!(levels, vec![-10.0, 0.0, 10.0]);
    }

    #[test]
    fn test_nearest_neighbor_respects_time_horizon() {
        let mut planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        let target = DVector::from_vec(vec![2.0, 0.0]);

        // Closest by distance, but past the time horizon
        planner.tree.push(Node {
            x: DVector::from_vec(vec![2.0, 0.0]),
            u: Some(DVector::from_vec(vec![0.0])),
            t: 11.0,
            parent: Some(0),
        });
        // Farther, but eligible
        planner.tree.push(Node {
            x: DVector::from_vec(vec![1.0, 0.0]),
            u: Some(DVector::from_vec(vec![0.0])),
            t: 0.05,
            parent: Some(0),
        });

        assert_eq!(planner.nearest_neighbor(&target), Some(2));
    }

    #[test]
    fn test_nearest_neighbor_minimality_full_scan() {
        let mut planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        let target = DVector::from_vec(vec![3.0, 0.0]);
        for i in 1..=10 {
            planner.tree.push(Node {
                x: DVector::from_vec(vec![i as f64 * 0.3, 0.0]),
                u: Some(DVector::from_vec(vec![0.0])),
                t: i as f64 * 0.05,
                parent: Some(i - 1),
            });
        }
        let best = planner.nearest_neighbor(&target).unwrap();
        let best_distance = planner.tree.get(best).unwrap().distance_to(&target);
        for node in planner.tree.iter() {
            if node.t < planner.config.max_solution_time {
                assert!(node.distance_to(&target) >= best_distance);
            }
        }
        // 10 * 0.3 = 3.0 is the exact minimum
        assert_eq!(best, 10);
    }

    #[test]
    fn test_nearest_neighbor_recency_window() {
        let mut config = KinodynamicRrtConfig::default();
        config.nn_scan_cap = 3;
        let mut planner = KinodynamicRrt::new(test_system(), DVector::zeros(2), config).unwrap();
        let target = DVector::zeros(2);

        // The root is the global minimum but falls outside the window once
        // more than nn_scan_cap nodes exist.
        for i in 1..=6 {
            planner.tree.push(Node {
                x: DVector::from_vec(vec![i as f64, 0.0]),
                u: Some(DVector::from_vec(vec![0.0])),
                t: i as f64 * 0.05,
                parent: Some(i - 1),
            });
        }
        // Window covers indices 4..=6; index 4 is closest among them
        assert_eq!(planner.nearest_neighbor(&target), Some(4));
    }

    #[test]
    fn test_best_of_extension_moves_toward_target() {
        let mut planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        planner.set_seed(7);
        let parent = planner.tree.get(0).unwrap().clone();
        let target = DVector::from_vec(vec![3.0, 2.0]);
        let node = planner.extend_best_of(&parent, 0, &target).unwrap();
        // Positive acceleration is the only input reducing distance here
        assert_eq!(node.u.as_ref().unwrap()[0], 10.0);
        assert_eq!(node.t, planner.config.dt);
        assert_eq!(node.parent, Some(0));
    }

    #[test]
    fn test_validity_predicate_filters_candidates() {
        struct OneSided(DoubleIntegrator);
        impl Dynamics for OneSided {
            fn state_dim(&self) -> usize {
                self.0.state_dim()
            }
            fn control_dim(&self) -> usize {
                self.0.control_dim()
            }
            fn state_bounds(&self) -> (DVector<f64>, DVector<f64>) {
                self.0.state_bounds()
            }
            fn control_bounds(&self) -> (DVector<f64>, DVector<f64>) {
                self.0.control_bounds()
            }
            fn derivative(&self, x: &DVector<f64>, u: &DVector<f64>) -> DVector<f64> {
                self.0.derivative(x, u)
            }
            fn is_valid_input(&self, _x: &DVector<f64>, u: &DVector<f64>) -> bool {
                u[0] <= 0.0
            }
        }

        let mut config = KinodynamicRrtConfig::default();
        config.check_input_validity = true;
        let mut planner =
            KinodynamicRrt::new(OneSided(test_system()), DVector::zeros(2), config).unwrap();
        planner.set_seed(11);

        let parent = planner.tree.get(0).unwrap().clone();
        let target = DVector::from_vec(vec![3.0, 2.0]);
        let node = planner.extend_best_of(&parent, 0, &target).unwrap();
        assert!(node.u.as_ref().unwrap()[0] <= 0.0);

        let node = planner.extend_randomized(&parent, 0).unwrap();
        assert!(node.u.as_ref().unwrap()[0] <= 0.0);
    }

    #[test]
    fn test_plan_concrete_scenario() {
        let mut planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        planner.set_seed(42);

        let solution = planner.plan(&goal()).unwrap();

        assert_eq!(solution.t[0], 0.0);
        assert!(solution.len() >= 2);
        let last = solution.len() - 1;
        assert_eq!(solution.t[last], solution.time_to_goal);
        let x_final = solution.x.column(last).clone_owned();
        assert!((x_final - goal()).norm() < 0.2);
        let x_first = solution.x.column(0).clone_owned();
        assert!(x_first.norm() <= planner.config.eps);
    }

    #[test]
    fn test_accepted_node_times_follow_parent() {
        let mut planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        planner.set_seed(3);
        planner.grow(200);

        assert!(planner.tree.len() > 1);
        for node in planner.tree.iter() {
            assert!(node.t >= 0.0);
            match node.parent {
                Some(p) => {
                    let parent = planner.tree.get(p).unwrap();
                    assert_eq!(node.t, parent.t + planner.config.dt);
                }
                None => assert_eq!(node.t, 0.0),
            }
        }
        // Exactly one root
        let roots = planner.tree.iter().filter(|n| n.parent.is_none()).count();
        assert_eq!(roots, 1);
    }

    #[test]
    fn test_solution_times_increase_by_dt() {
        let mut planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        planner.set_seed(19);
        let solution = planner.plan(&goal()).unwrap();
        for j in 1..solution.len() {
            let step = solution.t[j] - solution.t[j - 1];
            assert!((step - planner.config.dt).abs() < 1e-9);
        }
    }

    #[test]
    fn test_small_budget_resets_then_larger_budget_succeeds() {
        let mut config = KinodynamicRrtConfig::default();
        config.max_nodes = 5;
        config.max_iterations = 2_000;
        let mut starved = KinodynamicRrt::new(test_system(), DVector::zeros(2), config).unwrap();
        starved.set_seed(5);

        // The goal needs well over five integration steps, so every epoch
        // ends in a reset and the budget runs out.
        let result = starved.plan(&goal());
        assert!(matches!(result, Err(PlannerError::PlanningError(_))));
        assert!(starved.reset_count() >= 1);
        // At most max_nodes nodes accumulate between resets
        assert!(starved.tree().len() <= 5);
        assert_eq!(starved.tree().root().x, DVector::zeros(2));
        assert_eq!(starved.tree().root().t, 0.0);

        let mut planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        planner.set_seed(5);
        assert!(planner.plan(&goal()).is_ok());
    }

    #[test]
    fn test_observer_sees_accepted_nodes() {
        let mut planner = KinodynamicRrt::new(
            test_system(),
            DVector::zeros(2),
            KinodynamicRrtConfig::default(),
        )
        .unwrap();
        planner.set_seed(23);

        let count = Rc::new(Cell::new(0usize));
        let seen = count.clone();
        planner.set_observer(Box::new(move |node, tree_size| {
            assert!(node.parent.is_some());
            assert!(tree_size >= 2);
            seen.set(seen.get() + 1);
        }));

        let accepted = planner.grow(100);
        assert!(accepted > 0);
        assert_eq!(count.get(), accepted);
    }
}
