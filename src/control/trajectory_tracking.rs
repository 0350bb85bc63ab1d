//! Trajectory-tracking controller
//!
//! Combines time-indexed feedforward replay of the planned controls with a
//! proportional-derivative correction against the planned states. Past the
//! end of the trajectory the feedforward reverts to the neutral control and
//! the tracking target becomes the literal goal state.

use nalgebra::DVector;

use crate::common::{FeedbackPolicy, GainWiring, PlannerError, PlannerResult, Solution};
use crate::control::nearest_time_index;

pub struct TrajectoryTracker {
    wiring: GainWiring,
    x_goal: DVector<f64>,
    u_neutral: DVector<f64>,
    solution: Option<Solution>,
}

impl TrajectoryTracker {
    /// Create a tracker with an explicit gain wiring.
    ///
    /// The goal and neutral control must match the wiring's dimensions.
    pub fn new(
        wiring: GainWiring,
        x_goal: DVector<f64>,
        u_neutral: DVector<f64>,
    ) -> PlannerResult<Self> {
        if x_goal.len() != wiring.state_dim() {
            return Err(PlannerError::InvalidParameter(format!(
                "goal state has dimension {}, wiring expects {}",
                x_goal.len(),
                wiring.state_dim()
            )));
        }
        if u_neutral.len() < wiring.min_control_dim() {
            return Err(PlannerError::InvalidParameter(format!(
                "neutral control has dimension {}, wiring drives {} actuators",
                u_neutral.len(),
                wiring.min_control_dim()
            )));
        }
        Ok(Self { wiring, x_goal, u_neutral, solution: None })
    }

    /// Load a solution, rejecting dimensionalities the wiring does not cover
    pub fn set_solution(&mut self, solution: Solution) -> PlannerResult<()> {
        if solution.state_dim() != self.wiring.state_dim() {
            return Err(PlannerError::InvalidParameter(format!(
                "solution state dimension {} not supported by this wiring (expects {})",
                solution.state_dim(),
                self.wiring.state_dim()
            )));
        }
        if solution.control_dim() != self.u_neutral.len() {
            return Err(PlannerError::InvalidParameter(format!(
                "solution control dimension {} differs from neutral control dimension {}",
                solution.control_dim(),
                self.u_neutral.len()
            )));
        }
        self.solution = Some(solution);
        Ok(())
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// PD correction per driven actuator for a given tracking error
    fn feedback(&self, error: &DVector<f64>) -> Vec<(usize, f64)> {
        match self.wiring {
            GainWiring::OneDof(g) => vec![(0, g.kp * error[0] + g.kd * error[1])],
            GainWiring::TwoDof(g1, g2) => vec![
                (0, g1.kp * error[0] + g1.kd * error[2]),
                (1, g2.kp * error[1] + g2.kd * error[3]),
            ],
        }
    }
}

impl FeedbackPolicy for TrajectoryTracker {
    fn control(&self, x: &DVector<f64>, t: f64) -> DVector<f64> {
        let solution = match &self.solution {
            Some(solution) => solution,
            None => return self.u_neutral.clone(),
        };

        let i = nearest_time_index(&solution.t, t);
        let (mut u_ctl, x_target) = if t > solution.time_to_goal {
            (self.u_neutral.clone(), self.x_goal.clone())
        } else {
            (
                solution.u.column(i).clone_owned(),
                solution.x.column(i).clone_owned(),
            )
        };

        let error = x_target - x;
        for (actuator, correction) in self.feedback(&error) {
            u_ctl[actuator] += correction;
        }
        u_ctl
    }
}
