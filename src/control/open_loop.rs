//! Open-loop replay of a planned control sequence
//!
//! Plays back the solution's control inputs indexed by elapsed time, with
//! no state feedback. Past the end of the trajectory, and whenever no
//! solution is loaded, the system's neutral control is returned.

use nalgebra::DVector;

use crate::common::{FeedbackPolicy, Solution};
use crate::control::nearest_time_index;

pub struct OpenLoopController {
    solution: Option<Solution>,
    u_neutral: DVector<f64>,
}

impl OpenLoopController {
    pub fn new(u_neutral: DVector<f64>) -> Self {
        Self { solution: None, u_neutral }
    }

    pub fn with_solution(u_neutral: DVector<f64>, solution: Solution) -> Self {
        Self { solution: Some(solution), u_neutral }
    }

    pub fn set_solution(&mut self, solution: Solution) {
        self.solution = Some(solution);
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }
}

impl FeedbackPolicy for OpenLoopController {
    fn control(&self, _x: &DVector<f64>, t: f64) -> DVector<f64> {
        let solution = match &self.solution {
            Some(solution) => solution,
            None => return self.u_neutral.clone(),
        };
        if t > solution.time_to_goal {
            return self.u_neutral.clone();
        }
        let i = nearest_time_index(&solution.t, t);
        solution.u.column(i).clone_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn replay_solution() -> Solution {
        let x = DMatrix::from_row_slice(2, 3, &[0.0, 0.1, 0.2, 0.0, 1.0, 0.0]);
        let u = DMatrix::from_row_slice(1, 3, &[2.0, -3.0, 1.0]);
        let t = DVector::from_vec(vec![0.0, 0.05, 0.1]);
        let dx = DMatrix::zeros(2, 3);
        Solution::from_parts(x, u, t, dx).unwrap()
    }

    #[test]
    fn test_no_solution_returns_neutral() {
        let controller = OpenLoopController::new(DVector::from_vec(vec![0.5]));
        let u = controller.control(&DVector::zeros(2), 0.0);
        assert_eq!(u, DVector::from_vec(vec![0.5]));
    }

    #[test]
    fn test_nearest_time_replay() {
        let controller = OpenLoopController::with_solution(DVector::zeros(1), replay_solution());
        let x = DVector::zeros(2);
        assert_eq!(controller.control(&x, 0.0)[0], 2.0);
        assert_eq!(controller.control(&x, 0.06)[0], -3.0);
        assert_eq!(controller.control(&x, 0.1)[0], 1.0);
    }

    #[test]
    fn test_neutral_past_time_to_goal() {
        let controller =
            OpenLoopController::with_solution(DVector::from_vec(vec![0.0]), replay_solution());
        let u = controller.control(&DVector::zeros(2), 0.11);
        assert_eq!(u, DVector::from_vec(vec![0.0]));
    }
}
