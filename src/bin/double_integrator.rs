// Double-integrator planning and closed-loop tracking demo
//
// Plans a rest-to-rest move, then replays it through the trajectory-tracking
// controller from a perturbed start and plots planned vs tracked position.

use gnuplot::{AxesCommon, Caption, Color, Figure};
use nalgebra::DVector;

use kinorrt::common::{Dynamics, FeedbackPolicy, GainWiring, PdGains};
use kinorrt::control::TrajectoryTracker;
use kinorrt::planning::{KinodynamicRrt, KinodynamicRrtConfig};
use kinorrt::systems::DoubleIntegrator;

fn main() {
    let system = DoubleIntegrator::new(10.0, -1.0, 4.0, 5.0);
    let x_start = DVector::zeros(2);
    let x_goal = DVector::from_vec(vec![3.14, 0.0]);

    let config = KinodynamicRrtConfig::default();
    let dt = config.dt;
    let mut planner = KinodynamicRrt::new(system.clone(), x_start, config)
        .expect("valid planner configuration");
    planner.set_seed(42);

    println!("Planning double-integrator move to ({:.2}, 0.00)...", x_goal[0]);
    let solution = match planner.plan(&x_goal) {
        Ok(solution) => solution,
        Err(e) => {
            println!("Planning failed: {}", e);
            return;
        }
    };
    println!(
        "Found a {}-sample trajectory reaching the goal at t = {:.2} s",
        solution.len(),
        solution.time_to_goal
    );

    let mut tracker = TrajectoryTracker::new(
        GainWiring::OneDof(PdGains::default()),
        x_goal.clone(),
        system.neutral_control(),
    )
    .expect("wiring matches the system");
    let planned_t: Vec<f64> = solution.t.iter().cloned().collect();
    let planned_q: Vec<f64> = (0..solution.len()).map(|j| solution.x[(0, j)]).collect();
    let horizon = solution.time_to_goal + 1.0;
    tracker.set_solution(solution).expect("dimensions match");

    // Closed-loop rollout from a perturbed start
    let mut x = DVector::from_vec(vec![0.2, 0.0]);
    let mut time = 0.0;
    let mut tracked_t = vec![time];
    let mut tracked_q = vec![x[0]];
    while time < horizon {
        let u = tracker.control(&x, time);
        x = &x + system.derivative(&x, &u) * dt;
        time += dt;
        tracked_t.push(time);
        tracked_q.push(x[0]);
    }
    println!("Closed-loop final state: q = {:.3}, dq = {:.3}", x[0], x[1]);

    let mut fg = Figure::new();
    {
        let axes = fg
            .axes2d()
            .set_title("Double Integrator Trajectory Tracking", &[])
            .set_x_label("Time [s]", &[])
            .set_y_label("Position [m]", &[]);
        axes.lines(&planned_t, &planned_q, &[Caption("Planned"), Color("blue")]);
        axes.lines(&tracked_t, &tracked_q, &[Caption("Tracked"), Color("red")]);
    }

    let output_path = "img/double_integrator_tracking.png";
    std::fs::create_dir_all("img").unwrap();
    fg.set_terminal("pngcairo", output_path);
    fg.show().unwrap();
    println!("Tracking plot saved to: {}", output_path);
}
