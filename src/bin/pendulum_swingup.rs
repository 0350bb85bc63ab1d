// Torque-limited pendulum swing-up with the kinodynamic RRT planner
//
// Plans a swing-up trajectory, smooths it, persists it as JSON, and saves
// a phase-plane plot of the explored tree and the solution.

use plotlib::page::Page;
use plotlib::repr::Plot;
use plotlib::view::ContinuousView;
use plotlib::style::{LineStyle, PointMarker, PointStyle};

use nalgebra::DVector;

use kinorrt::planning::{KinodynamicRrt, KinodynamicRrtConfig};
use kinorrt::signal::{smooth_solution, LowPassFilter};
use kinorrt::systems::Pendulum;

fn main() {
    let system = Pendulum::default();
    let x_start = DVector::zeros(2);
    let x_goal = DVector::from_vec(vec![std::f64::consts::PI, 0.0]);

    let config = KinodynamicRrtConfig::default();
    let dt = config.dt;
    let mut planner =
        KinodynamicRrt::new(system, x_start, config).expect("valid planner configuration");
    planner.set_seed(1234);

    println!("Planning pendulum swing-up to ({:.2}, 0.00)...", x_goal[0]);
    let mut solution = match planner.plan(&x_goal) {
        Ok(solution) => solution,
        Err(e) => {
            println!("Planning failed: {}", e);
            return;
        }
    };
    println!(
        "Found a {}-sample trajectory reaching the goal at t = {:.2} s ({} resets)",
        solution.len(),
        solution.time_to_goal,
        planner.reset_count()
    );

    let filter = LowPassFilter::new(3.0, dt);
    smooth_solution(&mut solution, &filter, false).expect("filter preserves length");

    std::fs::create_dir_all("img").unwrap();
    solution.save_json("img/pendulum_swingup_solution.json").unwrap();

    let tree_points: Vec<(f64, f64)> = planner
        .tree()
        .iter()
        .map(|node| (node.x[0], node.x[1]))
        .collect();
    let path_points: Vec<(f64, f64)> = (0..solution.len())
        .map(|j| (solution.x[(0, j)], solution.x[(1, j)]))
        .collect();

    let s1: Plot = Plot::new(tree_points).point_style(
        PointStyle::new()
            .marker(PointMarker::Circle)
            .colour("#35C788")
            .size(1.),
    );
    let s2: Plot = Plot::new(path_points).line_style(
        LineStyle::new()
            .colour("#DD3355")
            .width(2.),
    );

    let v = ContinuousView::new()
        .add(s1)
        .add(s2)
        .x_range(-7., 7.)
        .y_range(-10., 10.)
        .x_label("theta [rad]")
        .y_label("dtheta [rad/s]");

    Page::single(&v).save("./img/pendulum_swingup.svg").unwrap();
    println!("Phase-plane plot saved to ./img/pendulum_swingup.svg");
}
