use budgetline_core::BudgetLine;
use nalgebra::Point2;

fn main() {
    let args: Vec<f64> = std::env::args()
        .skip(1)
        .filter_map(|arg| arg.parse().ok())
        .collect();

    let &[x, y, x_intercept, y_intercept] = args.as_slice() else {
        eprintln!("Usage: snap_bundle <x> <y> <x-intercept> <y-intercept>");
        return;
    };

    let line = BudgetLine::new(x_intercept, y_intercept);
    let adjustment = line.snap(Point2::new(x, y));

    println!(
        "adjusted bundle: ({}, {})",
        adjustment.adjusted.x, adjustment.adjusted.y
    );
    println!(
        "implied income: {} -> {}",
        adjustment.income_before, adjustment.income_after
    );
    println!("distance moved: {}", adjustment.abs_delta);
}
