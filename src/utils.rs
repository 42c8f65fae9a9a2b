//! Utility functions for reporting HGS-VRPTW solutions.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::problem::{ProblemData, DEPOT};
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Save a solution to a file.
pub fn save_solution<P: AsRef<Path>>(
    solution: &Solution,
    data: &ProblemData,
    path: P,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "VRPTW Solution for instance: {}", data.name)?;
    writeln!(file, "Total Distance: {:.2}", solution.distance())?;
    writeln!(file, "Excess Load: {:.2}", solution.excess_load())?;
    writeln!(file, "Time Warp: {:.2}", solution.time_warp())?;
    writeln!(file, "Is Feasible: {}", solution.is_feasible())?;
    writeln!(file, "Number of Routes: {}", solution.num_routes())?;
    writeln!(file)?;

    for (i, route) in solution.routes().iter().enumerate() {
        write!(file, "Route #{}: {}", i + 1, DEPOT)?;

        for &client in route.visits() {
            write!(file, " -> {}", client)?;
        }

        writeln!(file, " -> {}", DEPOT)?;
        writeln!(file, "  Distance: {:.2}", route.distance())?;
        writeln!(
            file,
            "  Load: {:.2} / {:.2}",
            route.load(),
            data.vehicle_capacity
        )?;
        writeln!(file, "  Duration: {:.2}", route.duration())?;
        writeln!(file, "  Time Warp: {:.2}", route.time_warp())?;
        writeln!(file)?;
    }

    file.flush()?;
    Ok(())
}

/// Render the solution on a character grid.
pub fn render_solution(solution: &Solution, data: &ProblemData) -> String {
    const WIDTH: usize = 80;
    const HEIGHT: usize = 25;
    const ROUTE_SYMBOLS: [char; 10] = ['*', '+', 'x', '#', '@', '&', '%', '=', '^', '$'];

    // Find max and min coordinates for scaling
    let (min_x, min_y, max_x, max_y) = data.nodes.iter().fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(min_x, min_y, max_x, max_y), node| {
            (
                min_x.min(node.x),
                min_y.min(node.y),
                max_x.max(node.x),
                max_y.max(node.y),
            )
        },
    );

    let span_x = (max_x - min_x).max(f64::EPSILON);
    let span_y = (max_y - min_y).max(f64::EPSILON);
    let cell = |x: f64, y: f64| {
        let col = ((x - min_x) / span_x * (WIDTH as f64 - 1.0)) as usize;
        let row = ((y - min_y) / span_y * (HEIGHT as f64 - 1.0)) as usize;
        (row.min(HEIGHT - 1), col.min(WIDTH - 1))
    };

    let mut grid = vec![vec![' '; WIDTH]; HEIGHT];

    for (r_idx, route) in solution.routes().iter().enumerate() {
        let symbol = ROUTE_SYMBOLS[r_idx % ROUTE_SYMBOLS.len()];

        for &client in route.visits() {
            let node = data.node(client);
            let (row, col) = cell(node.x, node.y);
            grid[row][col] = symbol;
        }
    }

    let depot = data.depot();
    let (row, col) = cell(depot.x, depot.y);
    grid[row][col] = 'D';

    let mut out = format!(
        "Solution Visualization for {}\nTotal Distance: {:.2}\nNumber of Routes: {}\n\n",
        data.name,
        solution.distance(),
        solution.num_routes()
    );

    // Highest y on top
    for row in grid.iter().rev() {
        out.extend(row.iter());
        out.push('\n');
    }

    out.push_str("\nLegend:\nD - Depot\n");
    for r_idx in 0..solution.num_routes().min(ROUTE_SYMBOLS.len()) {
        out.push_str(&format!("{} - Route #{}\n", ROUTE_SYMBOLS[r_idx], r_idx + 1));
    }

    out
}

/// Print solution visualization to console.
pub fn print_solution_visualization(solution: &Solution, data: &ProblemData) {
    println!("{}", render_solution(solution, data));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0h 00m 00s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 02m 05s");
    }
}
