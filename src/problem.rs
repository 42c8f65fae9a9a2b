//! Problem definition and data structures for the VRPTW.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

/// Index of the depot in every [`ProblemData`].
pub const DEPOT: usize = 0;

/// Represents a node (client or depot) in the VRPTW.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub demand: f64,
    pub service_duration: f64,
    /// Earliest start of service
    pub tw_early: f64,
    /// Latest start of service; `f64::MAX` when there is no deadline
    pub tw_late: f64,
}

impl Node {
    /// Create a new node without a time window.
    pub fn new(x: f64, y: f64, demand: f64) -> Self {
        Node {
            x,
            y,
            demand,
            service_duration: 0.0,
            tw_early: 0.0,
            tw_late: f64::MAX,
        }
    }

    /// Set the time window of this node.
    pub fn with_time_window(mut self, early: f64, late: f64) -> Self {
        self.tw_early = early;
        self.tw_late = late;
        self
    }

    /// Set the service duration of this node.
    pub fn with_service_duration(mut self, duration: f64) -> Self {
        self.service_duration = duration;
        self
    }

    /// Calculate the Euclidean distance between two nodes.
    pub fn distance(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Represents a VRPTW instance. Node 0 is the depot, nodes `1..=num_clients` are clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemData {
    pub name: String,
    pub nodes: Vec<Node>,
    pub vehicle_capacity: f64,
    pub num_vehicles: usize,
    distance_matrix: Vec<Vec<f64>>,
    duration_matrix: Vec<Vec<f64>>,
}

impl ProblemData {
    /// Create a new problem with Euclidean distances and durations.
    ///
    /// The first node is the depot and must be present: solution and search
    /// code index it unconditionally. Use [`ProblemData::try_new`] for
    /// untrusted input.
    pub fn new(name: String, nodes: Vec<Node>, vehicle_capacity: f64, num_vehicles: usize) -> Self {
        let distance_matrix = Self::compute_distance_matrix(&nodes);

        ProblemData {
            name,
            nodes,
            vehicle_capacity,
            num_vehicles,
            duration_matrix: distance_matrix.clone(),
            distance_matrix,
        }
    }

    /// Like [`ProblemData::new`], but rejects an instance without a depot.
    pub fn try_new(
        name: String,
        nodes: Vec<Node>,
        vehicle_capacity: f64,
        num_vehicles: usize,
    ) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::invalid_parameter(
                "nodes",
                0,
                "must contain at least the depot",
            ));
        }

        Ok(Self::new(name, nodes, vehicle_capacity, num_vehicles))
    }

    /// Replace both the distance and the duration matrix.
    pub fn with_distance_matrix(mut self, matrix: Vec<Vec<f64>>) -> Result<Self> {
        self.check_matrix("distance_matrix", &matrix)?;
        self.duration_matrix = matrix.clone();
        self.distance_matrix = matrix;
        Ok(self)
    }

    /// Replace only the duration matrix.
    pub fn with_duration_matrix(mut self, matrix: Vec<Vec<f64>>) -> Result<Self> {
        self.check_matrix("duration_matrix", &matrix)?;
        self.duration_matrix = matrix;
        Ok(self)
    }

    fn check_matrix(&self, name: &'static str, matrix: &[Vec<f64>]) -> Result<()> {
        let n = self.nodes.len();
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return Err(Error::invalid_parameter(
                name,
                format!("{} rows", matrix.len()),
                "must be a square matrix over all nodes",
            ));
        }
        Ok(())
    }

    /// Distance between two node indices.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance_matrix[from][to]
    }

    /// Travel duration between two node indices.
    pub fn duration(&self, from: usize, to: usize) -> f64 {
        self.duration_matrix[from][to]
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn depot(&self) -> &Node {
        &self.nodes[DEPOT]
    }

    /// Number of clients (excluding the depot).
    pub fn num_clients(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Iterator over the client indices.
    pub fn clients(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.num_clients()
    }

    /// Generate the full distance matrix for all nodes.
    fn compute_distance_matrix(nodes: &[Node]) -> Vec<Vec<f64>> {
        let n = nodes.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = nodes[i].distance(&nodes[j]);
                }
            }
        }

        matrix
    }

    /// Calculate the center of all client locations.
    pub fn centroid(&self) -> (f64, f64) {
        let count = self.num_clients();
        if count == 0 {
            return (0.0, 0.0);
        }

        let (sum_x, sum_y) = self
            .nodes
            .iter()
            .skip(1)
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));

        (sum_x / count as f64, sum_y / count as f64)
    }

    /// Load a problem from a file.
    ///
    /// Line 1 holds the name, line 2 `capacity [num_vehicles]`, and every following
    /// non-empty line `id x y demand [tw_early tw_late service_duration]`. The first
    /// node line is the depot.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Parse a problem from any buffered reader, in the [`ProblemData::from_file`] format.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let name = match lines.next() {
            Some(line) => line?.trim().to_string(),
            None => return Err(parse_error(1, "missing instance name")),
        };

        let vehicle_info = match lines.next() {
            Some(line) => line?,
            None => return Err(parse_error(2, "missing vehicle information")),
        };
        let parts: Vec<&str> = vehicle_info.split_whitespace().collect();
        let vehicle_capacity = match parts.first() {
            Some(part) => parse_field::<f64>(part, 2, "capacity")?,
            None => return Err(parse_error(2, "missing vehicle capacity")),
        };
        let max_vehicles = match parts.get(1) {
            Some(part) => Some(parse_field::<usize>(part, 2, "number of vehicles")?),
            None => None,
        };

        let mut nodes = Vec::new();

        for (i, line_result) in lines.enumerate() {
            let line_no = i + 3;
            let line = line_result?;
            let parts: Vec<&str> = line.split_whitespace().collect();

            if parts.is_empty() {
                continue;
            }
            if parts.len() != 4 && parts.len() != 7 {
                return Err(parse_error(line_no, "expected 4 or 7 fields"));
            }

            let x = parse_field::<f64>(parts[1], line_no, "x")?;
            let y = parse_field::<f64>(parts[2], line_no, "y")?;
            let demand = parse_field::<f64>(parts[3], line_no, "demand")?;
            let mut node = Node::new(x, y, demand);

            if parts.len() == 7 {
                let early = parse_field::<f64>(parts[4], line_no, "tw_early")?;
                let late = parse_field::<f64>(parts[5], line_no, "tw_late")?;
                let service = parse_field::<f64>(parts[6], line_no, "service duration")?;
                node = node.with_time_window(early, late).with_service_duration(service);
            }

            nodes.push(node);
        }

        if nodes.is_empty() {
            return Err(parse_error(3, "instance has no depot"));
        }

        // Without an explicit fleet size every client may get its own vehicle
        let num_vehicles = max_vehicles.unwrap_or_else(|| nodes.len().saturating_sub(1).max(1));

        Ok(ProblemData::new(name, nodes, vehicle_capacity, num_vehicles))
    }
}

fn parse_error(line: usize, message: &str) -> Error {
    Error::Parse {
        line,
        message: message.to_string(),
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, line: usize, field: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| parse_error(line, &format!("invalid {}: {:?}", field, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_with_time_windows() {
        let input = "toy\n10 2\n0 0 0 0 0 100 0\n1 3 4 2 10 20 5\n2 6 8 3\n";
        let data = ProblemData::from_reader(input.as_bytes()).unwrap();

        assert_eq!(data.name, "toy");
        assert_eq!(data.num_clients(), 2);
        assert_eq!(data.num_vehicles, 2);
        assert_eq!(data.vehicle_capacity, 10.0);
        assert_eq!(data.distance(0, 1), 5.0);
        assert_eq!(data.duration(1, 0), 5.0);
        assert_eq!(data.node(1).tw_early, 10.0);
        assert_eq!(data.node(1).service_duration, 5.0);
        assert_eq!(data.node(2).tw_late, f64::MAX);
    }

    #[test]
    fn test_from_reader_reports_bad_line() {
        let input = "toy\n10\n0 0 0 0\n1 3 oops 2\n";
        match ProblemData::from_reader(input.as_bytes()) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_try_new_requires_depot() {
        let result = ProblemData::try_new("empty".to_string(), Vec::new(), 10.0, 1);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "nodes", .. })
        ));

        let data =
            ProblemData::try_new("depot".to_string(), vec![Node::new(0.0, 0.0, 0.0)], 10.0, 1)
                .unwrap();
        assert_eq!(data.num_clients(), 0);
    }

    #[test]
    fn test_with_distance_matrix_checks_shape() {
        let data = ProblemData::new(
            "m".to_string(),
            vec![Node::new(0.0, 0.0, 0.0), Node::new(1.0, 0.0, 1.0)],
            1.0,
            1,
        );
        assert!(data.clone().with_distance_matrix(vec![vec![0.0]]).is_err());

        let data = data
            .with_distance_matrix(vec![vec![0.0, 7.0], vec![7.0, 0.0]])
            .unwrap();
        assert_eq!(data.distance(0, 1), 7.0);
        assert_eq!(data.duration(0, 1), 7.0);
    }
}
