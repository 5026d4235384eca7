//! Textual reporting.
//!
//! Turns solver output into the pieces downstream consumers read: the
//! one-line status (the literal `Infeasible` or the objective value, via
//! the [`SolveOutcome`](crate::models::SolveOutcome) `Display`), a
//! human-readable placement summary, and an `iteration,best` CSV of the
//! search trace.

use std::io;

use crate::evaluation::AssignmentEvaluator;
use crate::models::{Model, Placement};

/// Renders a multi-line summary of a placement.
///
/// Lists the objective, each selected warehouse with the demand routed to
/// it (against its supply or sized capacity when known), and the worst
/// delivery distance.
pub fn summary(model: &Model, placement: &Placement) -> String {
    let evaluator = AssignmentEvaluator::new(model);
    let assignment = placement.assignment();
    let loads = evaluator.warehouse_loads(assignment);

    let mut out = String::new();
    out.push_str(&format!("objective: {}\n", placement.objective()));

    for j in assignment.warehouses() {
        out.push_str(&format!("warehouse {}", model.name(j)));
        if let Some(loads) = &loads {
            out.push_str(&format!(": load {}", loads[j]));
            if let Some(capacities) = placement.capacities() {
                out.push_str(&format!(" / capacity {}", capacities[j]));
            } else if let Some(supply) = model.supply() {
                out.push_str(&format!(" / supply {}", supply[j]));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "worst delivery distance: {}\n",
        evaluator.max_delivery_distance(assignment)
    ));
    out
}

/// Writes a best-objective trace as `iteration,best` CSV rows.
///
/// Row 0 is the best of the initial population; each following row is the
/// best after one generation.
pub fn write_trace<W: io::Write>(writer: W, trace: &[f64]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["iteration", "best"])?;
    for (iteration, best) in trace.iter().enumerate() {
        wtr.write_record([iteration.to_string(), best.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::Assignment;

    fn model() -> Model {
        let mut dm = DistanceMatrix::new(3);
        dm.set_symmetric(0, 1, 1.0);
        dm.set_symmetric(1, 2, 2.0);
        dm.set_symmetric(0, 2, 3.0);
        Model::builder(vec!["A".into(), "B".into(), "C".into()], dm)
            .demand(vec![4.0, 2.0, 6.0])
            .supply(vec![10.0, 12.0, 5.0])
            .build()
            .unwrap()
    }

    #[test]
    fn test_summary_lists_warehouses_and_loads() {
        let model = model();
        let assignment = Assignment::nearest_active(model.distances(), &[1]);
        let placement = Placement::new(2.0, assignment);
        let text = summary(&model, &placement);
        assert!(text.contains("objective: 2"));
        assert!(text.contains("warehouse B: load 12 / supply 12"));
        assert!(text.contains("worst delivery distance: 2"));
    }

    #[test]
    fn test_summary_prefers_sized_capacity() {
        let model = model();
        let assignment = Assignment::nearest_active(model.distances(), &[1]);
        let placement = Placement::with_capacities(2.0, assignment, vec![0.0, 12.0, 0.0]);
        let text = summary(&model, &placement);
        assert!(text.contains("warehouse B: load 12 / capacity 12"));
    }

    #[test]
    fn test_write_trace_rows() {
        let mut buf = Vec::new();
        write_trace(&mut buf, &[5.0, 3.0, 3.0]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "iteration,best\n0,5\n1,3\n2,3\n");
    }
}
