// CPLEX LP text rendering of an OptimizationProblem
// Used for trace logging and the CLI's --emit-lp

use crate::domain::{
    models::OptimizationProblem,
    value_objects::OptimizationType,
};
use std::fmt::Write;

/// Renders `problem` as `Maximize … Subject To … Bounds … [General …] End`.
pub fn to_lp_string(problem: &OptimizationProblem) -> String {
    let names: Vec<&str> = problem.variables.iter().map(|v| v.name.as_str()).collect();
    let mut out = String::new();

    if !problem.name.is_empty() {
        let _ = writeln!(out, "\\ {}", problem.name);
    }

    out.push_str(match problem.objective.optimization_type {
        OptimizationType::Maximize => "Maximize\n",
        OptimizationType::Minimize => "Minimize\n",
    });
    let _ = writeln!(
        out,
        " obj: {}",
        linear_expression(&problem.objective.coefficients, &names)
    );

    out.push_str("Subject To\n");
    for (i, constraint) in problem.constraints.iter().enumerate() {
        let label = if constraint.name.is_empty() {
            format!("c{}", i)
        } else {
            constraint.name.clone()
        };
        let _ = writeln!(
            out,
            " {}: {} {} {}",
            label,
            linear_expression(&constraint.coefficients, &names),
            constraint.constraint_type.operator(),
            constraint.bound
        );
    }

    out.push_str("Bounds\n");
    for var in &problem.variables {
        let _ = match var.upper_bound {
            Some(upper) => writeln!(out, " {} <= {} <= {}", var.lower_bound, var.name, upper),
            None => writeln!(out, " {} >= {}", var.name, var.lower_bound),
        };
    }

    let integers: Vec<&str> = problem
        .variables
        .iter()
        .filter(|v| v.is_integer())
        .map(|v| v.name.as_str())
        .collect();
    if !integers.is_empty() {
        out.push_str("General\n");
        let _ = writeln!(out, " {}", integers.join(" "));
    }

    out.push_str("End\n");
    out
}

fn linear_expression(coefficients: &[f64], names: &[&str]) -> String {
    let mut expr = String::new();
    for (&coeff, name) in coefficients.iter().zip(names) {
        if coeff == 0.0 {
            continue;
        }
        let magnitude = coeff.abs();
        let sign = if coeff < 0.0 { "-" } else { "+" };
        if expr.is_empty() {
            if coeff < 0.0 {
                expr.push_str("- ");
            }
        } else {
            let _ = write!(expr, " {} ", sign);
        }
        if magnitude != 1.0 {
            let _ = write!(expr, "{} ", magnitude);
        }
        expr.push_str(name);
    }

    if expr.is_empty() {
        // LP files need at least one term per row
        if let Some(first) = names.first() {
            expr = format!("0 {}", first);
        }
    }
    expr
}
