use crate::Error;
use nalgebra::DMatrix;

/// Solves the linear assignment problem on a square cost matrix.
///
/// Returns, for every row, the column it is assigned to, such that the total cost is minimal.
/// Entries equal to `f64::INFINITY` are forbidden assignments. If no assignment avoids all
/// forbidden entries, [`Error::Infeasible`] is returned.
///
/// This is the shortest augmenting path formulation of the Hungarian algorithm with row and
/// column potentials, running in `O(n³)`.
pub fn solve_lap(costs: &DMatrix<f64>) -> Result<Vec<usize>, Error> {
    let (rows, cols) = costs.shape();
    if rows != cols {
        return Err(Error::NotSquare { rows, cols });
    }
    if let Some(&cost) = costs
        .iter()
        .find(|cost| cost.is_nan() || **cost == f64::NEG_INFINITY)
    {
        return Err(Error::InvalidCost(cost));
    }
    let n = rows;

    // Row and column potentials. Index 0 is a virtual column used as the path root.
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    // The row (1-based) currently assigned to each column, 0 when free.
    let mut column_owner = vec![0usize; n + 1];
    // The previous column on the current augmenting path.
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        column_owner[0] = row;
        let mut current = 0;
        let mut slack = vec![f64::INFINITY; n + 1];
        let mut visited = vec![false; n + 1];

        loop {
            visited[current] = true;
            let owner = column_owner[current];
            let mut delta = f64::INFINITY;
            let mut next = 0;
            for col in 1..=n {
                if visited[col] {
                    continue;
                }
                let reduced = costs[(owner - 1, col - 1)] - u[owner] - v[col];
                if reduced < slack[col] {
                    slack[col] = reduced;
                    way[col] = current;
                }
                if slack[col] < delta {
                    delta = slack[col];
                    next = col;
                }
            }
            if !delta.is_finite() {
                return Err(Error::Infeasible);
            }

            for col in 0..=n {
                if visited[col] {
                    u[column_owner[col]] += delta;
                    v[col] -= delta;
                } else {
                    slack[col] -= delta;
                }
            }

            current = next;
            if column_owner[current] == 0 {
                break;
            }
        }

        // Flip the augmenting path.
        while current != 0 {
            let previous = way[current];
            column_owner[current] = column_owner[previous];
            current = previous;
        }
    }

    let mut assignment = vec![0; n];
    for col in 1..=n {
        assignment[column_owner[col] - 1] = col - 1;
    }
    Ok(assignment)
}
