use crate::Error;
use float_ord::FloatOrd;
use log::*;
use nalgebra::DMatrix;

/// Parameters of the linking cost matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostMatrixSettings {
    /// Only costs strictly below this value are kept as possible links.
    pub cost_threshold: f64,
    /// The no-link cost is this factor times the `percentile` of the kept costs.
    pub alternative_cost_factor: f64,
    /// In `(0, 1]`. `1.0` means the largest kept cost.
    pub percentile: f64,
}

impl CostMatrixSettings {
    pub fn new(cost_threshold: f64, alternative_cost_factor: f64, percentile: f64) -> Self {
        Self {
            cost_threshold,
            alternative_cost_factor,
            percentile,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.alternative_cost_factor.is_finite() && self.alternative_cost_factor > 0.0) {
            return Err(Error::InvalidAlternativeFactor(
                self.alternative_cost_factor,
            ));
        }
        if !(self.percentile > 0.0 && self.percentile <= 1.0) {
            return Err(Error::InvalidPercentile(self.percentile));
        }
        Ok(())
    }
}

/// The nearest-rank percentile of `values`, with `p` in `(0, 1]`.
pub fn percentile(values: &[f64], p: f64) -> Result<f64, Error> {
    if values.is_empty() {
        return Err(Error::EmptyCosts);
    }
    if !(p > 0.0 && p <= 1.0) {
        return Err(Error::InvalidPercentile(p));
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by_key(|&value| FloatOrd(value));
    let rank = ((p * sorted.len() as f64).ceil() as usize).clamp(1, sorted.len());
    Ok(sorted[rank - 1])
}

/// The sparse costs of linking a set of sources to a set of targets.
///
/// Rows and columns only exist for the sources and targets that have at least one cost below
/// the threshold. Entries are stored as `(row, column, cost)` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkingCostMatrix<K> {
    sources: Vec<K>,
    targets: Vec<K>,
    entries: Vec<(usize, usize, f64)>,
    alternative_cost: f64,
}

impl<K: Clone> LinkingCostMatrix<K> {
    /// Evaluates `cost` for every source and target and keeps the costs below the threshold.
    ///
    /// Costs that are not below the threshold, including infinite and NaN costs, are dropped.
    /// If nothing is kept, the matrix is empty, which is not an error.
    pub fn new<F>(
        sources: &[K],
        targets: &[K],
        mut cost_of: F,
        settings: &CostMatrixSettings,
    ) -> Result<Self, Error>
    where
        F: FnMut(&K, &K) -> f64,
    {
        settings.validate()?;
        let mut kept = vec![];
        for (i, source) in sources.iter().enumerate() {
            for (j, target) in targets.iter().enumerate() {
                let cost = cost_of(source, target);
                if cost < settings.cost_threshold {
                    kept.push((i, j, cost));
                }
            }
        }
        let rows: Vec<usize> = kept.iter().map(|&(i, _, _)| i).collect();
        let cols: Vec<usize> = kept.iter().map(|&(_, j, _)| j).collect();
        let costs: Vec<f64> = kept.iter().map(|&(_, _, cost)| cost).collect();
        Self::from_sparse(sources, targets, &rows, &cols, &costs, settings)
    }

    /// Builds the matrix from already computed costs.
    ///
    /// `rows[e]` and `cols[e]` index into `sources` and `targets` for the cost `costs[e]`.
    /// Sources and targets that have no entry are left out of the matrix.
    pub fn from_sparse(
        sources: &[K],
        targets: &[K],
        rows: &[usize],
        cols: &[usize],
        costs: &[f64],
        settings: &CostMatrixSettings,
    ) -> Result<Self, Error> {
        settings.validate()?;
        for len in [rows.len(), cols.len()] {
            if len != costs.len() {
                return Err(Error::LengthMismatch {
                    expected: costs.len(),
                    found: len,
                });
            }
        }
        if let Some(&max) = rows.iter().max() {
            if max >= sources.len() {
                return Err(Error::LengthMismatch {
                    expected: sources.len(),
                    found: max + 1,
                });
            }
        }
        if let Some(&max) = cols.iter().max() {
            if max >= targets.len() {
                return Err(Error::LengthMismatch {
                    expected: targets.len(),
                    found: max + 1,
                });
            }
        }
        if let Some(&cost) = costs.iter().find(|cost| !(cost.is_finite() && **cost >= 0.0)) {
            return Err(Error::InvalidCost(cost));
        }
        if costs.is_empty() {
            return Ok(Self {
                sources: vec![],
                targets: vec![],
                entries: vec![],
                alternative_cost: 0.0,
            });
        }

        // Compact the used sources and targets into consecutive rows and columns.
        let mut source_used = vec![false; sources.len()];
        let mut target_used = vec![false; targets.len()];
        for (&i, &j) in rows.iter().zip(cols) {
            source_used[i] = true;
            target_used[j] = true;
        }
        let (row_of, used_sources) = compact(&source_used, sources);
        let (col_of, used_targets) = compact(&target_used, targets);

        let mut entries: Vec<(usize, usize, f64)> = rows
            .iter()
            .zip(cols)
            .zip(costs)
            .filter_map(|((&i, &j), &cost)| Some((row_of[i]?, col_of[j]?, cost)))
            .collect();
        entries.sort_unstable_by_key(|&(row, col, _)| (row, col));
        entries.dedup_by_key(|&mut (row, col, _)| (row, col));

        let alternative_cost =
            settings.alternative_cost_factor * percentile(costs, settings.percentile)?;
        trace!(
            "cost matrix with {} sources, {} targets, {} links, alternative cost {}",
            used_sources.len(),
            used_targets.len(),
            entries.len(),
            alternative_cost
        );
        Ok(Self {
            sources: used_sources,
            targets: used_targets,
            entries,
            alternative_cost,
        })
    }

    /// The sources, one per row.
    pub fn sources(&self) -> &[K] {
        &self.sources
    }

    /// The targets, one per column.
    pub fn targets(&self) -> &[K] {
        &self.targets
    }

    pub fn entries(&self) -> &[(usize, usize, f64)] {
        &self.entries
    }

    /// The cost of not linking an object.
    pub fn alternative_cost(&self) -> f64 {
        self.alternative_cost
    }

    pub fn cost(&self, row: usize, col: usize) -> Option<f64> {
        self.entries
            .binary_search_by_key(&(row, col), |&(r, c, _)| (r, c))
            .ok()
            .map(|ix| self.entries[ix].2)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full square assignment matrix, with `f64::INFINITY` for forbidden entries.
    pub fn lap_matrix(&self) -> DMatrix<f64> {
        let n = self.sources.len();
        let m = self.targets.len();
        let mut matrix = DMatrix::from_element(n + m, n + m, f64::INFINITY);
        let min_cost = self
            .entries
            .iter()
            .map(|&(_, _, cost)| FloatOrd(cost))
            .min()
            .map_or(0.0, |FloatOrd(cost)| cost);
        for &(row, col, cost) in &self.entries {
            matrix[(row, col)] = cost;
            matrix[(n + col, m + row)] = min_cost;
        }
        for i in 0..n {
            matrix[(i, m + i)] = self.alternative_cost;
        }
        for j in 0..m {
            matrix[(n + j, j)] = self.alternative_cost;
        }
        matrix
    }
}

/// Maps the marked indices to consecutive indices and collects the marked items.
fn compact<K: Clone>(used: &[bool], items: &[K]) -> (Vec<Option<usize>>, Vec<K>) {
    let mut kept = vec![];
    let map = used
        .iter()
        .zip(items)
        .map(|(&used, item)| {
            used.then(|| {
                kept.push(item.clone());
                kept.len() - 1
            })
        })
        .collect();
    (map, kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn settings(cost_threshold: f64) -> CostMatrixSettings {
        CostMatrixSettings::new(cost_threshold, 2.0, 1.0)
    }

    #[test]
    fn keeps_only_costs_below_threshold() {
        let sources = [0.0, 10.0, 50.0];
        let targets = [1.0, 11.0];
        let matrix = LinkingCostMatrix::new(
            &sources,
            &targets,
            |a: &f64, b: &f64| (a - b).abs(),
            &settings(5.0),
        )
        .unwrap();
        // The source at 50 has no link below the threshold and gets no row.
        assert_eq!(matrix.sources(), &[0.0, 10.0]);
        assert_eq!(matrix.targets(), &[1.0, 11.0]);
        assert_eq!(matrix.entries(), &[(0, 0, 1.0), (1, 1, 1.0)]);
        assert_eq!(matrix.cost(0, 1), None);
        assert_relative_eq!(matrix.alternative_cost(), 2.0);
    }

    #[test]
    fn infinite_costs_are_dropped() {
        let matrix = LinkingCostMatrix::new(
            &[0],
            &[1, 2],
            |_: &i32, &b: &i32| if b == 1 { f64::INFINITY } else { 3.0 },
            &settings(f64::INFINITY),
        )
        .unwrap();
        assert_eq!(matrix.targets(), &[2]);
        assert_relative_eq!(matrix.alternative_cost(), 6.0);
    }

    #[test]
    fn no_kept_cost_gives_empty_matrix() {
        let matrix =
            LinkingCostMatrix::new(&[0, 1], &[2, 3], |_: &i32, _: &i32| 100.0, &settings(10.0))
                .unwrap();
        assert!(matrix.is_empty());
        assert!(matrix.sources().is_empty());
        assert_eq!(matrix.lap_matrix().shape(), (0, 0));
    }

    #[test]
    fn lap_matrix_layout() {
        let matrix = LinkingCostMatrix::from_sparse(
            &['a', 'b'],
            &['x'],
            &[0, 1],
            &[0, 0],
            &[1.0, 3.0],
            &settings(10.0),
        )
        .unwrap();
        let lap = matrix.lap_matrix();
        let inf = f64::INFINITY;
        #[rustfmt::skip]
        let expected = DMatrix::from_row_slice(3, 3, &[
            1.0, 6.0, inf,
            3.0, inf, 6.0,
            6.0, 1.0, 1.0,
        ]);
        assert_eq!(lap, expected);
    }

    #[test]
    fn percentile_uses_nearest_rank() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(percentile(&values, 1.0).unwrap(), 4.0);
        assert_relative_eq!(percentile(&values, 0.5).unwrap(), 2.0);
        assert_relative_eq!(percentile(&values, 0.01).unwrap(), 1.0);
        assert_eq!(percentile(&[], 1.0), Err(Error::EmptyCosts));
        assert_eq!(percentile(&values, 0.0), Err(Error::InvalidPercentile(0.0)));
    }

    #[test]
    fn rejects_inconsistent_input() {
        let result = LinkingCostMatrix::from_sparse(
            &[0, 1],
            &[0],
            &[0, 1],
            &[0],
            &[1.0, 1.0],
            &settings(10.0),
        );
        assert_eq!(
            result,
            Err(Error::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
        let result =
            LinkingCostMatrix::from_sparse(&[0], &[0], &[0], &[0], &[-1.0], &settings(10.0));
        assert_eq!(result, Err(Error::InvalidCost(-1.0)));
        let result = LinkingCostMatrix::<i32>::from_sparse(
            &[],
            &[],
            &[],
            &[],
            &[],
            &CostMatrixSettings::new(10.0, 0.0, 1.0),
        );
        assert_eq!(result, Err(Error::InvalidAlternativeFactor(0.0)));
    }
}
