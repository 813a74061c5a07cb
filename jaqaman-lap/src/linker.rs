use crate::{solve_lap, Error, LinkingCostMatrix};
use log::*;
use nalgebra::DMatrix;

/// An accepted link from a source to a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment<K> {
    pub source: K,
    pub target: K,
    /// The linking cost from the cost matrix.
    pub cost: f64,
}

/// Links the sources of a [`LinkingCostMatrix`] to its targets.
///
/// The input must be checked with [`JaqamanLinker::check_input`] before calling
/// [`JaqamanLinker::process`]. Sources and targets assigned to their no-link alternative are
/// not part of the result.
#[derive(Debug, Clone)]
pub struct JaqamanLinker<K> {
    matrix: LinkingCostMatrix<K>,
    lap: Option<DMatrix<f64>>,
    result: Vec<Assignment<K>>,
}

impl<K: Clone> JaqamanLinker<K> {
    pub fn new(matrix: LinkingCostMatrix<K>) -> Self {
        Self {
            matrix,
            lap: None,
            result: vec![],
        }
    }

    /// Builds and validates the assignment matrix.
    pub fn check_input(&mut self) -> Result<(), Error> {
        let alternative_cost = self.matrix.alternative_cost();
        if !(alternative_cost.is_finite() && alternative_cost >= 0.0) {
            return Err(Error::InvalidCost(alternative_cost));
        }
        let lap = self.matrix.lap_matrix();
        if let Some(&cost) = lap.iter().find(|cost| cost.is_nan() || **cost < 0.0) {
            return Err(Error::InvalidCost(cost));
        }
        self.lap = Some(lap);
        Ok(())
    }

    /// Solves the assignment. The result is available from [`JaqamanLinker::result`].
    pub fn process(&mut self) -> Result<(), Error> {
        let lap = self.lap.as_ref().ok_or(Error::NotValidated)?;
        let assignment = solve_lap(lap)?;

        let sources = self.matrix.sources();
        let targets = self.matrix.targets();
        self.result = assignment
            .iter()
            .take(sources.len())
            .enumerate()
            .filter(|&(_, &col)| col < targets.len())
            .map(|(row, &col)| Assignment {
                source: sources[row].clone(),
                target: targets[col].clone(),
                cost: lap[(row, col)],
            })
            .collect();
        trace!(
            "linked {} of {} sources to {} targets",
            self.result.len(),
            sources.len(),
            targets.len()
        );
        Ok(())
    }

    pub fn result(&self) -> &[Assignment<K>] {
        &self.result
    }

    pub fn into_result(self) -> Vec<Assignment<K>> {
        self.result
    }

    pub fn matrix(&self) -> &LinkingCostMatrix<K> {
        &self.matrix
    }
}
