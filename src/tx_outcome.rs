use crate::executor::WriteOutcome;

/// Result of a committed batch: one [`WriteOutcome`] per operation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOutcome {
    results: Vec<WriteOutcome>,
}

impl TxOutcome {
    #[must_use]
    pub fn new(results: Vec<WriteOutcome>) -> Self {
        Self { results }
    }

    #[must_use]
    pub fn results(&self) -> &[WriteOutcome] {
        &self.results
    }

    /// Outcome of the operation at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&WriteOutcome> {
        self.results.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Rows affected summed over the batch.
    #[must_use]
    pub fn total_rows_affected(&self) -> u64 {
        self.results.iter().map(|r| r.rows_affected).sum()
    }

    pub fn into_results(self) -> Vec<WriteOutcome> {
        self.results
    }
}
