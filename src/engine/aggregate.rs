use super::{AggregateTally, RepositoryResult};

impl AggregateTally {
    /// Add one repository's counts into the running tally. Folding is
    /// commutative and associative: any order over the same results yields
    /// the same totals.
    pub fn fold(&mut self, result: &RepositoryResult) {
        for (author, count) in &result.author_counts {
            *self.author_totals.entry(author.clone()).or_insert(0) += count;
        }
    }

    pub fn fold_all<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a RepositoryResult>,
    {
        let mut tally = Self::default();
        for result in results {
            tally.fold(result);
        }
        tally
    }

    pub fn total_commits(&self) -> u64 {
        self.author_totals.values().sum()
    }

    pub fn unique_contributors(&self) -> usize {
        self.author_totals.len()
    }
}
