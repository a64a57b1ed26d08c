use statrs::statistics::Statistics;

/// Shared statistics utilities for classification metrics.
pub struct Stats;

impl Stats {
    /// Mean and population standard deviation of the finite values.
    ///
    /// Returns `None` when no finite value is present.
    pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        // statrs: f64 boundary for statistical library
        let mean = finite.iter().mean();
        let std_dev = finite.iter().population_std_dev();
        Some((mean, std_dev))
    }

    /// `numerator / denominator`, or `None` when the denominator is zero.
    pub fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
        if denominator == 0 {
            None
        } else {
            Some(numerator as f64 / denominator as f64)
        }
    }

    /// Area under the ROC curve for binary labels.
    ///
    /// Computed as the normalized Mann-Whitney U statistic using mid-ranks,
    /// which equals the trapezoidal area and scores tied pairs as one half.
    /// Returns `None` when there are no positives or no negatives.
    pub fn roc_auc(scores: &[f64], positives: &[bool]) -> Option<f64> {
        debug_assert_eq!(scores.len(), positives.len());
        let n_pos = positives.iter().filter(|&&p| p).count();
        let n_neg = positives.len() - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return None;
        }

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

        let mut positive_rank_sum = 0.0;
        let mut i = 0;
        while i < order.len() {
            let mut j = i;
            while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
                j += 1;
            }
            // Ranks are 1-based; ties share the average rank of their run
            let mid_rank = (i + j) as f64 / 2.0 + 1.0;
            let tied_positives = order[i..=j].iter().filter(|&&idx| positives[idx]).count();
            positive_rank_sum += mid_rank * tied_positives as f64;
            i = j + 1;
        }

        let n_pos = n_pos as f64;
        let n_neg = n_neg as f64;
        Some((positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
    }
}

/// One-vs-rest confusion counts for a single class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl ConfusionCounts {
    /// Counts for `class` treating every other label as negative.
    pub fn for_class(y_true: &[&str], y_pred: &[&str], class: &str) -> Self {
        let mut counts = ConfusionCounts::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t == class, p == class) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (true, false) => counts.false_negatives += 1,
                (false, false) => counts.true_negatives += 1,
            }
        }
        counts
    }

    /// Counts for boolean labels where `true` is the positive class.
    pub fn from_binary(y_true: &[bool], y_pred: &[bool]) -> Self {
        let mut counts = ConfusionCounts::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t, p) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (true, false) => counts.false_negatives += 1,
                (false, false) => counts.true_negatives += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    /// (TP + TN) / total; undefined on no rows.
    pub fn accuracy(&self) -> Option<f64> {
        Stats::ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// 0/0 counts as 0.
    pub fn precision(&self) -> f64 {
        Stats::ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
        .unwrap_or(0.0)
    }

    /// 0/0 counts as 0.
    pub fn recall(&self) -> f64 {
        Stats::ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
        .unwrap_or(0.0)
    }

    /// 2TP / (2TP + FP + FN); 0/0 counts as 0.
    pub fn f1(&self) -> f64 {
        Stats::ratio(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
        .unwrap_or(0.0)
    }

    /// TN / (TN + FP); undefined when the class covers every row.
    pub fn specificity(&self) -> Option<f64> {
        Stats::ratio(
            self.true_negatives,
            self.true_negatives + self.false_positives,
        )
    }
}
