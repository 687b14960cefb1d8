use super::LdaError;

/// Validated class labels. Labels are required to already be the canonical
/// indices 0..k, so no remapping table is carried besides the class count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelIndex {
    pub k : usize
}

impl LabelIndex {

    /// Validates the label vector against the n rows of the data matrix.
    pub fn new(y : &[i64], n : usize) -> Result<Self, LdaError> {
        if y.len() != n {
            return Err(LdaError::dims("label vector", n, y.len()));
        }
        let mut labels = y.to_vec();
        labels.sort_unstable();
        labels.dedup();

        let min = match labels.first() {
            Some(min) => *min,
            None => return Err(LdaError::InsufficientClasses { found : 0 })
        };
        if min != 0 {
            return Err(LdaError::InvalidLabelRange { label : min });
        }
        for w in labels.windows(2) {
            if w[1] - w[0] > 1 {
                return Err(LdaError::MissingClass { label : w[0] + 1 });
            }
        }
        let k = labels.len();
        if k < 2 {
            return Err(LdaError::InsufficientClasses { found : k });
        }
        Ok(Self { k })
    }

}
