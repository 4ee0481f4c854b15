use serde::{Deserialize, Serialize};

/// Program rules the aggregation and eligibility engines are measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditPolicy {
    pub graduation_credits: f64,
    pub cap_external: f64,
    pub cap_language: f64,
    pub cap_cross_total: f64,
    /// Smallest single-course credit that qualifies an ordinary judge-exam subject.
    pub judge_min_credit: f64,
    /// ROC admission year printed in front of transfer-credited rows.
    pub admission_year: String,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self {
            graduation_credits: 48.0,
            cap_external: 9.0,
            cap_language: 6.0,
            cap_cross_total: 15.0,
            judge_min_credit: 2.0,
            admission_year: "114".to_string(),
        }
    }
}
