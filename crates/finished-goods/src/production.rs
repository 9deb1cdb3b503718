use millboard_core::{ProductionPlanRecord, round_to, safe_divide};

/// Production variance % = `(Σactual − Σplanned) / Σplanned × 100`, one decimal.
///
/// `sku` narrows the plan lines; `0.0` when nothing matches or nothing was planned.
pub fn production_variance(plans: &[ProductionPlanRecord], sku: Option<&str>) -> f64 {
    let (planned, actual) = plans
        .iter()
        .filter(|p| sku.is_none_or(|s| p.sku_id == s))
        .fold((0.0, 0.0), |(planned, actual), p| {
            (planned + p.planned_quantity, actual + p.actual_produced_quantity)
        });

    if planned == 0.0 {
        return 0.0;
    }
    round_to(safe_divide(actual - planned, planned) * 100.0, 1)
}
