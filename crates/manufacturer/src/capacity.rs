//! Production capacity planning.

use chrono::{DateTime, Duration, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

/// Per-product production capacity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCapacity {
    /// Product this capacity record applies to.
    pub product_id: ProductId,
    /// Units the line can produce per day.
    pub daily_capacity: u32,
    /// Base lead time in days before production output becomes available
    /// (tooling, queue, shipping prep).
    pub lead_time_days: u32,
    /// Inactive records behave as if the product were not configured.
    pub active: bool,
}

impl ProductionCapacity {
    /// Creates an active capacity record.
    pub fn new(product_id: ProductId, daily_capacity: u32, lead_time_days: u32) -> Self {
        Self {
            product_id,
            daily_capacity,
            lead_time_days,
            active: true,
        }
    }

    /// Computes a production plan for `requested` units given `available`
    /// stock already on hand.
    ///
    /// If stock covers the request the plan is immediate (lead time 0).
    /// Otherwise the shortfall is scheduled at `daily_capacity` units per
    /// day on top of the base lead time; partial days round *up* — one unit
    /// over a day boundary consumes a full extra day. When `requested_by`
    /// is given and the estimate lands after it, the plan reports
    /// infeasible while still surfacing the computed estimate.
    pub fn plan(
        &self,
        requested: u32,
        available: u32,
        requested_by: Option<DateTime<Utc>>,
    ) -> ProductionPlan {
        let now = Utc::now();

        if available >= requested {
            return ProductionPlan {
                can_produce: true,
                available_stock: available,
                units_to_produce: 0,
                days_needed: 0,
                total_lead_time_days: 0,
                estimated_completion: now,
                message: format!("{} units available from stock", available),
            };
        }

        let units_to_produce = requested - available;
        let days_needed = units_to_produce.div_ceil(self.daily_capacity);
        let total_lead_time_days = self.lead_time_days + days_needed;
        let estimated_completion = now + Duration::days(i64::from(total_lead_time_days));

        let meets_deadline = requested_by.is_none_or(|deadline| estimated_completion <= deadline);

        let message = if meets_deadline {
            format!(
                "{} units to produce, estimated completion in {} days",
                units_to_produce, total_lead_time_days
            )
        } else {
            format!(
                "Cannot meet requested date: {} units need {} days to produce",
                units_to_produce, total_lead_time_days
            )
        };

        ProductionPlan {
            can_produce: meets_deadline,
            available_stock: available,
            units_to_produce,
            days_needed,
            total_lead_time_days,
            estimated_completion,
            message,
        }
    }
}

/// Outcome of a capacity planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlan {
    /// Whether the request is feasible (in stock, or producible before the
    /// requested date if one was given).
    pub can_produce: bool,
    /// Stock already available when the plan was computed.
    pub available_stock: u32,
    /// Shortfall that has to be manufactured.
    pub units_to_produce: u32,
    /// Production days for the shortfall (ceiling of units / daily capacity).
    pub days_needed: u32,
    /// Base lead time plus production days; 0 for in-stock requests.
    pub total_lead_time_days: u32,
    /// When the shortfall is expected to be ready.
    pub estimated_completion: DateTime<Utc>,
    /// Human-readable summary of the plan.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(daily: u32, lead: u32) -> ProductionCapacity {
        ProductionCapacity::new(ProductId::new("SKU-001"), daily, lead)
    }

    #[test]
    fn in_stock_request_is_immediate() {
        let plan = capacity(50, 3).plan(10, 25, None);
        assert!(plan.can_produce);
        assert_eq!(plan.units_to_produce, 0);
        assert_eq!(plan.days_needed, 0);
        assert_eq!(plan.total_lead_time_days, 0);
    }

    #[test]
    fn shortfall_adds_production_days_to_lead_time() {
        // 60 requested, 10 available: 50 units at 50/day is exactly one
        // day, plus the 3-day base lead time.
        let plan = capacity(50, 3).plan(60, 10, None);
        assert!(plan.can_produce);
        assert_eq!(plan.available_stock, 10);
        assert_eq!(plan.units_to_produce, 50);
        assert_eq!(plan.days_needed, 1);
        assert_eq!(plan.total_lead_time_days, 4);
    }

    #[test]
    fn partial_days_round_up() {
        // A single unit still consumes a whole production day.
        let plan = capacity(50, 0).plan(1, 0, None);
        assert_eq!(plan.units_to_produce, 1);
        assert_eq!(plan.days_needed, 1);

        // 51 units at 50/day spill into a second day.
        let plan = capacity(50, 0).plan(51, 0, None);
        assert_eq!(plan.days_needed, 2);
    }

    #[test]
    fn exact_multiple_does_not_round_up() {
        let plan = capacity(50, 0).plan(100, 0, None);
        assert_eq!(plan.days_needed, 2);
    }

    #[test]
    fn missed_deadline_is_infeasible_but_still_estimated() {
        let deadline = Utc::now() + Duration::days(2);
        let plan = capacity(50, 3).plan(60, 10, Some(deadline));
        assert!(!plan.can_produce);
        // The estimate is still surfaced for the caller.
        assert_eq!(plan.total_lead_time_days, 4);
        assert!(plan.estimated_completion > deadline);
    }

    #[test]
    fn generous_deadline_is_feasible() {
        let deadline = Utc::now() + Duration::days(30);
        let plan = capacity(50, 3).plan(60, 10, Some(deadline));
        assert!(plan.can_produce);
    }
}
