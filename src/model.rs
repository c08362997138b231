use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessInputs {
    pub business_name: String,

    pub total_revenue: f64,
    pub marketing_spend: f64,
    pub cost_of_goods_sold: f64,
    pub operating_expenses: f64,
    pub customer_acquisition_cost: f64,
    pub conversion_rate: f64,  // Percent, 0..=100

    pub new_customers: u64,
    pub visitors: u64,

    pub initial_investment: f64,
}

impl Default for BusinessInputs {
    fn default() -> Self {
        BusinessInputs {
            business_name: "My Business".to_string(),
            total_revenue: 0.0,
            marketing_spend: 0.0,
            cost_of_goods_sold: 0.0,
            operating_expenses: 0.0,
            customer_acquisition_cost: 0.0,
            conversion_rate: 0.0,
            new_customers: 0,
            visitors: 0,
            initial_investment: 0.0,
        }
    }
}

impl BusinessInputs {
    /// Applies the form's bounds to values that did not come through the form
    /// widgets (e.g. a JSON file). Negative or non-finite amounts become 0 and
    /// the conversion rate is clamped to 0..=100.
    pub fn sanitized(self) -> Self {
        BusinessInputs {
            total_revenue: non_negative(self.total_revenue),
            marketing_spend: non_negative(self.marketing_spend),
            cost_of_goods_sold: non_negative(self.cost_of_goods_sold),
            operating_expenses: non_negative(self.operating_expenses),
            customer_acquisition_cost: non_negative(self.customer_acquisition_cost),
            conversion_rate: non_negative(self.conversion_rate).min(100.0),
            initial_investment: non_negative(self.initial_investment),
            ..self
        }
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub gross_profit: f64,
    pub net_profit: f64,
    pub cash_flow: f64,
    pub roi: f64,          // Percent
    pub growth_rate: f64,  // Percent
    pub projected_revenue: f64,
}

/// One bar of the revenue/marketing overview chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRow {
    pub category: &'static str,
    pub value: f64,
}
