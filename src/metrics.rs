use crate::model::{BusinessInputs, ChartRow, DerivedMetrics};

pub fn compute(inputs: &BusinessInputs) -> DerivedMetrics {
    let gross_profit = inputs.total_revenue - inputs.cost_of_goods_sold;
    let net_profit = gross_profit - inputs.operating_expenses;
    let cash_flow = net_profit - inputs.initial_investment;

    // No investment means no meaningful return; report 0 instead of dividing by zero
    let roi = if inputs.initial_investment > 0.0 {
        (net_profit - inputs.initial_investment) / inputs.initial_investment * 100.0
    } else {
        0.0
    };

    let growth_rate = if inputs.visitors > 0 {
        inputs.new_customers as f64 / inputs.visitors as f64 * 100.0
    } else {
        0.0
    };

    let projected_revenue = inputs.total_revenue * (1.0 + growth_rate / 100.0);

    DerivedMetrics {
        gross_profit,
        net_profit,
        cash_flow,
        roi,
        growth_rate,
        projected_revenue,
    }
}

pub fn chart_rows(inputs: &BusinessInputs) -> [ChartRow; 3] {
    [
        ChartRow { category: "Total Revenue", value: inputs.total_revenue },
        ChartRow { category: "Marketing Spend", value: inputs.marketing_spend },
        ChartRow { category: "Customer Acquisition Cost", value: inputs.customer_acquisition_cost },
    ]
}
