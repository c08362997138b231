use serde::{Deserialize, Serialize};
use crate::model::{BusinessInputs, DerivedMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Conversion rate (percent) below which conversions count as low.
    pub min_conversion_rate: f64,
    /// Share of revenue above which marketing spend counts as high.
    pub max_marketing_share: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            min_conversion_rate: 5.0,
            max_marketing_share: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    EnterMoreData,

    PerformingWell,
    RoiPositive,
    CashFlowPositive,
    ConversionHealthy,

    NegativeRoi,
    NegativeCashFlow,
    LowConversion,
    HighMarketingSpend,
}

impl Advice {
    pub fn message(self) -> &'static str {
        match self {
            Advice::EnterMoreData => "💡 Enter more data for recommendations.",
            Advice::PerformingWell => "✅ Your business is performing well! Keep up the great work and continue optimizing for sustained growth.",
            Advice::RoiPositive => "✅ Your ROI is positive, indicating a good return on your investment!",
            Advice::CashFlowPositive => "✅ Your cash flow is positive, which means your business is generating more cash than it's spending!",
            Advice::ConversionHealthy => "✅ Your conversion rate is healthy, showing effective customer engagement!",
            Advice::NegativeRoi => "Your ROI is negative. Consider reducing costs or increasing revenue streams to improve profitability.",
            Advice::NegativeCashFlow => "Your cash flow is negative. You may need to adjust pricing or expenses to improve liquidity.",
            Advice::LowConversion => "Your conversion rate is low. Optimize your website and marketing strategy to increase conversions.",
            Advice::HighMarketingSpend => "Marketing spend is high relative to revenue. Optimize your ad spend for better efficiency.",
        }
    }

    pub fn is_affirmation(self) -> bool {
        matches!(
            self,
            Advice::PerformingWell
                | Advice::RoiPositive
                | Advice::CashFlowPositive
                | Advice::ConversionHealthy
        )
    }
}

/// Evaluates the rule list against the derived metrics.
///
/// Corrective rules are collected first. Affirmations are then inserted at
/// the front one at a time, so when the business is not performing well
/// overall the last affirmation evaluated (conversion) ends up first.
pub fn recommend(
    inputs: &BusinessInputs,
    metrics: &DerivedMetrics,
    thresholds: &Thresholds,
) -> Vec<Advice> {
    if inputs.total_revenue == 0.0 {
        return vec![Advice::EnterMoreData];
    }

    let conversion_ok = inputs.conversion_rate >= thresholds.min_conversion_rate;
    let mut out = Vec::new();

    if metrics.roi < 0.0 {
        out.push(Advice::NegativeRoi);
    }
    if metrics.cash_flow < 0.0 {
        out.push(Advice::NegativeCashFlow);
    }
    if !conversion_ok {
        out.push(Advice::LowConversion);
    }
    if inputs.total_revenue > 0.0
        && inputs.marketing_spend / inputs.total_revenue > thresholds.max_marketing_share
    {
        out.push(Advice::HighMarketingSpend);
    }

    let performing_well = inputs.total_revenue > 0.0
        && metrics.roi > 0.0
        && metrics.cash_flow > 0.0
        && conversion_ok;

    if performing_well {
        out.insert(0, Advice::PerformingWell);
    } else {
        if metrics.roi > 0.0 {
            out.insert(0, Advice::RoiPositive);
        }
        if metrics.cash_flow > 0.0 {
            out.insert(0, Advice::CashFlowPositive);
        }
        if conversion_ok {
            out.insert(0, Advice::ConversionHealthy);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute;

    fn advise(inputs: &BusinessInputs) -> Vec<Advice> {
        recommend(inputs, &compute(inputs), &Thresholds::default())
    }

    #[test]
    fn zero_revenue_asks_for_more_data() {
        let inputs = BusinessInputs {
            marketing_spend: 900.0,
            initial_investment: 10.0,
            conversion_rate: 1.0,
            ..Default::default()
        };

        assert_eq!(advise(&inputs), vec![Advice::EnterMoreData]);
    }

    #[test]
    fn healthy_store_is_performing_well() {
        let inputs = BusinessInputs {
            total_revenue: 1000.0,
            marketing_spend: 100.0,
            cost_of_goods_sold: 400.0,
            operating_expenses: 200.0,
            conversion_rate: 10.0,
            new_customers: 50,
            visitors: 500,
            initial_investment: 100.0,
            ..Default::default()
        };

        assert_eq!(advise(&inputs), vec![Advice::PerformingWell]);
    }

    #[test]
    fn performing_well_still_flags_marketing_overspend() {
        let inputs = BusinessInputs {
            total_revenue: 1000.0,
            marketing_spend: 400.0,
            conversion_rate: 10.0,
            initial_investment: 100.0,
            ..Default::default()
        };

        assert_eq!(
            advise(&inputs),
            vec![Advice::PerformingWell, Advice::HighMarketingSpend]
        );
    }

    #[test]
    fn losing_store_gets_correctives() {
        let inputs = BusinessInputs {
            total_revenue: 1000.0,
            cost_of_goods_sold: 1200.0,
            initial_investment: 100.0,
            conversion_rate: 10.0,
            ..Default::default()
        };
        let advice = advise(&inputs);

        assert!(advice.contains(&Advice::NegativeRoi));
        assert!(advice.contains(&Advice::NegativeCashFlow));
        assert!(!advice.contains(&Advice::PerformingWell));
        assert_eq!(
            advice,
            vec![Advice::ConversionHealthy, Advice::NegativeRoi, Advice::NegativeCashFlow]
        );
    }

    #[test]
    fn affirmations_are_prepended_in_reverse() {
        // Positive ROI and cash flow but weak conversion
        let inputs = BusinessInputs {
            total_revenue: 1000.0,
            initial_investment: 100.0,
            conversion_rate: 2.0,
            ..Default::default()
        };

        assert_eq!(
            advise(&inputs),
            vec![Advice::CashFlowPositive, Advice::RoiPositive, Advice::LowConversion]
        );
    }

    #[test]
    fn no_investment_lists_conversion_before_cash_flow() {
        // ROI is 0 without investment, so a profitable store is never "performing well"
        let inputs = BusinessInputs {
            total_revenue: 1000.0,
            conversion_rate: 10.0,
            ..Default::default()
        };
        let metrics = compute(&inputs);

        assert_eq!(metrics.roi, 0.0);
        assert_eq!(
            recommend(&inputs, &metrics, &Thresholds::default()),
            vec![Advice::ConversionHealthy, Advice::CashFlowPositive]
        );
    }

    #[test]
    fn conversion_is_listed_before_roi() {
        // With real inputs ROI and cash flow share a sign; split them by hand
        let inputs = BusinessInputs {
            total_revenue: 1000.0,
            conversion_rate: 6.0,
            ..Default::default()
        };
        let metrics = DerivedMetrics {
            cash_flow: 0.0,
            roi: 50.0,
            ..compute(&inputs)
        };

        assert_eq!(
            recommend(&inputs, &metrics, &Thresholds::default()),
            vec![Advice::ConversionHealthy, Advice::RoiPositive]
        );
    }

    #[test]
    fn thresholds_are_configurable() {
        let inputs = BusinessInputs {
            total_revenue: 1000.0,
            marketing_spend: 200.0,
            conversion_rate: 6.0,
            initial_investment: 100.0,
            ..Default::default()
        };
        let strict = Thresholds { min_conversion_rate: 8.0, max_marketing_share: 0.1 };
        let advice = recommend(&inputs, &compute(&inputs), &strict);

        assert_eq!(
            advice,
            vec![
                Advice::CashFlowPositive,
                Advice::RoiPositive,
                Advice::LowConversion,
                Advice::HighMarketingSpend,
            ]
        );
    }

    #[test]
    fn never_empty() {
        for rev in [0.0, 1.0, 1000.0] {
            for cogs in [0.0, 500.0, 5000.0] {
                for inv in [0.0, 100.0, 2000.0] {
                    for conv in [0.0, 4.99, 5.0, 100.0] {
                        for spend in [0.0, 300.0, 301.0] {
                            let inputs = BusinessInputs {
                                total_revenue: rev,
                                cost_of_goods_sold: cogs,
                                initial_investment: inv,
                                conversion_rate: conv,
                                marketing_spend: spend,
                                ..Default::default()
                            };
                            assert!(!advise(&inputs).is_empty(), "{inputs:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn same_inputs_same_order() {
        let inputs = BusinessInputs {
            total_revenue: 500.0,
            marketing_spend: 250.0,
            cost_of_goods_sold: 100.0,
            conversion_rate: 3.0,
            ..Default::default()
        };

        assert_eq!(advise(&inputs), advise(&inputs));
    }
}
