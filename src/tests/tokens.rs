// Unit Tests for Cost Accounting
//
// UNIT UNDER TEST: TokenPricing, CostBreakdown
//
// BUSINESS RESPONSIBILITY:
//   - Convert reported token usage into money per direction
//   - Accept prices in the per-1K and per-1M forms providers publish
//
// TEST COVERAGE:
//   - Cost arithmetic with the GPT-4.1-mini preset
//   - Price unit conversion

use crate::core_types::TokenUsage;
use crate::tokens::{CostBreakdown, TokenPricing};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[cfg(test)]
mod cost_breakdown_tests {
    use super::*;

    #[test]
    fn test_cost_breakdown_uses_per_1k_prices() {
        // Arrange
        let usage = TokenUsage::new(1500, 500);

        // Act
        let cost = CostBreakdown::from_usage(&usage, &TokenPricing::GPT_4_1_MINI);

        // Assert
        assert_eq!(cost.input_tokens, 1500);
        assert_eq!(cost.output_tokens, 500);
        assert!(approx_eq(cost.input_cost, 0.0012));
        assert!(approx_eq(cost.output_cost, 0.0016));
        assert!(approx_eq(cost.total_cost, 0.0028));
    }

    #[test]
    fn test_zero_usage_costs_nothing() {
        let cost = CostBreakdown::from_usage(&TokenUsage::new(0, 0), &TokenPricing::GPT_4_1_MINI);

        assert_eq!(cost.total_cost, 0.0);
    }

    #[test]
    fn test_per_million_prices_convert_to_per_1k() {
        let pricing = TokenPricing::per_million(0.80, 3.20);

        assert!(approx_eq(pricing.input_per_1k, TokenPricing::GPT_4_1_MINI.input_per_1k));
        assert!(approx_eq(pricing.output_per_1k, TokenPricing::GPT_4_1_MINI.output_per_1k));
    }

    #[test]
    fn test_usage_constructor_keeps_total_consistent() {
        let usage = TokenUsage::new(2, 1);

        assert_eq!(usage.total_tokens, 3);
        assert!(usage.is_consistent());
    }
}
