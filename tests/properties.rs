use aircon_cost_simulator::{
    energy_spec::{RoomSize, Series, SpecTable, UnitConvention},
    projection::{
        annual_energy_cost, compute_result_set, escalated_total, select_cheapest,
        AnnualEnergyCostInput, PriceSet, ProjectionInput, UsageInputs,
    },
};
use proptest::prelude::*;

fn unit_strategy() -> impl Strategy<Value = UnitConvention> {
    prop_oneof![Just(UnitConvention::PowerWatts), Just(UnitConvention::AnnualKwh)]
}

prop_compose! {
    fn energy_input()(
        cool in 0.0f64..3_000.0,
        heat in 0.0f64..3_000.0,
        cool_ratio in 0.0f64..=100.0,
        daily_hours in 1.0f64..=24.0,
        price_per_kwh in 1.0f64..80.0,
        baseline_hours in 1.0f64..=24.0,
        unit in unit_strategy(),
    ) -> AnnualEnergyCostInput {
        AnnualEnergyCostInput { cool, heat, cool_ratio, daily_hours, price_per_kwh, baseline_hours, unit }
    }
}

fn room_strategy() -> impl Strategy<Value = RoomSize> {
    prop::sample::select(RoomSize::ALL.to_vec())
}

proptest! {
    #[test]
    fn annual_cost_is_non_negative(input in energy_input()) {
        prop_assert!(annual_energy_cost(input) >= 0.0);
    }

    #[test]
    fn more_hours_never_cost_less(input in energy_input(), extra in 0.0f64..23.0) {
        let longer = AnnualEnergyCostInput {
            daily_hours: (input.daily_hours + extra).min(24.0),
            ..input
        };
        prop_assert!(annual_energy_cost(longer) >= annual_energy_cost(input));
    }

    #[test]
    fn higher_price_never_costs_less(input in energy_input(), extra in 0.0f64..50.0) {
        let pricier = AnnualEnergyCostInput {
            price_per_kwh: input.price_per_kwh + extra,
            ..input
        };
        prop_assert!(annual_energy_cost(pricier) >= annual_energy_cost(input));
    }

    #[test]
    fn more_energy_never_costs_less(input in energy_input(), extra in 0.0f64..1_000.0) {
        let base = annual_energy_cost(input);
        let cooler = AnnualEnergyCostInput { cool: input.cool + extra, ..input };
        let warmer = AnnualEnergyCostInput { heat: input.heat + extra, ..input };
        prop_assert!(annual_energy_cost(cooler) >= base);
        prop_assert!(annual_energy_cost(warmer) >= base);
    }

    #[test]
    fn single_year_has_no_escalation(base in 0.0f64..1e6, rate in 0.0f64..0.2) {
        prop_assert_eq!(escalated_total(base, 1, rate), base);
    }

    #[test]
    fn zero_rate_is_flat_multiplication(base in 0.0f64..1e6, years in 1u32..=30) {
        let total = escalated_total(base, years, 0.0);
        let expected = base * f64::from(years);
        prop_assert!((total - expected).abs() <= 1e-9 * expected.max(1.0));
    }

    #[test]
    fn escalation_grows_with_years_and_rate(
        base in 1.0f64..1e6,
        years in 1u32..30,
        rate in 0.0f64..0.2,
        extra_rate in 0.001f64..0.1,
    ) {
        prop_assert!(escalated_total(base, years + 1, rate) > escalated_total(base, years, rate));
        prop_assert!(escalated_total(base, years + 1, rate + extra_rate) > escalated_total(base, years + 1, rate));
    }

    #[test]
    fn result_set_keeps_order_and_picks_minimum(
        room in room_strategy(),
        prices in prop::array::uniform3(0u64..500_000),
        daily_hours in 1.0f64..=24.0,
        cool_ratio in 0.0f64..=100.0,
        years in prop::sample::select(vec![10u32, 15]),
    ) {
        let input = ProjectionInput {
            room,
            unit_prices: PriceSet::new(prices[0], prices[1], prices[2]),
            usage: UsageInputs { daily_hours, cool_ratio },
            years,
            ..ProjectionInput::default()
        };
        let results = compute_result_set(&SpecTable::rated_power(), &input).unwrap();
        let order: Vec<Series> = results.iter().map(|r| r.series).collect();
        prop_assert_eq!(order, Series::ALL.to_vec());

        match select_cheapest(&results) {
            None => prop_assert!(results.iter().all(|r| r.unit_price == 0)),
            Some(best) => {
                let best_total = results[best.index()].total_cost;
                prop_assert!(results[best.index()].is_priced());
                for r in results.iter().filter(|r| r.is_priced()) {
                    prop_assert!(best_total <= r.total_cost);
                    // 동률이면 앞선 시리즈
                    if r.total_cost == best_total {
                        prop_assert!(best.index() <= r.series.index());
                    }
                }
            }
        }
    }
}
