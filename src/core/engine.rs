use super::types::{Allocation, LongTermGoal, RiskTolerance, ShortTermGoal, UserProfile};

const POLICY_SHARE: u32 = 5;

/// Maps a profile to its percentage allocation.
///
/// The rules run in a fixed order and later steps adjust the output of earlier
/// ones: base vector by risk tolerance, then age band, short-term goal,
/// long-term goal, and finally the fixed policy carve-out. Every subtraction
/// floors at zero. Nothing renormalizes the result, so the total can drift
/// away from 100.
pub fn compute(profile: &UserProfile) -> Allocation {
    let mut allocation = base_allocation(&profile.risk_tolerance);
    apply_age_band(&mut allocation, profile.age);
    apply_short_term_goal(&mut allocation, &profile.short_term_goal);
    apply_long_term_goal(&mut allocation, &profile.long_term_goal);

    allocation.policies = POLICY_SHARE;
    allocation.stocks = allocation.stocks.saturating_sub(POLICY_SHARE);
    allocation
}

fn base_allocation(risk: &RiskTolerance) -> Allocation {
    match risk {
        RiskTolerance::Low => Allocation {
            stocks: 10,
            mutual_funds: 20,
            fd: 30,
            gold: 10,
            crypto: 0,
            ppf: 20,
            nps: 10,
            scss: 0,
            policies: 0,
        },
        RiskTolerance::Medium => Allocation {
            stocks: 30,
            mutual_funds: 30,
            fd: 15,
            gold: 5,
            crypto: 5,
            ppf: 10,
            nps: 5,
            scss: 0,
            policies: 0,
        },
        RiskTolerance::High | RiskTolerance::Other(_) => Allocation {
            stocks: 40,
            mutual_funds: 25,
            fd: 5,
            gold: 5,
            crypto: 15,
            ppf: 5,
            nps: 5,
            scss: 0,
            policies: 0,
        },
    }
}

fn apply_age_band(allocation: &mut Allocation, age: i64) {
    if age > 50 {
        allocation.scss += 10;
        allocation.stocks = allocation.stocks.saturating_sub(10);
    } else if (30..=40).contains(&age) {
        allocation.ppf += 5;
        allocation.mutual_funds = allocation.mutual_funds.saturating_sub(5);
    }
}

fn apply_short_term_goal(allocation: &mut Allocation, goal: &ShortTermGoal) {
    match goal {
        ShortTermGoal::EmergencyFund => {
            allocation.fd += 10;
            allocation.stocks = allocation.stocks.saturating_sub(10);
        }
        ShortTermGoal::Vacation => {
            allocation.mutual_funds += 5;
            allocation.fd += 5;
            allocation.stocks = allocation.stocks.saturating_sub(10);
        }
        ShortTermGoal::NewCar | ShortTermGoal::Other(_) => {}
    }
}

fn apply_long_term_goal(allocation: &mut Allocation, goal: &LongTermGoal) {
    match goal {
        LongTermGoal::Retirement => {
            allocation.nps += 10;
            allocation.mutual_funds = allocation.mutual_funds.saturating_sub(10);
        }
        LongTermGoal::ChildrenEducation => {
            allocation.ppf += 10;
            allocation.mutual_funds += 5;
            allocation.stocks = allocation.stocks.saturating_sub(15);
        }
        LongTermGoal::BuyHouse | LongTermGoal::Other(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Category;
    use proptest::prelude::{
        Just, Strategy, any, prop_assert, prop_assert_eq, prop_oneof, proptest,
    };

    fn profile(risk: &str, age: i64, short_term: &str, long_term: &str) -> UserProfile {
        UserProfile {
            age,
            income: 60_000,
            savings: 10_000,
            risk_tolerance: risk.into(),
            short_term_goal: short_term.into(),
            long_term_goal: long_term.into(),
        }
    }

    fn risk_strategy() -> impl Strategy<Value = RiskTolerance> {
        prop_oneof![
            Just(RiskTolerance::Low),
            Just(RiskTolerance::Medium),
            Just(RiskTolerance::High),
            "[a-z]{0,8}".prop_map(RiskTolerance::from),
        ]
    }

    fn short_term_strategy() -> impl Strategy<Value = ShortTermGoal> {
        prop_oneof![
            Just(ShortTermGoal::EmergencyFund),
            Just(ShortTermGoal::Vacation),
            Just(ShortTermGoal::NewCar),
            "[a-z_]{0,12}".prop_map(ShortTermGoal::from),
        ]
    }

    fn long_term_strategy() -> impl Strategy<Value = LongTermGoal> {
        prop_oneof![
            Just(LongTermGoal::Retirement),
            Just(LongTermGoal::BuyHouse),
            Just(LongTermGoal::ChildrenEducation),
            "[a-z_]{0,12}".prop_map(LongTermGoal::from),
        ]
    }

    #[test]
    fn low_risk_young_profile_only_loses_policy_share() {
        let allocation = compute(&profile("low", 25, "new_car", "buy_house"));
        assert_eq!(
            allocation,
            Allocation {
                stocks: 5,
                mutual_funds: 20,
                fd: 30,
                gold: 10,
                crypto: 0,
                ppf: 20,
                nps: 10,
                scss: 0,
                policies: 5,
            }
        );
    }

    #[test]
    fn high_risk_senior_saving_for_emergency_and_retirement() {
        let allocation = compute(&profile("high", 55, "emergency_fund", "retirement"));
        assert_eq!(
            allocation,
            Allocation {
                stocks: 15,
                mutual_funds: 15,
                fd: 15,
                gold: 5,
                crypto: 15,
                ppf: 5,
                nps: 15,
                scss: 10,
                policies: 5,
            }
        );
    }

    #[test]
    fn unrecognised_risk_uses_high_vector() {
        let high = compute(&profile("high", 25, "new_car", "buy_house"));
        let other = compute(&profile("yolo", 25, "new_car", "buy_house"));
        assert_eq!(high, other);
        assert_eq!(other.crypto, 15);
    }

    #[test]
    fn age_band_edges() {
        let at = |age| compute(&profile("medium", age, "new_car", "buy_house"));

        assert_eq!(at(29).ppf, 10);
        assert_eq!(at(30).ppf, 15);
        assert_eq!(at(30).mutual_funds, 25);
        assert_eq!(at(40).ppf, 15);
        assert_eq!(at(41).ppf, 10);
        assert_eq!(at(50).scss, 0);
        assert_eq!(at(51).scss, 10);
        assert_eq!(at(51).stocks, 15);
        assert_eq!(at(-3), at(20));
    }

    #[test]
    fn vacation_shifts_stocks_into_funds_and_deposits() {
        let allocation = compute(&profile("medium", 25, "vacation", "buy_house"));
        assert_eq!(allocation.mutual_funds, 35);
        assert_eq!(allocation.fd, 20);
        assert_eq!(allocation.stocks, 15);
    }

    #[test]
    fn low_risk_stacked_subtractions_floor_stocks_at_zero() {
        // 10 - 10 (age) - 10 (vacation) - 15 (education) - 5 (policies)
        let allocation = compute(&profile("low", 60, "vacation", "children_education"));
        assert_eq!(allocation.stocks, 0);
        assert_eq!(allocation.mutual_funds, 30);
        assert_eq!(allocation.ppf, 30);
        assert_eq!(allocation.fd, 35);
        assert_eq!(allocation.scss, 10);
        assert_eq!(allocation.policies, 5);
    }

    #[test]
    fn retirement_draws_down_mutual_funds_after_age_band() {
        let allocation = compute(&profile("low", 35, "new_car", "retirement"));
        assert_eq!(allocation.mutual_funds, 5);
        assert_eq!(allocation.nps, 20);
        assert_eq!(allocation.ppf, 25);
    }

    #[test]
    fn totals_are_not_renormalized() {
        let allocation = compute(&profile("low", 25, "vacation", "children_education"));
        assert_ne!(allocation.total(), 100);
    }

    #[test]
    fn income_and_savings_do_not_change_the_result() {
        let base = profile("medium", 45, "emergency_fund", "retirement");
        let mut rich = base.clone();
        rich.income = 5_000_000;
        rich.savings = -20;
        assert_eq!(compute(&base), compute(&rich));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn prop_compute_is_deterministic_and_keeps_policy_share(
            age in any::<i64>(),
            income in any::<i64>(),
            savings in any::<i64>(),
            risk in risk_strategy(),
            short_term in short_term_strategy(),
            long_term in long_term_strategy(),
        ) {
            let profile = UserProfile {
                age,
                income,
                savings,
                risk_tolerance: risk,
                short_term_goal: short_term,
                long_term_goal: long_term,
            };

            let first = compute(&profile);
            let second = compute(&profile);
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.policies, POLICY_SHARE);

            let base = base_allocation(&profile.risk_tolerance);
            prop_assert!(first.stocks <= base.stocks);
            for category in Category::ALL {
                prop_assert!(first.get(category) <= 100, "{} out of range", category.as_str());
            }
        }
    }
}
