use dicenote::{roll_with_rng, Error, ErrorKind, FastRng, Rng};
use proptest::prelude::*;

/// Replays a fixed sequence of die faces.
struct ScriptedRng(std::vec::IntoIter<u32>);

impl ScriptedRng {
    fn new(values: Vec<u32>) -> Self {
        Self(values.into_iter())
    }
}

impl Rng for ScriptedRng {
    fn roll(&mut self, _max: u32) -> u32 {
        self.0.next().expect("script ran out of rolls")
    }
}

fn floor_div(left: i64, right: i64) -> i64 {
    let (left, right) = if right < 0 { (-left, -right) } else { (left, right) };
    left.div_euclid(right)
}

/// Arithmetic expressions without dice, paired with their expected value.
/// `None` means a division by zero happens somewhere.
fn arithmetic_strategy() -> impl Strategy<Value = (String, Option<i64>)> {
    let leaf = (0i64..50).prop_map(|n| (n.to_string(), Some(n)));
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|(text, value)| (format!("-{}", text), value.map(|v| -v))),
            inner.clone().prop_map(|(text, value)| (format!("+{}", text), value)),
            (
                inner.clone(),
                prop_oneof![Just('+'), Just('-'), Just('*'), Just('/')],
                inner,
            )
                .prop_map(|((left, lv), op, (right, rv))| {
                    let value = match (lv, rv) {
                        (Some(l), Some(r)) => match op {
                            '+' => Some(l + r),
                            '-' => Some(l - r),
                            '*' => Some(l * r),
                            _ if r == 0 => None,
                            _ => Some(floor_div(l, r)),
                        },
                        _ => None,
                    };
                    (format!("({} {} {})", left, op, right), value)
                }),
        ]
    })
}

proptest! {
    #[test]
    fn test_plain_arithmetic_matches_integer_math((text, expected) in arithmetic_strategy()) {
        let result = roll_with_rng(&text, &mut FastRng::with_seed(0));
        match expected {
            Some(value) => {
                let report = result.unwrap();
                prop_assert_eq!(report.total, value);
                prop_assert!(report.rolls.is_empty());
            }
            None => prop_assert_eq!(result, Err(Error::DivisionByZero)),
        }
    }

    #[test]
    fn test_plain_roll_in_range(count in 1u32..=20, sides in 1u32..=100, seed: u64) {
        let report = roll_with_rng(&format!("{}d{}", count, sides), &mut FastRng::with_seed(seed)).unwrap();
        let outcome = &report.rolls[0];

        prop_assert_eq!(outcome.dice.len(), count as usize);
        prop_assert!(outcome.dice.iter().all(|d| d.value >= 1 && d.value <= sides && !d.dropped));
        let sum: i64 = outcome.dice.iter().map(|d| i64::from(d.value)).sum();
        prop_assert_eq!(outcome.total, sum);
        prop_assert_eq!(report.total, sum);
    }

    #[test]
    fn test_keep_highest_keeps_the_largest(
        (count, keep) in (1u32..=20).prop_flat_map(|count| (Just(count), 1..=count)),
        seed: u64,
    ) {
        let notation = format!("{}d6 k{}h", count, keep);
        let report = roll_with_rng(&notation, &mut FastRng::with_seed(seed)).unwrap();
        let outcome = &report.rolls[0];

        let kept: Vec<u32> = outcome.kept().map(|d| d.value).collect();
        let dropped: Vec<u32> = outcome.dropped().map(|d| d.value).collect();
        prop_assert_eq!(kept.len(), keep as usize);
        prop_assert_eq!(dropped.len(), (count - keep) as usize);
        if let (Some(low), Some(high)) = (kept.iter().min(), dropped.iter().max()) {
            prop_assert!(low >= high);
        }
        prop_assert_eq!(outcome.total, kept.iter().map(|&v| i64::from(v)).sum::<i64>());
    }

    #[test]
    fn test_keep_lowest_keeps_the_smallest(
        (count, keep) in (1u32..=20).prop_flat_map(|count| (Just(count), 1..=count)),
        seed: u64,
    ) {
        let notation = format!("{}d20 k{}l", count, keep);
        let report = roll_with_rng(&notation, &mut FastRng::with_seed(seed)).unwrap();
        let outcome = &report.rolls[0];

        let kept: Vec<u32> = outcome.kept().map(|d| d.value).collect();
        let dropped: Vec<u32> = outcome.dropped().map(|d| d.value).collect();
        prop_assert_eq!(kept.len(), keep as usize);
        if let (Some(high), Some(low)) = (kept.iter().max(), dropped.iter().min()) {
            prop_assert!(high <= low);
        }
    }

    #[test]
    fn test_reroll_until_above_always_finishes(
        (sides, threshold) in (2u32..=100).prop_flat_map(|sides| (Just(sides), 1..sides)),
        count in 1u32..=10,
        seed: u64,
    ) {
        let notation = format!("{}d{} ru{}", count, sides, threshold);
        let report = roll_with_rng(&notation, &mut FastRng::with_seed(seed)).unwrap();
        for die in &report.rolls[0].dice {
            prop_assert!(die.value > threshold && die.value <= sides);
        }
    }

    #[test]
    fn test_reroll_replaces_low_dice_once(
        original in prop::collection::vec(1u32..=6, 1..=10),
        replacements in prop::collection::vec(1u32..=6, 10),
        threshold in 1u32..=6,
    ) {
        let mut script = original.clone();
        script.extend(&replacements);
        let notation = format!("{}d6 rr{}", original.len(), threshold);
        let report = roll_with_rng(&notation, &mut ScriptedRng::new(script)).unwrap();
        let dice = &report.rolls[0].dice;

        prop_assert_eq!(dice.len(), original.len());
        let mut fresh = replacements.iter();
        for (die, &first) in dice.iter().zip(&original) {
            if first <= threshold {
                let replacement = *fresh.next().unwrap();
                prop_assert_eq!(die.value, replacement);
                prop_assert_eq!(&die.rolls, &vec![first, replacement]);
            } else {
                prop_assert_eq!(die.value, first);
                prop_assert_eq!(&die.rolls, &vec![first]);
            }
        }
    }
}

#[test]
fn test_report_follows_textual_order() {
    let cases: [(&str, &[&str]); 3] = [
        ("1d6 + 2d4", &["1d6", "2d4"]),
        ("1d6 * (2d4 - 3d8)", &["1d6", "2d4", "3d8"]),
        ("-(1d6) / (2d4 + 3d8 k1l) + 1", &["1d6", "2d4", "3d8 k1l"]),
    ];
    for (input, expected) in cases {
        let report = roll_with_rng(input, &mut FastRng::with_seed(3)).unwrap();
        let notations: Vec<_> = report.rolls.iter().map(|r| r.notation.as_str()).collect();
        assert_eq!(notations, expected, "{}", input);
    }
}

#[test]
fn test_floor_division() {
    let mut rng = FastRng::with_seed(1);
    assert_eq!(roll_with_rng("7 / 2", &mut rng).unwrap().total, 3);
    assert_eq!(roll_with_rng("-7 / 2", &mut rng).unwrap().total, -4);
}

#[test]
fn test_failures() {
    let mut rng = FastRng::with_seed(1);
    assert_eq!(roll_with_rng("(1 + 2", &mut rng).unwrap_err().kind(), ErrorKind::Syntax);
    assert_eq!(roll_with_rng("3 / 0", &mut rng), Err(Error::DivisionByZero));
    assert_eq!(roll_with_rng("4k2h", &mut rng).unwrap_err().kind(), ErrorKind::Lex);
}
