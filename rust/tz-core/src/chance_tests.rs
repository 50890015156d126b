#[cfg(test)]
mod tests {
    use crate::chance::{DiceSource, RngDice, ScriptedDice};

    #[test]
    fn rng_dice_values_in_range() {
        let mut src = RngDice::seeded(999);
        for _ in 0..1_000 {
            let v = src.roll_die();
            assert!((1..=6).contains(&v), "die out of range: {}", v);
        }
    }

    #[test]
    fn rng_dice_is_deterministic_per_seed() {
        let mut a = RngDice::seeded(42);
        let mut b = RngDice::seeded(42);
        let xs: Vec<u8> = (0..32).map(|_| a.roll_die()).collect();
        let ys: Vec<u8> = (0..32).map(|_| b.roll_die()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn rng_dice_hits_every_face() {
        let mut src = RngDice::seeded(7);
        let mut seen = [false; 6];
        for _ in 0..600 {
            seen[(src.roll_die() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn scripted_dice_wraps_around() {
        let mut src = ScriptedDice::new(vec![1, 2, 3]);
        let got: Vec<u8> = (0..7).map(|_| src.roll_die()).collect();
        assert_eq!(got, vec![1, 2, 3, 1, 2, 3, 1]);
        assert_eq!(src.draws(), 7);
    }

    #[test]
    #[should_panic(expected = "1..=6")]
    fn scripted_dice_rejects_bad_faces() {
        let _ = ScriptedDice::new(vec![0]);
    }

    #[test]
    fn mut_ref_is_a_source() {
        fn draw_two(mut s: impl DiceSource) -> [u8; 2] {
            [s.roll_die(), s.roll_die()]
        }
        let mut src = ScriptedDice::constant(5);
        assert_eq!(draw_two(&mut src), [5, 5]);
        assert_eq!(src.draws(), 2);
    }
}
