//! Joke refusals for commands that would mutate the (imaginary) host.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Fixed refusal messages; one is picked uniformly per invocation.
pub const MESSAGES: [&str; 3] = [
    "Nice try! But you can't do that here.",
    "Whoa there! You can't do that here. Try 'help' instead.",
    "Nope! That's off-limits. Is that how you treat somebody else's server?",
];

/// Subject used when a line is rejected for containing `<` or `>`.
pub const REDIRECTION: &str = "redirection";

/// Pick a refusal message.
pub fn pick_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MESSAGES.choose(rng).copied().unwrap_or(MESSAGES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn always_one_of_the_fixed_messages() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(MESSAGES.contains(&pick_message(&mut rng)));
        }
    }

    #[test]
    fn roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let msg = pick_message(&mut rng);
            let idx = MESSAGES.iter().position(|m| *m == msg).unwrap();
            counts[idx] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "skewed distribution: {counts:?}");
        }
    }
}
