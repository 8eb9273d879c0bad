//! Things a philosopher may say when it holds the talking turn.

use rand::Rng;

use symposium_monitor::AgentId;

const PHRASES: [&str; 4] = [
    "Eh, it's not easy to be a philosopher: eat, think, talk, eat...",
    "You know, true is false and false is true if you think of it",
    "2 + 2 = 5 for extremely large values of 2...",
    "If thee cannot speak, thee must be silent",
];

/// Picks one phrase uniformly, including the speaker's own number.
pub fn say_something<R: Rng + ?Sized>(id: AgentId, rng: &mut R) -> String {
    let pick = rng.gen_range(0..=PHRASES.len());
    match PHRASES.get(pick) {
        Some(phrase) => (*phrase).to_string(),
        None => format!("My number is {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_every_phrase_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        let said: HashSet<String> = (0..500).map(|_| say_something(3, &mut rng)).collect();

        assert_eq!(said.len(), PHRASES.len() + 1);
        assert!(said.contains("My number is 3"));
        for phrase in PHRASES {
            assert!(said.contains(phrase));
        }
    }
}
