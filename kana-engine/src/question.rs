use kana_utils::{AudioRef, Inventory, KanaCharacter};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::Deck;

const DISTRACTOR_COUNT: usize = 2;

/// A three-choice "how is this read?" question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub display_symbol: String,
    pub correct_answer: String,
    /// Pronunciations in display order. Always three, all different.
    pub options: Vec<String>,
    pub target_symbol: String,
    pub audio_ref: AudioRef,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_answer
    }
}

/// Builds a question for `target`.
///
/// Distractors are drawn from `pool` first, without replacement. Every candidate drawn leaves
/// the pool whether or not it is usable, so this phase always ends. If the pool cannot supply
/// two distinct wrong pronunciations, the rest are sampled from the whole inventory.
pub fn generate_question<R: Rng + ?Sized>(
    target: &KanaCharacter,
    pool: &[&KanaCharacter],
    inventory: &Inventory,
    rng: &mut R,
) -> Question {
    let correct_answer = target.pronunciation.clone();
    let mut distractors: Vec<String> = Vec::with_capacity(DISTRACTOR_COUNT);
    let consider = |candidate: &str, distractors: &mut Vec<String>| {
        if candidate != correct_answer && !distractors.iter().any(|d| d == candidate) {
            distractors.push(candidate.to_string());
        }
    };

    let mut remaining: Vec<&str> = pool
        .iter()
        .filter(|c| c.symbol != target.symbol)
        .map(|c| c.pronunciation.as_str())
        .collect();
    while distractors.len() < DISTRACTOR_COUNT && !remaining.is_empty() {
        let candidate = remaining.swap_remove(rng.random_range(0..remaining.len()));
        consider(candidate, &mut distractors);
    }

    // The inventory guarantees three distinct pronunciations, so this terminates.
    while distractors.len() < DISTRACTOR_COUNT {
        let Some(candidate) = inventory.as_slice().choose(rng) else {
            break;
        };
        consider(&candidate.pronunciation, &mut distractors);
    }

    let mut options = distractors;
    options.push(target.pronunciation.clone());
    options.shuffle(rng);

    Question {
        display_symbol: target.symbol.clone(),
        correct_answer: target.pronunciation.clone(),
        options,
        target_symbol: target.symbol.clone(),
        audio_ref: target.audio_ref.clone(),
    }
}

impl Deck {
    /// Builds a question for `target`, taking distractors from the active set where possible.
    pub fn generate_question<R: Rng + ?Sized>(
        &self,
        target: &KanaCharacter,
        rng: &mut R,
    ) -> Question {
        let pool: Vec<&KanaCharacter> = self
            .active_set()
            .into_iter()
            .filter_map(|record| self.character(record))
            .collect();
        generate_question(target, &pool, &self.inventory, rng)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use kana_utils::Group;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::SchedulingPolicy;

    fn assert_well_formed(question: &Question) {
        assert_eq!(question.options.len(), 3);
        let distinct: BTreeSet<&String> = question.options.iter().collect();
        assert_eq!(distinct.len(), 3, "{question:?}");
        assert_eq!(
            question
                .options
                .iter()
                .filter(|o| **o == question.correct_answer)
                .count(),
            1
        );
    }

    #[test]
    fn test_every_character_yields_valid_question() {
        let deck = Deck::new(Arc::new(Inventory::kana()), SchedulingPolicy::default());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for target in deck.inventory().iter() {
            let question = deck.generate_question(target, &mut rng);
            assert_well_formed(&question);
            assert_eq!(question.display_symbol, target.symbol);
            assert_eq!(question.target_symbol, target.symbol);
            assert_eq!(question.correct_answer, target.pronunciation);
            assert_eq!(question.audio_ref, target.audio_ref);
        }
    }

    #[test]
    fn test_distractors_come_from_pool_when_possible() {
        let inventory = Inventory::kana();
        let target = inventory.get("か").unwrap();
        let pool: Vec<&KanaCharacter> = ["か", "き", "く"]
            .iter()
            .map(|s| inventory.get(s).unwrap())
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..20 {
            let question = generate_question(target, &pool, &inventory, &mut rng);
            assert_well_formed(&question);
            let options: BTreeSet<&str> = question.options.iter().map(String::as_str).collect();
            assert_eq!(options, BTreeSet::from(["ka", "ki", "ku"]));
        }
    }

    #[test]
    fn test_homophones_in_pool_fall_back_to_inventory() {
        // じ and ヂ both read "ji", and ジ too: the pool offers only one usable reading
        let inventory = Inventory::kana();
        let target = inventory.get("ぢ").unwrap();
        let pool: Vec<&KanaCharacter> = ["ぢ", "じ", "ジ", "ヂ", "ざ"]
            .iter()
            .map(|s| inventory.get(s).unwrap())
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            let question = generate_question(target, &pool, &inventory, &mut rng);
            assert_well_formed(&question);
            assert!(question.options.iter().any(|o| o == "za"));
        }
    }

    #[test]
    fn test_empty_pool_uses_inventory() {
        let inventory = Inventory::kana();
        let target = inventory.get("ン").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let question = generate_question(target, &[], &inventory, &mut rng);
        assert_well_formed(&question);
    }

    #[test]
    fn test_minimal_inventory_terminates() {
        let inventory = Inventory::new(vec![
            KanaCharacter::new("あ", "a", Group::Hiragana),
            KanaCharacter::new("ア", "a", Group::Katakana),
            KanaCharacter::new("い", "i", Group::Hiragana),
            KanaCharacter::new("う", "u", Group::Hiragana),
        ])
        .unwrap();
        let target = inventory.get("あ").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let question = generate_question(target, &[], &inventory, &mut rng);
        assert_well_formed(&question);
        let options: BTreeSet<&str> = question.options.iter().map(String::as_str).collect();
        assert_eq!(options, BTreeSet::from(["a", "i", "u"]));
    }

    #[test]
    fn test_option_order_varies() {
        let inventory = Inventory::kana();
        let target = inventory.get("さ").unwrap();
        let pool: Vec<&KanaCharacter> = ["し", "す"]
            .iter()
            .map(|s| inventory.get(s).unwrap())
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let positions: BTreeSet<usize> = (0..50)
            .map(|_| {
                let question = generate_question(target, &pool, &inventory, &mut rng);
                question.options.iter().position(|o| o == "sa").unwrap()
            })
            .collect();
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_grading() {
        let inventory = Inventory::kana();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let question = generate_question(inventory.get("ふ").unwrap(), &[], &inventory, &mut rng);
        assert!(question.is_correct("fu"));
        assert!(!question.is_correct("hu"));
    }
}
