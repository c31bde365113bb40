use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;

use crate::{Deck, Question};

impl Deck {
    /// Simulate `days` of study, calling `on_question` for each generated question.
    /// Every question is answered correctly, each answer moves the clock on by one minute, and
    /// day `n` starts at `start + n days`. Stops early once the curriculum is finished.
    pub fn simulate_usage<R, F>(
        &self,
        days: u32,
        questions_per_day: u32,
        start: DateTime<Utc>,
        rng: &mut R,
        mut on_question: F,
    ) -> Deck
    where
        R: Rng + ?Sized,
        F: FnMut(&Question),
    {
        let mut deck = self.clone();
        let mut previous: Option<String> = None;

        for day in 0..days {
            let mut now = start + TimeDelta::days(i64::from(day));
            for _ in 0..questions_per_day {
                let Some(target) = deck.pick_next(now, previous.as_deref(), rng) else {
                    log::info!("Curriculum finished on simulated day {day}");
                    return deck;
                };
                let question = deck.generate_question(target, rng);
                on_question(&question);

                let correct = question.correct_answer.clone();
                deck.apply_answer(
                    &question.target_symbol,
                    question.is_correct(&correct),
                    TimeDelta::seconds(2),
                    now,
                );
                previous = Some(question.target_symbol);
                now += TimeDelta::minutes(1);
            }
        }
        deck
    }
}
