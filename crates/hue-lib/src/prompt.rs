use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Which attribute of the prompt the player has to match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Instruction {
    /// Click what the text says.
    Word,
    /// Click the color the text is drawn in.
    Color,
}

impl Instruction {
    pub const ALL: [Instruction; 2] = [Instruction::Word, Instruction::Color];
}

/// A color word drawn in a different color, plus which of the two to click.
///
/// `display_color` never equals `word`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Prompt {
    pub word: Color,
    pub display_color: Color,
    pub instruction: Instruction,
}

impl Prompt {
    /// The only color that answers this prompt correctly.
    pub fn answer(&self) -> Color {
        match self.instruction {
            Instruction::Word => self.word,
            Instruction::Color => self.display_color,
        }
    }

    pub fn is_correct(&self, chosen: Color) -> bool {
        chosen == self.answer()
    }
}

#[derive(Debug)]
pub struct PromptGenerator<R> {
    rng: R,
}

impl<R: Rng> PromptGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draws a fresh prompt. The instruction is drawn independently of any previous prompt.
    pub fn next(&mut self) -> Prompt {
        let word_idx = self.rng.gen_range(0..Color::ALL.len());
        // Pick among the two remaining colors so only one draw is ever needed
        let offset = self.rng.gen_range(1..Color::ALL.len());
        let color_idx = (word_idx + offset) % Color::ALL.len();

        let instruction = Instruction::ALL[self.rng.gen_range(0..Instruction::ALL.len())];

        Prompt {
            word: Color::ALL[word_idx],
            display_color: Color::ALL[color_idx],
            instruction,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::{Instruction, Prompt, PromptGenerator};
    use crate::color::Color;

    #[test]
    fn display_color_never_matches_word() {
        let mut gen = PromptGenerator::new(StdRng::seed_from_u64(42));
        for _ in 0..10_000 {
            let prompt = gen.next();
            assert_ne!(prompt.word, prompt.display_color);
        }
    }

    #[test]
    fn covers_every_combination() {
        let mut gen = PromptGenerator::new(StdRng::seed_from_u64(7));
        let seen = (0..2_000)
            .map(|_| gen.next())
            .map(|p| (p.word, p.display_color, p.instruction))
            .collect::<HashSet<_>>();

        // 3 words * 2 remaining colors * 2 instructions
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn seeded_generators_agree() {
        let mut a = PromptGenerator::new(StdRng::seed_from_u64(1234));
        let mut b = PromptGenerator::new(StdRng::seed_from_u64(1234));
        for _ in 0..100 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn answer_follows_instruction() {
        let mut prompt = Prompt {
            word: Color::Red,
            display_color: Color::Blue,
            instruction: Instruction::Word,
        };
        assert_eq!(prompt.answer(), Color::Red);
        assert!(prompt.is_correct(Color::Red));
        assert!(!prompt.is_correct(Color::Blue));

        prompt.instruction = Instruction::Color;
        assert_eq!(prompt.answer(), Color::Blue);
        assert!(!prompt.is_correct(Color::Red));
        assert!(!prompt.is_correct(Color::Green));
    }
}
