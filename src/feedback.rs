//! Feedback phrase banks shown to the learner after each answer.
//!
//! Wrong answers draw from the encouraging bank, and the picker remembers
//! the previous pick so a struggling child never reads the same phrase twice
//! in a row.

use rand::seq::SliceRandom;
use rand::Rng;

pub const POSITIVE: &[&str] = &[
    "Bravo !",
    "Génial !",
    "Excellent !",
    "Trop fort !",
    "Super !",
    "Magnifique !",
    "Incroyable !",
    "Bien joué !",
    "Parfait !",
    "Formidable !",
    "Tu assures !",
    "Ça, c’est du rapide !",
    "Champion !",
    "Top !",
    "Ouiiii !",
    "Quelle belle réponse !",
];

pub const ENCOURAGING: &[&str] = &[
    "Bien essayé !",
    "Continue, tu progresses !",
    "Super effort !",
    "Tu vas y arriver !",
    "Pas grave, on réessaie !",
    "C’est en s’entraînant qu’on devient fort !",
    "Tu es sur la bonne voie !",
    "On continue doucement, tu peux le faire.",
    "Ce n’est pas grave de se tromper.",
    "Chaque essai te rend meilleur !",
    "Bravo d’avoir essayé !",
    "Tu progresses à ton rythme.",
    "On recommence, tranquillement.",
    "Tu es courageux, continue !",
    "Ça arrive à tout le monde !",
    "On apprend en jouant.",
    "Tu peux être fier de toi.",
    "Encore un petit effort !",
    "Tu vas y arriver, j’en suis sûr.",
    "On passe à la suite, sans stress.",
];

#[derive(Debug, Default)]
pub struct FeedbackPicker {
    last_encouraging: Option<usize>,
}

impl FeedbackPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positive<R: Rng>(&mut self, rng: &mut R) -> &'static str {
        POSITIVE.choose(rng).copied().unwrap_or("Bravo !")
    }

    /// Uniform pick that nudges away from the immediately previous phrase.
    pub fn encouraging<R: Rng>(&mut self, rng: &mut R) -> &'static str {
        if ENCOURAGING.len() <= 1 {
            return ENCOURAGING.first().copied().unwrap_or("");
        }
        let mut idx = rng.gen_range(0..ENCOURAGING.len());
        if Some(idx) == self.last_encouraging {
            idx = (idx + 1) % ENCOURAGING.len();
        }
        self.last_encouraging = Some(idx);
        ENCOURAGING[idx]
    }

    pub fn pick<R: Rng>(&mut self, rng: &mut R, correct: bool) -> &'static str {
        if correct {
            self.positive(rng)
        } else {
            self.encouraging(rng)
        }
    }
}
