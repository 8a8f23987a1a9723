use maze_chase_system_movement::Mover;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Drive, Steer, SteeringContext};

/// Seeded random walk that never reverses unless boxed in.
#[derive(Clone, Debug)]
pub struct RandomWalker {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomWalker {
    /// Creates a walker whose choices are reproducible from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Steer for RandomWalker {
    fn steer(&mut self, mover: &mut Mover, context: &SteeringContext<'_>) -> Drive {
        if !(mover.entered_new_tile() || mover.is_stuck()) {
            return Drive::Grid;
        }

        let ahead = mover.move_dir();
        let mut options = [ahead, ahead.turn_left(), ahead.turn_right()];
        options.shuffle(&mut self.rng);

        let open = |direction| mover.can_head(context.world, context.access, direction);
        let chosen = options
            .into_iter()
            .find(|direction| open(*direction))
            .or_else(|| Some(ahead.opposite()).filter(|direction| open(*direction)));
        if let Some(direction) = chosen {
            mover.set_wish_dir(direction);
        }
        Drive::Grid
    }

    fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }
}
