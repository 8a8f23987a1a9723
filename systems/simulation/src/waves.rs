//! Global scatter/chase schedule.

use maze_chase_core::{AttackPhase, AttackWave, LevelParams};

/// Walks through the level's attack waves, one tick at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackSchedule {
    waves: [AttackWave; 8],
    index: usize,
    remaining: Option<u32>,
}

impl AttackSchedule {
    /// Starts the schedule of the level at its first wave.
    #[must_use]
    pub fn new(params: &LevelParams) -> Self {
        let waves = params.attack_waves();
        Self {
            remaining: waves[0].ticks,
            waves,
            index: 0,
        }
    }

    /// Phase of the active wave.
    #[must_use]
    pub fn phase(&self) -> AttackPhase {
        self.waves[self.index].phase
    }

    /// Zero-based index of the active wave.
    #[must_use]
    pub const fn wave(&self) -> usize {
        self.index
    }

    /// Ticks left in the active wave, `None` for the final open-ended wave.
    #[must_use]
    pub const fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Advances the schedule unless `paused`. Returns the new phase when a
    /// wave boundary was crossed.
    pub fn tick(&mut self, paused: bool) -> Option<AttackPhase> {
        if paused {
            return None;
        }
        let remaining = self.remaining.as_mut()?;
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 || self.index + 1 >= self.waves.len() {
            return None;
        }

        let before = self.phase();
        self.index += 1;
        self.remaining = self.waves[self.index].ticks;
        let phase = self.phase();
        tracing::debug!(wave = self.index, ?phase, "attack wave started");
        (phase != before).then_some(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::ticks_from_secs;

    #[test]
    fn first_level_scatters_for_seven_seconds() {
        let mut schedule = AttackSchedule::new(&LevelParams::for_level(1));
        assert_eq!(schedule.phase(), AttackPhase::Scatter);

        let scatter = ticks_from_secs(7.0);
        for _ in 1..scatter {
            assert_eq!(schedule.tick(false), None);
        }
        assert_eq!(schedule.tick(false), Some(AttackPhase::Chase));
        assert_eq!(schedule.wave(), 1);
        assert_eq!(schedule.remaining(), Some(ticks_from_secs(20.0)));
    }

    #[test]
    fn paused_schedule_keeps_its_time() {
        let mut schedule = AttackSchedule::new(&LevelParams::for_level(1));
        let before = schedule.remaining();
        for _ in 0..100 {
            assert_eq!(schedule.tick(true), None);
        }
        assert_eq!(schedule.remaining(), before);
    }

    #[test]
    fn final_wave_chases_forever() {
        let mut schedule = AttackSchedule::new(&LevelParams::for_level(5));
        let mut ticks = 0_u32;
        while schedule.remaining().is_some() && ticks < 200_000 {
            let _ = schedule.tick(false);
            ticks += 1;
        }
        assert_eq!(schedule.wave(), 7);
        assert_eq!(schedule.phase(), AttackPhase::Chase);
        assert_eq!(schedule.tick(false), None);
    }
}
