//! Text and JSON rendering of snapshots and the run summary.

use std::io::Write;

use anyhow::Result;
use maze_chase_core::{ActorId, Event, Tile};
use maze_chase_simulation::{ActorSnapshot, Snapshot, TimerView};
use serde::Serialize;

/// How records are written to standard output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    /// One human-readable block per record.
    Text,
    /// One JSON object per line.
    Json,
}

/// Totals gathered over a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) level: u32,
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) food_eaten: u32,
    pub(crate) ghosts_killed: u32,
    pub(crate) lives_lost: u32,
    pub(crate) levels_completed: u32,
    pub(crate) game_over: bool,
}

impl Summary {
    /// Counts the events of one tick.
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::FoodEaten { .. } => self.food_eaten += 1,
                Event::GhostKilled { .. } => self.ghosts_killed += 1,
                Event::LifeLost { .. } => self.lives_lost += 1,
                Event::LevelCompleted { .. } => self.levels_completed += 1,
                _ => {}
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Record<'a> {
    Snapshot(&'a Snapshot),
    Summary(&'a Summary),
}

/// Writes one snapshot record.
pub(crate) fn write_snapshot(out: &mut impl Write, format: Format, snapshot: &Snapshot) -> Result<()> {
    match format {
        Format::Json => write_json(out, &Record::Snapshot(snapshot)),
        Format::Text => {
            writeln!(
                out,
                "tick {} | level {} | score {} | lives {} | food {}/{} | {:?} | power {}",
                snapshot.tick,
                snapshot.level,
                snapshot.score,
                snapshot.lives,
                snapshot.remaining_food,
                snapshot.total_food,
                snapshot.phase,
                snapshot.power_ticks,
            )?;
            for actor in &snapshot.actors {
                writeln!(out, "  {}", actor_line(actor))?;
            }
            let open: Vec<String> = snapshot
                .doors
                .iter()
                .filter(|door| door.open)
                .map(|door| tile(door.tile))
                .collect();
            if !open.is_empty() {
                writeln!(out, "  open doors {}", open.join(" "))?;
            }
            Ok(())
        }
    }
}

/// Writes the closing summary record.
pub(crate) fn write_summary(out: &mut impl Write, format: Format, summary: &Summary) -> Result<()> {
    match format {
        Format::Json => write_json(out, &Record::Summary(summary)),
        Format::Text => {
            writeln!(
                out,
                "finished after {} ticks on level {}: score {}, lives {}",
                summary.ticks, summary.level, summary.score, summary.lives,
            )?;
            writeln!(
                out,
                "  food eaten {}, ghosts eaten {}, lives lost {}, levels cleared {}{}",
                summary.food_eaten,
                summary.ghosts_killed,
                summary.lives_lost,
                summary.levels_completed,
                if summary.game_over { ", game over" } else { "" },
            )?;
            Ok(())
        }
    }
}

fn write_json(out: &mut impl Write, record: &Record<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
    Ok(())
}

fn actor_line(actor: &ActorSnapshot) -> String {
    let name = match actor.actor {
        ActorId::PacMan => "Pac-Man".to_owned(),
        ActorId::Ghost(ghost) => format!("{ghost:?}"),
    };
    let mut line = format!(
        "{name:<8} {:<14} {:<9} {:?}",
        actor.state,
        tile(actor.tile),
        actor.move_dir,
    );
    if let TimerView::Remaining { remaining, .. } = actor.timer {
        line.push_str(&format!(" {remaining}t left"));
    }
    if let Some(target) = actor.target {
        line.push_str(&format!(" -> {}", tile(target)));
    }
    if !actor.route.is_empty() {
        line.push_str(&format!(" route {}", actor.route.len()));
    }
    line
}

fn tile(tile: Tile) -> String {
    format!("({},{})", tile.column(), tile.row())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::GhostId;

    #[test]
    fn summary_counts_the_events_it_cares_about() {
        let mut summary = Summary::default();
        summary.record(&[
            Event::PacManGainsPower,
            Event::GhostKilled {
                ghost: GhostId::Pinky,
                bounty: 200,
            },
            Event::LevelCompleted { level: 1 },
        ]);
        assert_eq!(summary.ghosts_killed, 1);
        assert_eq!(summary.levels_completed, 1);
        assert_eq!(summary.food_eaten, 0);
    }

    #[test]
    fn json_summary_is_tagged() {
        let summary = Summary {
            ticks: 10,
            ..Summary::default()
        };
        let mut out = Vec::new();
        write_summary(&mut out, Format::Json, &summary).expect("write summary");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(value["summary"]["ticks"], 10);
    }
}
