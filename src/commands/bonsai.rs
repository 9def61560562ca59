//! `bonsai [-s seed]`: grows a small ASCII tree frame by frame.
//!
//! The tree is a pure function of the seed. The command holds the input
//! lock while the growth animation plays and leaves the last frame on
//! screen; it has no capturable text output, so it cannot be piped.

use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::commands::{Command, CommandError};
use crate::eval::{CommandContext, Output, RenderEvent};
use crate::parse::FlagValue;
use crate::session::acquire_input;

const WIDTH: usize = 48;
const HEIGHT: usize = 14;
/// Left padding that centers the pot under the trunk.
const POT_PAD: usize = WIDTH / 2 - 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Trunk,
    Left,
    Right,
    Dying,
}

#[derive(Debug, Clone, Copy)]
struct Shoot {
    x: i32,
    y: i32,
    life: i32,
    kind: Kind,
}

/// A grown tree: cells in the order they were placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    cells: Vec<(usize, usize, char)>,
}

impl Tree {
    /// Grow a tree deterministically from `seed`.
    pub fn grow(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cells = Vec::new();
        let trunk_life = HEIGHT as i32 - 2;
        let mut shoots = vec![Shoot {
            x: (WIDTH / 2) as i32,
            y: (HEIGHT - 1) as i32,
            life: trunk_life,
            kind: Kind::Trunk,
        }];

        while let Some(mut s) = shoots.pop() {
            while s.life > 0 {
                s.life -= 1;
                let (dx, dy) = match s.kind {
                    Kind::Trunk => (
                        rng.random_range(-1..=1),
                        if rng.random_bool(0.75) { -1 } else { 0 },
                    ),
                    Kind::Left => (rng.random_range(-2..=0), rng.random_range(-1..=0)),
                    Kind::Right => (rng.random_range(0..=2), rng.random_range(-1..=0)),
                    Kind::Dying => (rng.random_range(-2..=2), rng.random_range(-1..=0)),
                };
                s.x = (s.x + dx).clamp(1, WIDTH as i32 - 2);
                s.y = (s.y + dy).clamp(0, HEIGHT as i32 - 1);

                let glyph = match (dx.signum(), dy) {
                    (_, 0) => '~',
                    (-1, _) => '\\',
                    (1, _) => '/',
                    _ => '|',
                };
                cells.push((s.x as usize, s.y as usize, glyph));

                if s.kind == Kind::Trunk && s.life < trunk_life - 2 && s.life % 3 == 0 {
                    let kind = if rng.random_bool(0.5) {
                        Kind::Left
                    } else {
                        Kind::Right
                    };
                    shoots.push(Shoot {
                        life: s.life + rng.random_range(2..=5),
                        kind,
                        ..s
                    });
                }
                if s.kind != Kind::Trunk && s.life < 2 {
                    s.kind = Kind::Dying;
                }
            }

            // Leaves around the tip
            for _ in 0..6 {
                let x = (s.x + rng.random_range(-2..=2)).clamp(0, WIDTH as i32 - 1);
                let y = (s.y + rng.random_range(-1..=1)).clamp(0, HEIGHT as i32 - 1);
                cells.push((x as usize, y as usize, '&'));
            }
        }

        Self { cells }
    }

    /// Draw the first `step / steps` of the growth, with the pot.
    pub fn render(&self, step: u32, steps: u32) -> String {
        let steps = steps.max(1);
        let shown = self.cells.len() * step.min(steps) as usize / steps as usize;

        let mut grid = vec![vec![' '; WIDTH]; HEIGHT];
        for &(x, y, c) in &self.cells[..shown] {
            grid[y][x] = c;
        }

        let mut lines: Vec<String> = grid
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect();
        lines.extend(pot());
        lines.join("\n")
    }
}

fn pot() -> [String; 4] {
    let pad = " ".repeat(POT_PAD);
    [
        format!("{pad}:{0}./~~~\\.{0}:", "_".repeat(11)),
        format!("{pad} \\{}/", " ".repeat(27)),
        format!("{pad}  \\{}/", "_".repeat(25)),
        format!("{pad}  (_){}(_)", " ".repeat(21)),
    ]
}

/// `bonsai [-s seed]`
pub struct Bonsai {
    frames: u32,
    frame_delay: Duration,
}

impl Bonsai {
    pub fn new(frames: u32, frame_ms: u64) -> Self {
        Self {
            frames: frames.max(1),
            frame_delay: Duration::from_millis(frame_ms),
        }
    }

    fn seed(ctx: &mut CommandContext<'_>) -> Result<u64, CommandError> {
        let flag = ctx.parsed.flag("s").or_else(|| ctx.parsed.flag("seed")).cloned();
        match flag {
            None => Ok(ctx.rng().random()),
            Some(FlagValue::Set) => Err(CommandError::MissingOperand {
                command: "bonsai",
                what: "seed",
            }),
            Some(FlagValue::Value(v)) => v.parse::<u64>().map_err(|e| CommandError::InvalidFlagValue {
                command: "bonsai",
                flag: "s",
                reason: e.to_string(),
                value: v,
            }),
        }
    }
}

#[async_trait(?Send)]
impl Command for Bonsai {
    fn description(&self) -> &str {
        "Grow a bonsai tree"
    }

    fn pipeable(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        let seed = Self::seed(ctx)?;
        log::debug!("bonsai seed {seed}");
        let tree = Tree::grow(seed);

        let CommandContext {
            session, screen, ..
        } = ctx;
        let _guard = acquire_input(session.input_lock());
        for step in 1..=self.frames {
            screen.render(RenderEvent::Frame {
                art: tree.render(step, self.frames),
            });
            if step < self.frames {
                session.pacer().pause(self.frame_delay).await;
            }
        }
        Ok(Output::Silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_tree() {
        assert_eq!(Tree::grow(42), Tree::grow(42));
        assert_eq!(Tree::grow(42).render(10, 10), Tree::grow(42).render(10, 10));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(Tree::grow(1).render(1, 1), Tree::grow(2).render(1, 1));
    }

    #[test]
    fn first_frame_is_smaller() {
        let tree = Tree::grow(7);
        let count = |s: &str| s.chars().filter(|c| !c.is_whitespace()).count();
        assert!(count(&tree.render(1, 10)) < count(&tree.render(10, 10)));
    }

    #[test]
    fn frame_has_fixed_height() {
        let art = Tree::grow(3).render(5, 10);
        assert_eq!(art.lines().count(), HEIGHT + 4);
        assert!(art.ends_with("(_)"));
    }

    #[test]
    fn pot_is_centered_under_trunk() {
        let top = &pot()[0];
        assert_eq!(top.find("~~~"), Some(WIDTH / 2 - 1));
    }
}
