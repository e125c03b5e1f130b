// droplet.rs - Falling raindrops
//
// Structure-of-Arrays layout for cache-friendly iteration.

use super::{MAX_DROPS, PointerPos, RainWorld, Splashes};

// Physics constants
pub const GRAVITY: f32 = 0.08;
const GROUND_EPSILON: f32 = 2.0;
pub const SPAWN_HEIGHT: f32 = -20.0;

// Umbrella shield. The canopy sits above the pointer and extends
// UMBRELLA_REACH to its right, matching the sprite's offset anchor, so the
// sheltered region is an off-center cap rather than a full disk.
pub const UMBRELLA_RADIUS: f32 = 175.0;
pub const UMBRELLA_REACH: f32 = 75.0;

// Color
pub const BASE_HUE: f32 = 210.0;
const HUE_VARIATION: f32 = 20.0;

pub struct Droplets {
    // Position
    pub x: [f32; MAX_DROPS],
    pub y: [f32; MAX_DROPS],

    // Velocity (y only, drops fall straight)
    pub dy: [f32; MAX_DROPS],

    // Draw state
    pub radius: [f32; MAX_DROPS],
    pub hue: [f32; MAX_DROPS],
    pub alpha: [f32; MAX_DROPS],

    // Count
    pub n: usize,
}

impl Droplets {
    pub fn new() -> Self {
        Self {
            x: [0.0; MAX_DROPS],
            y: [0.0; MAX_DROPS],
            dy: [0.0; MAX_DROPS],
            radius: [0.0; MAX_DROPS],
            hue: [0.0; MAX_DROPS],
            alpha: [0.0; MAX_DROPS],
            n: 0,
        }
    }

    /// Spawn new drops just above the visible top edge
    pub fn spawn(&mut self, count: usize, screen_w: f32, rng: &mut u32) {
        for _ in 0..count {
            if self.n >= MAX_DROPS {
                return;
            }

            let i = self.n;
            self.x[i] = RainWorld::rand(rng) * screen_w;
            self.y[i] = SPAWN_HEIGHT;
            self.dy[i] = 2.0 + RainWorld::rand(rng) * 2.0;
            self.radius[i] = 2.0 + RainWorld::rand(rng) * 2.0;
            self.hue[i] = BASE_HUE + (RainWorld::rand(rng) - 0.5) * HUE_VARIATION;
            self.alpha[i] = 0.5 + RainWorld::rand(rng) * 0.4;
            self.n += 1;
        }
    }

    /// Integrate gravity, absorb drops under the umbrella, ground the rest.
    /// Single compaction pass; survivors are written back in place.
    pub fn update(
        &mut self,
        screen_h: f32,
        pointer: PointerPos,
        umbrella: bool,
        splashes: &mut Splashes,
        rng: &mut u32,
    ) {
        let mut write = 0;

        for read in 0..self.n {
            let x = self.x[read];
            let dy = self.dy[read] + GRAVITY;
            let y = self.y[read] + dy;

            // Umbrella absorption: no splash. A non-finite pointer makes
            // every comparison here false, which is the right outcome.
            if umbrella {
                let dx = x - pointer.x;
                let dp = y - pointer.y;
                let distance = (dx * dx + dp * dp).sqrt();

                if pointer.x + UMBRELLA_REACH > x && distance < UMBRELLA_RADIUS && y < pointer.y {
                    continue;
                }
            }

            // Ground impact: burst into splash particles at the floor line
            if y >= screen_h - GROUND_EPSILON {
                splashes.spawn_burst(x, screen_h, self.hue[read], rng);
                continue;
            }

            // Keep falling
            self.x[write] = x;
            self.y[write] = y;
            self.dy[write] = dy;
            self.radius[write] = self.radius[read];
            self.hue[write] = self.hue[read];
            self.alpha[write] = self.alpha[read];
            write += 1;
        }

        self.n = write;
    }
}
