// splash.rs - Ground impact splashes
//
// Short-lived particles emitted where a drop meets the floor line.

use super::{MAX_SPLASHES, RainWorld};

/// Particles emitted per grounded drop.
pub const SPLASH_PARTICLES: usize = 6;

const SPLASH_GRAVITY: f32 = 0.15;
const LIFE_MIN: f32 = 20.0;
const LIFE_SPREAD: f32 = 10.0;

pub struct Splashes {
    // Position
    pub x: [f32; MAX_SPLASHES],
    pub y: [f32; MAX_SPLASHES],

    // Velocity
    pub dx: [f32; MAX_SPLASHES],
    pub dy: [f32; MAX_SPLASHES],

    // Remaining life in ticks; hue inherited from the parent drop
    pub life: [f32; MAX_SPLASHES],
    pub hue: [f32; MAX_SPLASHES],

    // Count
    pub n: usize,
}

impl Splashes {
    pub fn new() -> Self {
        Self {
            x: [0.0; MAX_SPLASHES],
            y: [0.0; MAX_SPLASHES],
            dx: [0.0; MAX_SPLASHES],
            dy: [0.0; MAX_SPLASHES],
            life: [0.0; MAX_SPLASHES],
            hue: [0.0; MAX_SPLASHES],
            n: 0,
        }
    }

    /// Emit one burst of SPLASH_PARTICLES particles at the impact point
    pub fn spawn_burst(&mut self, x: f32, y: f32, hue: f32, rng: &mut u32) {
        for _ in 0..SPLASH_PARTICLES {
            if self.n >= MAX_SPLASHES {
                return;
            }

            let i = self.n;
            self.x[i] = x;
            self.y[i] = y;
            self.dx[i] = (RainWorld::rand(rng) - 0.5) * 2.0;
            self.dy[i] = -RainWorld::rand(rng) * 2.0;
            self.life[i] = LIFE_MIN + RainWorld::rand(rng) * LIFE_SPREAD;
            self.hue[i] = hue;
            self.n += 1;
        }
    }

    /// Advance one tick, dropping particles whose life has run out
    pub fn update(&mut self) {
        let mut write = 0;

        for read in 0..self.n {
            let life = self.life[read] - 1.0;
            if life <= 0.0 {
                continue;
            }

            let dy = self.dy[read] + SPLASH_GRAVITY;
            self.x[write] = self.x[read] + self.dx[read];
            self.y[write] = self.y[read] + dy;
            self.dx[write] = self.dx[read];
            self.dy[write] = dy;
            self.life[write] = life;
            self.hue[write] = self.hue[read];
            write += 1;
        }

        self.n = write;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(splashes: &mut Splashes, life: f32) {
        let i = splashes.n;
        splashes.x[i] = 10.0;
        splashes.y[i] = 500.0;
        splashes.dx[i] = 0.5;
        splashes.dy[i] = -1.0;
        splashes.life[i] = life;
        splashes.hue[i] = 210.0;
        splashes.n += 1;
    }

    #[test]
    fn life_strictly_decreases_each_tick() {
        let mut splashes = Splashes::new();
        place(&mut splashes, 10.0);

        let mut prev = splashes.life[0];
        for _ in 0..9 {
            splashes.update();
            assert_eq!(splashes.n, 1);
            assert!(splashes.life[0] < prev);
            assert!(splashes.life[0] > 0.0);
            prev = splashes.life[0];
        }
    }

    #[test]
    fn particle_with_life_25_survives_exactly_25_ticks() {
        let mut splashes = Splashes::new();
        place(&mut splashes, 25.0);

        for _ in 0..24 {
            splashes.update();
        }
        assert_eq!(splashes.n, 1, "still alive after 24 ticks");

        splashes.update();
        assert_eq!(splashes.n, 0, "gone once life reaches zero");
    }

    #[test]
    fn gravity_pulls_splash_velocity_down() {
        let mut splashes = Splashes::new();
        place(&mut splashes, 20.0);

        let before = splashes.dy[0];
        splashes.update();
        assert_eq!(splashes.dy[0], before + SPLASH_GRAVITY);
    }

    #[test]
    fn position_advances_by_velocity() {
        let mut splashes = Splashes::new();
        place(&mut splashes, 20.0);

        splashes.update();
        assert_eq!(splashes.x[0], 10.5);
        let dy = -1.0 + SPLASH_GRAVITY;
        assert_eq!(splashes.y[0], 500.0 + dy);
    }

    #[test]
    fn burst_respects_capacity() {
        let mut splashes = Splashes::new();
        let mut rng = 9u32;
        while splashes.n < MAX_SPLASHES {
            splashes.spawn_burst(0.0, 100.0, 210.0, &mut rng);
        }
        splashes.spawn_burst(0.0, 100.0, 210.0, &mut rng);
        assert_eq!(splashes.n, MAX_SPLASHES);
    }

    #[test]
    fn burst_velocities_and_life_within_ranges() {
        let mut splashes = Splashes::new();
        let mut rng = 0xC0FFEE_u32;
        splashes.spawn_burst(42.0, 600.0, 215.0, &mut rng);

        assert_eq!(splashes.n, SPLASH_PARTICLES);
        for i in 0..splashes.n {
            assert!(splashes.dx[i] >= -1.0 && splashes.dx[i] <= 1.0);
            assert!(splashes.dy[i] <= 0.0 && splashes.dy[i] >= -2.0);
            assert!(splashes.life[i] >= LIFE_MIN && splashes.life[i] < LIFE_MIN + LIFE_SPREAD);
            assert_eq!(splashes.hue[i], 215.0);
        }
    }
}
