// sim/ - Rain simulation
//
// Entity management using Structure-of-Arrays for cache efficiency.
// Each entity type in its own module. Pure code, no platform types,
// so the whole module tests natively.

mod droplet;
mod pointer;
mod splash;

pub use droplet::{BASE_HUE, Droplets, GRAVITY, SPAWN_HEIGHT, UMBRELLA_RADIUS, UMBRELLA_REACH};
pub use pointer::PointerPos;
pub use splash::{SPLASH_PARTICLES, Splashes};

// Capacity limits
pub const MAX_DROPS: usize = 3000;
pub const MAX_SPLASHES: usize = 1000;

// Drops spawned per tick per pixel of surface width, so visual density
// stays constant across surface sizes.
const BASE_SPAWN_RATE: f32 = 0.005;

/// Rain simulation world: one instance per overlay mount
pub struct RainWorld {
    // Surface dimensions
    w: u32,
    h: u32,

    // Entities
    drops: Droplets,
    splashes: Splashes,

    // Feature toggle, fixed for the lifetime of the mount
    umbrella: bool,

    // RNG state
    rng: u32,
}

impl RainWorld {
    pub fn new(w: u32, h: u32, umbrella: bool) -> Self {
        Self {
            w,
            h,
            drops: Droplets::new(),
            splashes: Splashes::new(),
            umbrella,
            rng: 0xDEADBEEF,
        }
    }

    /// Resync surface dimensions. Live particles are kept; drops already
    /// below a shrunken floor simply ground out on the next tick.
    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
    }

    /// Advance one frame: spawn, integrate drops, age splashes
    pub fn tick(&mut self, pointer: PointerPos) {
        let count = ((self.w as f32 * BASE_SPAWN_RATE) as usize).max(1);
        self.drops.spawn(count, self.w as f32, &mut self.rng);

        self.drops.update(
            self.h as f32,
            pointer,
            self.umbrella,
            &mut self.splashes,
            &mut self.rng,
        );

        self.splashes.update();
    }

    // Random number generator (xorshift32)
    #[inline(always)]
    pub fn rand(rng: &mut u32) -> f32 {
        *rng ^= *rng << 13;
        *rng ^= *rng >> 17;
        *rng ^= *rng << 5;
        (*rng >> 8) as f32 * (1.0 / 16777216.0)
    }

    // Accessors for the renderer
    pub fn drops(&self) -> &Droplets {
        &self.drops
    }
    pub fn splashes(&self) -> &Splashes {
        &self.splashes
    }
    pub fn width(&self) -> u32 {
        self.w
    }
    pub fn height(&self) -> u32 {
        self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTER: PointerPos = PointerPos { x: 500.0, y: 500.0 };

    #[test]
    fn spawn_count_scales_with_width() {
        let mut world = RainWorld::new(1000, 800, false);
        world.tick(POINTER);
        assert_eq!(world.drops().n, 5);
        // Fresh drops spawned at SPAWN_HEIGHT have fallen one step by the
        // end of the tick, still above the visible top.
        for i in 0..world.drops().n {
            assert!(world.drops().y[i] > SPAWN_HEIGHT);
            assert!(world.drops().y[i] < 0.0);
        }
    }

    #[test]
    fn spawn_count_has_a_floor_of_one() {
        let mut world = RainWorld::new(100, 800, false);
        world.tick(POINTER);
        assert_eq!(world.drops().n, 1);
    }

    #[test]
    fn resize_preserves_particle_state() {
        let mut world = RainWorld::new(1000, 800, false);
        for _ in 0..10 {
            world.tick(POINTER);
        }
        let drops_before = world.drops().n;
        let y_before = world.drops().y[0];
        assert!(drops_before > 0);

        world.resize(1200, 900);
        assert_eq!(world.width(), 1200);
        assert_eq!(world.height(), 900);
        assert_eq!(world.drops().n, drops_before);
        assert_eq!(world.drops().y[0], y_before);
    }

    #[test]
    fn resize_to_same_dimensions_is_a_no_op() {
        let mut world = RainWorld::new(1000, 800, false);
        world.tick(POINTER);
        let n = world.drops().n;

        world.resize(1000, 800);
        world.resize(1000, 800);
        assert_eq!(world.width(), 1000);
        assert_eq!(world.height(), 800);
        assert_eq!(world.drops().n, n);
    }

    #[test]
    fn drops_eventually_ground_and_splash() {
        // Umbrella off in a small world: every drop must hit the floor.
        let mut world = RainWorld::new(200, 100, false);
        let mut saw_splash = false;
        for _ in 0..120 {
            world.tick(POINTER);
            if world.splashes().n > 0 {
                saw_splash = true;
            }
        }
        assert!(saw_splash);
    }

    #[test]
    fn umbrella_scenario_absorbs_above_but_not_below_pointer() {
        let mut world = RainWorld::new(1000, 1000, true);

        // Above the pointer, inside reach and radius.
        let i = world.drops.n;
        world.drops.x[i] = 520.0;
        world.drops.y[i] = 400.0;
        world.drops.dy[i] = 0.0;
        world.drops.n += 1;

        // Below the pointer, same column.
        let j = world.drops.n;
        world.drops.x[j] = 520.0;
        world.drops.y[j] = 600.0;
        world.drops.dy[j] = 0.0;
        world.drops.n += 1;

        world.drops.update(
            1000.0,
            POINTER,
            true,
            &mut world.splashes,
            &mut world.rng,
        );

        assert_eq!(world.drops.n, 1);
        assert_eq!(world.drops.x[0], 520.0);
        assert!(world.drops.y[0] > 600.0, "drop below the pointer kept falling");
        assert_eq!(world.splashes.n, 0, "absorption never produces a splash");
    }

    #[test]
    fn rand_stays_in_unit_range() {
        let mut rng = 0xDEADBEEF_u32;
        for _ in 0..10_000 {
            let v = RainWorld::rand(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }
}
