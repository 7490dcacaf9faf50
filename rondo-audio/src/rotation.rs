//! Key rotation state machine.
//!
//! Owns the Active/Next key pair. Next is always freshly drawn from the
//! current category pool before it is ever promoted to Active; a key never
//! follows itself, but alternating between two keys across rotations is fine.

use std::time::{SystemTime, UNIX_EPOCH};

use rondo_types::{KeyCategory, MusicalKey};

/// Simple LCG, the only randomness source in the system. Seedable so tests
/// can verify exclusion and distribution deterministically.
#[derive(Debug, Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_index(&mut self, len: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % len
    }
}

#[derive(Debug)]
pub struct KeyRotation {
    active: MusicalKey,
    next: MusicalKey,
    rng: Lcg,
}

impl KeyRotation {
    /// Draw the initial Active/Next pair from the category pool.
    pub fn with_seed(category: KeyCategory, seed: u64) -> Self {
        let mut rng = Lcg(seed);
        let pool = category.pool();
        let active = pool[rng.next_index(pool.len())];
        let next = pick_excluding(&mut rng, category, active);
        Self { active, next, rng }
    }

    /// Seed from the wall clock. Used at application start.
    pub fn from_entropy(category: KeyCategory) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed);
        Self::with_seed(category, seed)
    }

    pub fn active(&self) -> MusicalKey {
        self.active
    }

    pub fn next(&self) -> MusicalKey {
        self.next
    }

    /// Promote Next to Active and draw a fresh Next from `category`,
    /// excluding the new Active.
    pub fn rotate(&mut self, category: KeyCategory) {
        self.active = self.next;
        self.next = pick_excluding(&mut self.rng, category, self.active);
    }

    /// Draw a brand-new pair. Startup, reset, and category change while
    /// stopped all go through here.
    pub fn resample(&mut self, category: KeyCategory) {
        let pool = category.pool();
        self.active = pool[self.rng.next_index(pool.len())];
        self.next = pick_excluding(&mut self.rng, category, self.active);
    }

    /// Redraw only Next. Category change while running: the in-progress
    /// measure keeps its Active key, and any rotation pending on the next
    /// beat promotes the redrawn Next.
    pub fn redraw_next(&mut self, category: KeyCategory) {
        self.next = pick_excluding(&mut self.rng, category, self.active);
    }
}

fn pick_excluding(rng: &mut Lcg, category: KeyCategory, exclude: MusicalKey) -> MusicalKey {
    let pool: Vec<MusicalKey> = category
        .pool()
        .into_iter()
        .filter(|&k| k != exclude)
        .collect();
    pool[rng.next_index(pool.len())]
}
