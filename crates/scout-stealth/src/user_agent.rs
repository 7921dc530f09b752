//! Fixed desktop User-Agent pool, rotated uniformly at random.
//!
//! The eight strings below are the same pool the original `scanner_utils.py`
//! bot-protection helper shipped; kept verbatim so any downstream
//! fingerprinting heuristics that expect these specific strings keep working.

use rand::seq::SliceRandom;

pub const DESKTOP_USER_AGENTS: [&str; 8] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36 Edg/121.0.0.0",
];

/// A thin rotator over the fixed pool. Kept as a struct (rather than a bare
/// function) so call sites read the same way `riptide_stealth::UserAgentManager`
/// does, even though selection here is always uniform-random per spec §4.1.
#[derive(Debug, Default)]
pub struct UserAgentPool;

impl UserAgentPool {
    pub fn new() -> Self {
        Self
    }

    pub fn random(&self) -> &'static str {
        let mut rng = rand::thread_rng();
        DESKTOP_USER_AGENTS
            .choose(&mut rng)
            .copied()
            .unwrap_or(DESKTOP_USER_AGENTS[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_picks_from_pool() {
        let pool = UserAgentPool::new();
        for _ in 0..50 {
            assert!(DESKTOP_USER_AGENTS.contains(&pool.random()));
        }
    }
}
