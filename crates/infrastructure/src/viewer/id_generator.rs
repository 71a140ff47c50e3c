use dns_feed_domain::ConnectionId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

const ID_LEN: usize = 20;
const ALPHABET: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_-";

/// Produces viewer connection ids.
///
/// Ids are 20 symbols from a 64-symbol URL-safe alphabet. They are unique
/// with overwhelming probability; they are not secrets.
pub struct ConnectionIdGenerator {
    rng: Mutex<StdRng>,
}

impl ConnectionIdGenerator {
    /// Generator seeded from the OS CSPRNG.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn next_id(&self) -> ConnectionId {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let id: String = (0..ID_LEN)
            .map(|_| ALPHABET[(rng.gen::<u8>() & 63) as usize] as char)
            .collect();
        ConnectionId::new(id)
    }
}

impl Default for ConnectionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
