//! Time-ordered, URL-safe keys in the hosted store's push-id format.

use parking_lot::Mutex;
use rand::Rng;

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Default)]
pub struct PushIdGenerator {
    state: Mutex<PushIdState>,
}

#[derive(Debug, Default)]
struct PushIdState {
    last_millis: i64,
    last_random: [u8; 12],
}

impl PushIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self) -> String {
        self.generate_at(chrono::Utc::now().timestamp_millis())
    }

    /// Ids generated within the same millisecond increment the random suffix
    /// so they still sort in creation order.
    pub fn generate_at(&self, millis: i64) -> String {
        let mut state = self.state.lock();

        if millis == state.last_millis {
            for slot in state.last_random.iter_mut().rev() {
                if *slot == 63 {
                    *slot = 0;
                } else {
                    *slot += 1;
                    break;
                }
            }
        } else {
            let mut rng = rand::thread_rng();
            for slot in state.last_random.iter_mut() {
                *slot = rng.gen_range(0..64);
            }
            state.last_millis = millis;
        }

        let mut id = String::with_capacity(20);
        let mut time_chars = [0u8; 8];
        let mut remaining = millis.max(0);
        for slot in time_chars.iter_mut().rev() {
            *slot = PUSH_CHARS[(remaining % 64) as usize];
            remaining /= 64;
        }
        id.extend(time_chars.iter().map(|&c| c as char));
        id.extend(state.last_random.iter().map(|&i| PUSH_CHARS[i as usize] as char));
        id
    }
}
