use std::num::NonZeroU32;

use middleware::global::GlobalLimiter;

pub mod middleware {
    pub mod global;
}

pub fn global_middleware(permits_per_second: NonZeroU32) -> GlobalLimiter {
    GlobalLimiter::new(permits_per_second)
}
