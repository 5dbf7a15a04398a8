//! Cache module for holding API responses in memory
//!
//! This module provides a cache manager that keeps API responses with a
//! configurable TTL (time-to-live). Reads report whether an entry has expired,
//! and the clock is injectable so expiry can be tested without sleeping.

mod manager;

pub use manager::{CacheManager, CachedData, Clock, ManualClock, SystemClock};
