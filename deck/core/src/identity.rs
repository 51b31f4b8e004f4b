//! Session Identity
//!
//! The deck footer displays a short session tag ("ID: X7K2P9QRM //
//! ENCRYPTED"). The tag carries no invariant worth owning, so it is an
//! injected collaborator: surfaces take a [`TagSource`] and never reach
//! for randomness themselves, which keeps headless runs and tests
//! deterministic.

use rand::Rng;

/// Characters a random session tag is drawn from
const TAG_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a session tag
const TAG_LEN: usize = 9;

/// Source of session display tags
pub trait TagSource {
    /// Produce a session tag
    fn session_tag(&self) -> String;
}

/// Random uppercase-alphanumeric tags
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomTagSource;

impl TagSource for RandomTagSource {
    fn session_tag(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..TAG_LEN)
            .map(|_| TAG_CHARSET[rng.gen_range(0..TAG_CHARSET.len())] as char)
            .collect()
    }
}

/// Fixed tag for tests and headless runs
#[derive(Clone, Debug)]
pub struct FixedTagSource(String);

impl FixedTagSource {
    /// Create a source that always returns `tag`
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

impl TagSource for FixedTagSource {
    fn session_tag(&self) -> String {
        self.0.clone()
    }
}
