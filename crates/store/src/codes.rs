//! Sources of candidate order codes.
//!
//! A source only proposes codes; the store checks each proposal against
//! every existing order before accepting it.

use std::collections::VecDeque;
use std::sync::Mutex;

use common::OrderId;
use rand::Rng;

/// Proposes candidate order codes.
pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> OrderId;
}

/// Uniformly random codes from [`OrderId::ALPHABET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn next_code(&self) -> OrderId {
        let mut rng = rand::thread_rng();
        let code: String = (0..OrderId::LEN)
            .map(|_| {
                let idx = rng.gen_range(0..OrderId::ALPHABET.len());
                OrderId::ALPHABET[idx] as char
            })
            .collect();
        // Built from the alphabet at the right length, so it always parses.
        OrderId::parse(&code).unwrap_or_else(|_| unreachable!("generated code {code} is valid"))
    }
}

/// Replays a fixed list of codes, then falls back to random ones.
///
/// Used to force collisions in tests.
#[derive(Debug, Default)]
pub struct ScriptedCodes {
    queue: Mutex<VecDeque<OrderId>>,
}

impl ScriptedCodes {
    pub fn new(codes: impl IntoIterator<Item = OrderId>) -> Self {
        Self {
            queue: Mutex::new(codes.into_iter().collect()),
        }
    }

    /// Number of scripted codes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl CodeSource for ScriptedCodes {
    fn next_code(&self) -> OrderId {
        let scripted = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        scripted.unwrap_or_else(|| RandomCodes.next_code())
    }
}
