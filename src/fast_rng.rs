// Random number sources used by the sampling routines
//
// FastRng gives each neutron history its own reproducible block of a
// single PCG sequence.

use rand::rngs::StdRng;
use rand::Rng;

/// Source of uniform random numbers in [0, 1).
///
/// Every sampling routine in the crate is generic over this trait so that a
/// transport loop can plug in its own per-thread generator and tests can
/// replay a fixed stream of numbers.
pub trait RandomSource {
    fn random(&mut self) -> f64;
}

const PRN_MULT: u64 = 6364136223846793005;
const PRN_ADD: u64 = 1442695040888963407;

/// Draws reserved for one neutron history, secondaries included.
pub const HISTORY_STRIDE: u64 = 152_917;

/// PCG stream with LCG skip-ahead.
///
/// `for_history` positions the stream at the start of a history's block of
/// [`HISTORY_STRIDE`] draws, so a history samples the same numbers no matter
/// which thread runs it or in what order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FastRng {
    state: u64,
}

impl FastRng {
    pub fn new(seed: u64) -> Self {
        FastRng { state: seed }
    }

    pub fn for_history(master_seed: u64, history: u64) -> Self {
        let mut rng = FastRng::new(master_seed);
        rng.skip_ahead(history.wrapping_mul(HISTORY_STRIDE));
        rng
    }

    /// Advance the stream by `n` draws in O(log n)
    pub fn skip_ahead(&mut self, mut n: u64) {
        let (mut g, mut c) = (PRN_MULT, PRN_ADD);
        let (mut g_total, mut c_total) = (1u64, 0u64);
        while n > 0 {
            if n & 1 == 1 {
                g_total = g_total.wrapping_mul(g);
                c_total = c_total.wrapping_mul(g).wrapping_add(c);
            }
            c = g.wrapping_add(1).wrapping_mul(c);
            g = g.wrapping_mul(g);
            n >>= 1;
        }
        self.state = g_total.wrapping_mul(self.state).wrapping_add(c_total);
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = PRN_MULT.wrapping_mul(self.state).wrapping_add(PRN_ADD);
        let word = ((self.state >> ((self.state >> 59) + 5)) ^ self.state)
            .wrapping_mul(12605985483714917081);
        (word >> 43) ^ word
    }
}

impl RandomSource for FastRng {
    /// Uniform in [0, 1): the 64 output bits scaled by 2^-64
    #[inline]
    fn random(&mut self) -> f64 {
        self.next_u64() as f64 * 5.421010862427522e-20
    }
}

impl RandomSource for StdRng {
    #[inline]
    fn random(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Deterministic stream that replays a fixed list of numbers, wrapping
/// around once the end is reached.
///
/// Used to pin down the exact sequence of draws a sampling routine makes.
#[derive(Clone, Debug)]
pub struct FakeStream {
    values: Vec<f64>,
    position: usize,
}

impl FakeStream {
    pub fn new(values: Vec<f64>) -> Self {
        debug_assert!(!values.is_empty(), "fake stream needs at least one value");
        FakeStream {
            values,
            position: 0,
        }
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.position
    }

    /// Restart the stream from its first value
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl RandomSource for FakeStream {
    fn random(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}
