//! Two-stack tape for reverse-mode AD.
//!
//! Each recorded operation stores precomputed partial derivatives (weights)
//! and the tape slots of its operands during the forward pass. The reverse
//! sweep is then a single multiply-accumulate loop with zero-adjoint skipping.
//! Used internally by [`crate::Var`] via a thread-local active-tape pointer.

use std::cell::Cell;

use crate::Float;

/// Sentinel slot for a constant (not recorded on the tape).
pub const CONSTANT: u32 = u32::MAX;

/// A recorded operation. Its result lives in slot `result`; its operand
/// weights and slots start at offset `first` in the weight/arg stacks and run
/// to the `first` of the following entry (or the stack end for the last one).
#[derive(Clone, Copy, Debug)]
struct Entry {
    result: u32,
    first: u32,
}

/// Reverse-mode tape.
///
/// Input slots are allocated with [`Tape::input`] and carry no entry; they are
/// leaves whose adjoints survive the sweep.
pub struct Tape<F: Float> {
    entries: Vec<Entry>,
    weights: Vec<F>,
    args: Vec<u32>,
    num_slots: u32,
}

impl<F: Float> Default for Tape<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Tape<F> {
    /// Create an empty tape.
    pub fn new() -> Self {
        Tape {
            entries: Vec::new(),
            weights: Vec::new(),
            args: Vec::new(),
            num_slots: 0,
        }
    }

    /// Create a tape with pre-allocated capacity for roughly `est_ops` operations.
    pub fn with_capacity(est_ops: usize) -> Self {
        Tape {
            entries: Vec::with_capacity(est_ops),
            weights: Vec::with_capacity(est_ops * 2),
            args: Vec::with_capacity(est_ops * 2),
            num_slots: 0,
        }
    }

    /// Allocate a slot for an independent variable and return it.
    #[inline]
    pub fn input(&mut self, _value: F) -> u32 {
        let slot = self.num_slots;
        self.num_slots += 1;
        slot
    }

    /// Number of slots allocated so far (inputs plus intermediates).
    #[inline]
    pub fn num_slots(&self) -> usize {
        self.num_slots as usize
    }

    /// Record `result = f(operand)` with precomputed `weight = df/d(operand)`.
    #[inline]
    pub fn push_unary(&mut self, arg: u32, weight: F) -> u32 {
        let result = self.num_slots;
        self.num_slots += 1;

        let first = self.weights.len() as u32;
        if arg != CONSTANT {
            self.weights.push(weight);
            self.args.push(arg);
        }
        self.entries.push(Entry { result, first });
        result
    }

    /// Record a binary operation with precomputed partials for both operands.
    #[inline]
    pub fn push_binary(&mut self, lhs: u32, lhs_weight: F, rhs: u32, rhs_weight: F) -> u32 {
        let result = self.num_slots;
        self.num_slots += 1;

        let first = self.weights.len() as u32;
        if lhs != CONSTANT {
            self.weights.push(lhs_weight);
            self.args.push(lhs);
        }
        if rhs != CONSTANT {
            self.weights.push(rhs_weight);
            self.args.push(rhs);
        }
        self.entries.push(Entry { result, first });
        result
    }

    /// Run the reverse sweep with the given `(slot, seed)` adjoint seeds.
    /// Returns the full adjoint vector over all slots.
    pub fn sweep(&self, seeds: &[(u32, F)]) -> Vec<F> {
        let mut adjoints = vec![F::zero(); self.num_slots as usize];
        for &(slot, seed) in seeds {
            adjoints[slot as usize] = adjoints[slot as usize] + seed;
        }

        let mut end = self.weights.len();
        for entry in self.entries.iter().rev() {
            let first = entry.first as usize;
            let a = adjoints[entry.result as usize];
            if a != F::zero() {
                adjoints[entry.result as usize] = F::zero();
                for k in first..end {
                    let arg = self.args[k] as usize;
                    adjoints[arg] = adjoints[arg] + self.weights[k] * a;
                }
            }
            end = first;
        }
        adjoints
    }
}

// Thread-local active tape pointer, one per base float type.
thread_local! {
    static TAPE_F32: Cell<*mut Tape<f32>> = const { Cell::new(std::ptr::null_mut()) };
    static TAPE_F64: Cell<*mut Tape<f64>> = const { Cell::new(std::ptr::null_mut()) };
}

/// Selects the thread-local tape cell for a base float type.
pub trait TapeLocal: Float {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>>;
}

impl TapeLocal for f32 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F32
    }
}

impl TapeLocal for f64 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F64
    }
}

/// Run `f` against the active tape for the current thread.
///
/// Panics if no tape is active, i.e. if a [`crate::Var`] operation runs
/// outside a recording scope.
#[inline]
pub fn with_tape<F: TapeLocal, R>(f: impl FnOnce(&mut Tape<F>) -> R) -> R {
    F::cell().with(|cell| {
        let ptr = cell.get();
        assert!(
            !ptr.is_null(),
            "no active tape; Var arithmetic is only valid inside a recording scope"
        );
        // SAFETY: TapeScope keeps the pointee alive and exclusively borrowed
        // for the duration of the scope, and access is thread-local.
        let tape = unsafe { &mut *ptr };
        f(tape)
    })
}

/// RAII scope that installs a tape as the thread-local active tape and
/// restores the previous one on drop.
pub struct TapeScope<F: TapeLocal> {
    prev: *mut Tape<F>,
}

impl<F: TapeLocal> TapeScope<F> {
    /// Activate `tape` for the current thread.
    pub fn activate(tape: &mut Tape<F>) -> Self {
        let prev = F::cell().with(|cell| {
            let prev = cell.get();
            cell.set(tape as *mut Tape<F>);
            prev
        });
        TapeScope { prev }
    }
}

impl<F: TapeLocal> Drop for TapeScope<F> {
    fn drop(&mut self) {
        F::cell().with(|cell| {
            cell.set(self.prev);
        });
    }
}
