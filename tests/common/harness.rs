use pipeline16::{Cpu, StateSnapshot};

/// Wraps a [`Cpu`] with convenience helpers for loading assembly source,
/// stepping it, and reading back architectural state.
pub struct TestContext {
    /// The CPU under test.
    pub cpu: Cpu,
    ever_stalled: bool,
}

impl TestContext {
    /// Assembles `source`, asserting it contains no diagnostics, loads
    /// the result into a fresh CPU, and starts it.
    #[must_use]
    pub fn assemble(source: &str) -> Self {
        let (words, errors) = pipeline16::assemble(source);
        assert!(errors.is_empty(), "assembly failed: {errors:?}");
        let mut cpu = Cpu::new();
        cpu.load_program(&words);
        cpu.start();
        Self {
            cpu,
            ever_stalled: false,
        }
    }

    /// Pre-seeds a data memory word before running.
    #[must_use]
    pub fn with_data_mem(mut self, addr: u16, value: u16) -> Self {
        self.cpu.seed_data_mem(addr, value);
        self
    }

    /// Steps the CPU `n` times, stopping early if it halts.
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            if !self.cpu.is_running() {
                break;
            }
            self.cpu.step();
            self.ever_stalled |= self.cpu.get_state().hazards.stall;
        }
    }

    /// Steps the CPU until it halts, bailing out after `max_cycles` to
    /// avoid hanging a test on a runaway program.
    pub fn run_to_halt(&mut self, max_cycles: u64) {
        for _ in 0..max_cycles {
            if !self.cpu.is_running() {
                return;
            }
            self.cpu.step();
            self.ever_stalled |= self.cpu.get_state().hazards.stall;
        }
        panic!("program did not halt within {max_cycles} cycles");
    }

    /// Reads register `idx` from the current state snapshot.
    #[must_use]
    pub fn reg(&self, idx: u16) -> u16 {
        self.cpu.get_state().regfile[idx as usize]
    }

    /// Reads data memory at `addr` (`0` if never written).
    #[must_use]
    pub fn data_mem(&self, addr: u16) -> u16 {
        self.cpu
            .get_state()
            .data_mem
            .into_iter()
            .find(|&(a, _)| a == addr as usize)
            .map_or(0, |(_, v)| v)
    }

    /// `true` iff a load-use stall was raised during any `run`/`run_to_halt`
    /// call on this context so far.
    #[must_use]
    pub fn ever_stalled(&self) -> bool {
        self.ever_stalled
    }

    /// The full state snapshot, for tests that need more than a single
    /// register or memory cell.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.cpu.get_state()
    }
}
