//! Per-combination testbench.
//!
//! The testbench owns every piece of one simulated run and evaluates them edge by edge:
//! 1. **Kernel:** Two clock sources; each step yields the domains that ticked.
//! 2. **Reset:** The sequencer sees every edge; a domain's logic runs only once released.
//! 3. **Domain A edge:** Initiator ↔ bridge handshakes (initiator pacing), then the
//!    initiator consumes responses, then the bridge's A-side synchronizers shift.
//! 4. **Domain B edge:** Bridge ↔ target handshakes (target pacing), then the target
//!    retires beats, then the bridge's B-side synchronizers shift.
//!
//! Every wait is bounded: the reset sequence by `reset_timeout`, each bus operation by
//! `handshake_timeout`.

use tracing::{debug, trace};

use super::BusAccess;
use crate::axi::{
    AxiMaster, AxiRam, CdcBridge, ChannelStats, Completion, OpId, ReadFault, handshake,
};
use crate::common::{HarnessError, Result, SimTime, TimeUnit};
use crate::config::{BenchConfig, PacingChoice};
use crate::pacing::{Channel, ChannelId, PacingInjectors, PacingPattern, Side};
use crate::sim::{ClockSource, Domain, EdgeEvent, ResetSequencer, SimKernel};

/// Per-link statistics, indexed by [`ChannelId::index`].
///
/// Links crossing in domain A are keyed by the initiator-side id, links in domain B by the
/// target-side id, i.e. by the end that carries the pacing.
pub type LinkStats = [ChannelStats; ChannelId::COUNT];

/// Fluent construction of a [`Testbench`].
///
/// # Examples
///
/// ```
/// use mcdc_core::config::PacingChoice;
/// use mcdc_core::harness::{BusAccess, TestbenchBuilder};
///
/// let mut bench = TestbenchBuilder::new()
///     .periods(10, 20)
///     .pacing(PacingChoice::Shuffled, PacingChoice::None)
///     .build()
///     .unwrap();
/// bench.reset().unwrap();
/// bench.write(0x40, &[1, 2, 3]).unwrap();
/// assert_eq!(bench.read(0x40, 3).unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct TestbenchBuilder {
    bench: BenchConfig,
    unit: TimeUnit,
    periods: [u64; 2],
    exact_periods: Option<[SimTime; 2]>,
    stopped: [bool; 2],
    initiator: PacingChoice,
    target: PacingChoice,
    pacing_base: Vec<bool>,
    seed: u64,
    overrides: Vec<(ChannelId, Option<PacingPattern>)>,
    fault: Option<ReadFault>,
}

impl Default for TestbenchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestbenchBuilder {
    /// Builder with the reference bench parameters, 10 ns/20 ns clocks and no pacing.
    pub fn new() -> Self {
        Self {
            bench: BenchConfig::default(),
            unit: TimeUnit::default(),
            periods: [10, 20],
            exact_periods: None,
            stopped: [false; 2],
            initiator: PacingChoice::None,
            target: PacingChoice::None,
            pacing_base: crate::common::constants::REFERENCE_PACING.to_vec(),
            seed: 0,
            overrides: Vec::new(),
            fault: None,
        }
    }

    /// Bench parameters.
    #[must_use]
    pub fn bench(mut self, bench: BenchConfig) -> Self {
        self.bench = bench;
        self
    }

    /// Unit for periods and every time value in the bench parameters.
    #[must_use]
    pub const fn time_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Clock periods for domains A and B.
    #[must_use]
    pub const fn periods(mut self, period_a: u64, period_b: u64) -> Self {
        self.periods = [period_a, period_b];
        self
    }

    /// Clock periods given directly in kernel time; overrides [`periods`](Self::periods).
    #[must_use]
    pub const fn clock_periods(mut self, period_a: SimTime, period_b: SimTime) -> Self {
        self.exact_periods = Some([period_a, period_b]);
        self
    }

    /// Holds `domain`'s clock still (it never produces an edge).
    #[must_use]
    pub const fn stop_clock(mut self, domain: Domain) -> Self {
        self.stopped[domain.index()] = true;
        self
    }

    /// Pacing choice for each side.
    #[must_use]
    pub const fn pacing(mut self, initiator: PacingChoice, target: PacingChoice) -> Self {
        self.initiator = initiator;
        self.target = target;
        self
    }

    /// Base sequence for patterned pacing.
    #[must_use]
    pub fn pacing_base(mut self, base: Vec<bool>) -> Self {
        self.pacing_base = base;
        self
    }

    /// Seed from which the ten per-channel seeds are derived.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the pattern on a single pacing point after the side choices are applied.
    #[must_use]
    pub fn attach(mut self, id: ChannelId, pattern: Option<PacingPattern>) -> Self {
        self.overrides.push((id, pattern));
        self
    }

    /// Corrupts read data returned by the target.
    #[must_use]
    pub const fn read_fault(mut self, fault: ReadFault) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Assembles the testbench.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid bench parameters, a zero period, or a
    /// requested pattern with an empty base.
    pub fn build(self) -> Result<Testbench> {
        self.bench.validate()?;
        let mut clocks = [ClockSource::stopped(SimTime::ZERO); 2];
        for domain in Domain::ALL {
            let period = match self.exact_periods {
                Some(exact) => exact[domain.index()],
                None => SimTime::from_unit(self.periods[domain.index()], self.unit),
            };
            if period == SimTime::ZERO {
                return Err(HarnessError::config(format!(
                    "domain {domain} period must be positive"
                )));
            }
            clocks[domain.index()] = if self.stopped[domain.index()] {
                ClockSource::stopped(period)
            } else {
                ClockSource::new(period)
            };
        }

        let mut injectors = PacingInjectors::from_choices(
            self.initiator,
            self.target,
            &self.pacing_base,
            self.seed,
        )?;
        for (id, pattern) in self.overrides {
            injectors.attach(id, pattern);
        }

        let mut ram = AxiRam::new(self.bench.ram_size, self.bench.data_width_bytes);
        ram.set_read_fault(self.fault);

        let [clock_a, clock_b] = clocks;
        Ok(Testbench {
            kernel: SimKernel::new(clock_a, clock_b),
            reset: ResetSequencer::new(
                self.bench.reset_hold_edges,
                clock_a.period(),
                clock_b.period(),
            ),
            injectors,
            master: AxiMaster::new(self.bench.data_width_bytes),
            bridge: CdcBridge::new(self.bench.fifo_depth, self.bench.sync_stages),
            ram,
            stats: [ChannelStats::default(); ChannelId::COUNT],
            initiator: self.initiator,
            target: self.target,
            unit: self.unit,
            config: self.bench,
        })
    }
}

/// One simulated system: initiator, clock-crossing bridge and memory target.
#[derive(Debug, Clone)]
pub struct Testbench {
    config: BenchConfig,
    unit: TimeUnit,
    initiator: PacingChoice,
    target: PacingChoice,
    kernel: SimKernel,
    reset: ResetSequencer,
    injectors: PacingInjectors,
    master: AxiMaster,
    bridge: CdcBridge,
    ram: AxiRam,
    stats: LinkStats,
}

impl Testbench {
    /// Current simulated time.
    pub const fn now(&self) -> SimTime {
        self.kernel.now()
    }

    /// Converts a bench time value to kernel time.
    pub const fn time(&self, value: u64) -> SimTime {
        SimTime::from_unit(value, self.unit)
    }

    /// Bench parameters in use.
    pub const fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Reset sequencer (phases and release times).
    pub const fn sequencer(&self) -> &ResetSequencer {
        &self.reset
    }

    /// Per-link handshake statistics gathered so far.
    pub const fn channel_stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Memory target, for backdoor inspection.
    pub const fn ram(&self) -> &AxiRam {
        &self.ram
    }

    /// Mutable memory target, for backdoor loading or fault injection.
    pub const fn ram_mut(&mut self) -> &mut AxiRam {
        &mut self.ram
    }

    /// Runs the reset sequence to completion and checks the release order.
    ///
    /// # Errors
    ///
    /// [`HarnessError::ResetTimeout`] if a domain is still in reset after `reset_timeout`,
    /// [`HarnessError::ResetOrderingViolation`] if B was not released strictly after A.
    pub fn reset(&mut self) -> Result<()> {
        let start = self.now();
        let deadline = start.saturating_add(self.time(self.config.reset_timeout));
        while let Some(domain) = self.reset.pending_domain() {
            let Some(event) = self.kernel.step_until(deadline) else {
                return Err(HarnessError::ResetTimeout {
                    domain,
                    waited: self.now().saturating_since(start),
                });
            };
            self.on_edge(event);
        }
        self.reset.verify_order()?;
        debug!(
            a = %self.reset.released_at(Domain::A).unwrap_or_default(),
            b = %self.reset.released_at(Domain::B).unwrap_or_default(),
            "reset complete"
        );
        Ok(())
    }

    /// Lets simulated time pass, evaluating every edge on the way.
    pub fn wait_time(&mut self, duration: SimTime) {
        let deadline = self.now().saturating_add(duration);
        while let Some(event) = self.kernel.step_until(deadline) {
            self.on_edge(event);
        }
    }

    /// Runs until the next rising edge of `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ClockStalled`] naming `domain` if its clock produces no edge
    /// within `handshake_timeout`.
    pub fn wait_edge(&mut self, domain: Domain) -> Result<()> {
        let start = self.now();
        let deadline = start.saturating_add(self.time(self.config.handshake_timeout));
        loop {
            let Some(event) = self.kernel.step_until(deadline) else {
                return Err(HarnessError::ClockStalled {
                    domain,
                    waited: self.now().saturating_since(start),
                });
            };
            self.on_edge(event);
            if event.ticked(domain) {
                return Ok(());
            }
        }
    }

    fn on_edge(&mut self, event: EdgeEvent) {
        for domain in event.domains() {
            let active = self.reset.is_released(domain);
            let _ = self.reset.on_edge(domain, event.time);
            if !active {
                continue;
            }
            match domain {
                Domain::A => self.clock_initiator(),
                Domain::B => self.clock_target(),
            }
        }
    }

    fn pace(&mut self, side: Side, channel: Channel) -> (ChannelId, bool) {
        let id = ChannelId::new(side, channel);
        (id, self.injectors.advance(id))
    }

    fn note(&self, id: ChannelId, fired: bool) {
        if fired {
            trace!(link = %id, time = %self.now(), "handshake");
        }
    }

    fn clock_initiator(&mut self) {
        let (id, gate) = self.pace(Side::Initiator, Channel::Aw);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.master.aw, gate, &mut self.bridge.aw, true, stats);
        self.note(id, fired);

        let (id, gate) = self.pace(Side::Initiator, Channel::W);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.master.w, gate, &mut self.bridge.w, true, stats);
        self.note(id, fired);

        let (id, gate) = self.pace(Side::Initiator, Channel::B);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.bridge.b, true, &mut self.master.b, gate, stats);
        self.note(id, fired);

        let (id, gate) = self.pace(Side::Initiator, Channel::Ar);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.master.ar, gate, &mut self.bridge.ar, true, stats);
        self.note(id, fired);

        let (id, gate) = self.pace(Side::Initiator, Channel::R);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.bridge.r, true, &mut self.master.r, gate, stats);
        self.note(id, fired);

        self.master.tick();
        self.bridge.clock(Domain::A);
    }

    fn clock_target(&mut self) {
        let (id, gate) = self.pace(Side::Target, Channel::Aw);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.bridge.aw, true, &mut self.ram.aw, gate, stats);
        self.note(id, fired);

        let (id, gate) = self.pace(Side::Target, Channel::W);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.bridge.w, true, &mut self.ram.w, gate, stats);
        self.note(id, fired);

        let (id, gate) = self.pace(Side::Target, Channel::B);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.ram.b, gate, &mut self.bridge.b, true, stats);
        self.note(id, fired);

        let (id, gate) = self.pace(Side::Target, Channel::Ar);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.bridge.ar, true, &mut self.ram.ar, gate, stats);
        self.note(id, fired);

        let (id, gate) = self.pace(Side::Target, Channel::R);
        let stats = &mut self.stats[id.index()];
        let fired = handshake(&mut self.ram.r, gate, &mut self.bridge.r, true, stats);
        self.note(id, fired);

        self.ram.tick();
        self.bridge.clock(Domain::B);
    }

    /// Simulated time `id`'s link has currently been blocked with a beat pending.
    pub fn blocked_for(&self, id: ChannelId) -> SimTime {
        let domain = match id.side {
            Side::Initiator => Domain::A,
            Side::Target => Domain::B,
        };
        let period = self.kernel.clock(domain).period().as_ps();
        SimTime(self.stats[id.index()].blocked_streak.saturating_mul(period))
    }

    /// Link that has been blocked for the longest current stretch of simulated time.
    pub fn most_blocked(&self) -> Option<ChannelId> {
        ChannelId::all()
            .map(|id| (id, self.blocked_for(id)))
            .filter(|&(_, blocked)| blocked > SimTime::ZERO)
            .max_by_key(|&(_, blocked)| blocked)
            .map(|(id, _)| id)
    }

    /// Steps the kernel until `op` completes or `handshake_timeout` expires.
    fn await_completion(
        &mut self,
        operation: &'static str,
        address: u64,
        op: OpId,
    ) -> Result<Completion> {
        let start = self.now();
        let deadline = start.saturating_add(self.time(self.config.handshake_timeout));
        loop {
            if let Some(done) = self.master.take_completion(op) {
                return Ok(done);
            }
            let Some(event) = self.kernel.step_until(deadline) else {
                return Err(HarnessError::HandshakeTimeout {
                    operation,
                    address,
                    channel: self.most_blocked(),
                    initiator: self.initiator,
                    target: self.target,
                    waited: self.now().saturating_since(start),
                });
            };
            self.on_edge(event);
        }
    }
}

impl BusAccess for Testbench {
    fn write(&mut self, addr: u64, data: &[u8]) -> Result<()> {
        let op = self.master.submit_write(addr, data);
        debug!(addr, len = data.len(), time = %self.now(), "write issued");
        let resp = match self.await_completion("write", addr, op)? {
            Completion::Write { resp } | Completion::Read { resp, .. } => resp,
        };
        debug!(addr, %resp, time = %self.now(), "write complete");
        if resp.is_ok() {
            Ok(())
        } else {
            Err(HarnessError::BusResponse {
                operation: "write",
                address: addr,
                resp,
            })
        }
    }

    fn read(&mut self, addr: u64, len: usize) -> Result<Vec<u8>> {
        let op = self.master.submit_read(addr, len);
        debug!(addr, len, time = %self.now(), "read issued");
        let (data, resp) = match self.await_completion("read", addr, op)? {
            Completion::Read { data, resp } => (data, resp),
            Completion::Write { resp } => (Vec::new(), resp),
        };
        debug!(addr, %resp, time = %self.now(), "read complete");
        if resp.is_ok() {
            Ok(data)
        } else {
            Err(HarnessError::BusResponse {
                operation: "read",
                address: addr,
                resp,
            })
        }
    }

    fn wait(&mut self, duration: SimTime) -> Result<()> {
        self.wait_time(duration);
        Ok(())
    }
}
