// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The supervisory main loop.
//!
//! One iteration:
//!
//! 1. poll the transport and dispatch at most one decoded command,
//! 2. emit pending telemetry,
//! 3. advance the loop counter,
//! 4. when the counter hits its sentinel, check the battery.
//!
//! [`Supervisor::run`] checks the battery once before the first iteration.
//!
//! The loop has two states, Running and Halted. Halted is terminal and belongs to the
//! [`Shutdown`] implementation, which never returns.

use embedded_hal::watchdog::Watchdog;
use log::{error, warn};

use crate::config::{LivenessPolicy, SupervisorConfig};
use crate::protocol::Transport;
use crate::supervisor::cadence::Cadence;
use crate::supervisor::command_table::{CommandEntry, CommandTable, TableError, NO_COMMAND};
use crate::supervisor::dispatcher::Dispatcher;
use crate::supervisor::failsafe::{HaltReason, Shutdown};
use crate::supervisor::health::{BatteryMonitor, BatterySense, Health};

pub struct Supervisor<'t, T, W, S, F> {
    transport: T,
    watchdog: W,
    monitor: BatteryMonitor<S>,
    failsafe: F,
    dispatcher: Dispatcher<'t>,
    cadence: Cadence,
    liveness: LivenessPolicy,
    started: bool,
}

impl<'t, T, W, S, F> Supervisor<'t, T, W, S, F>
where
    T: Transport,
    W: Watchdog,
    S: BatterySense,
    F: Shutdown,
{
    /// Build a supervisor with an empty command table.
    pub fn new(
        transport: T,
        watchdog: W,
        monitor: BatteryMonitor<S>,
        failsafe: F,
        config: SupervisorConfig,
    ) -> Self {
        Self {
            transport,
            watchdog,
            monitor,
            failsafe,
            dispatcher: Dispatcher::default(),
            cadence: Cadence::new(config.health_period),
            liveness: config.liveness,
            started: false,
        }
    }

    /// Install the integrator's command table, replacing any previous one.
    ///
    /// Only possible before the first [`step`](Self::step); afterwards this returns
    /// [`TableError::LoopStarted`]. On error the previous table stays installed.
    pub fn install_commands(&mut self, entries: &'t [CommandEntry]) -> Result<(), TableError> {
        if self.started {
            warn!("command table rejected: loop already running");
            return Err(TableError::LoopStarted);
        }
        let table = CommandTable::new(entries).map_err(|e| {
            warn!("command table rejected: {}", e);
            e
        })?;
        self.dispatcher.install(table);
        Ok(())
    }

    /// Run one Running-state iteration.
    ///
    /// Returns the reason to halt if the battery check failed. The halt itself is left to the
    /// caller.
    pub fn step(&mut self) -> Option<HaltReason> {
        self.started = true;

        if self.transport.poll() {
            self.process_command();
        }

        self.transport.emit_pending_telemetry();

        if self.liveness == LivenessPolicy::EveryIteration {
            self.watchdog.feed();
        }

        if self.cadence.tick() {
            return self.check_battery();
        }
        None
    }

    /// Bring the platform up once, check the battery, then loop until a fail-safe halt.
    ///
    /// The startup check runs before any command is dispatched, so a watchdog reset out of the
    /// halted state cannot drive the motors on a flat battery.
    pub fn run(mut self, bring_up: impl FnOnce()) -> ! {
        bring_up();
        if let Some(reason) = self.check_battery() {
            self.failsafe.shutdown(reason);
        }
        loop {
            if let Some(reason) = self.step() {
                self.failsafe.shutdown(reason);
            }
        }
    }

    fn process_command(&mut self) {
        let id = self.transport.decode_next();
        if id == NO_COMMAND {
            return;
        }

        // Certifies the loop is alive, not that the command succeeded.
        if self.liveness == LivenessPolicy::OnCommand {
            self.watchdog.feed();
        }

        self.dispatcher.dispatch(&mut self.transport, id);
    }

    fn check_battery(&mut self) -> Option<HaltReason> {
        match self.monitor.check() {
            Ok(Health::Nominal { .. }) => None,
            Ok(Health::UnderVoltage { level }) => {
                warn!("battery under-voltage: {}", level);
                Some(HaltReason::UnderVoltage { level })
            }
            Err(e) => {
                error!("battery sense fault: {:?}", e);
                Some(HaltReason::SenseFault)
            }
        }
    }

    /// Iterations counted modulo the health period.
    #[inline]
    pub fn loop_count(&self) -> u16 {
        self.cadence.count()
    }

    #[inline]
    pub fn table(&self) -> CommandTable<'t> {
        self.dispatcher.table()
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
