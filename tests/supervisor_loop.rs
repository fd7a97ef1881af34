// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! End-to-end runs of the supervisor over the serial transport, with host-side fakes for the
//! UART, motors, watchdog, battery sense, and indicators.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use arxbot::config::{AlertConfig, HealthConfig, LivenessPolicy, SupervisorConfig};
use arxbot::drivers::{Direction, Drive};
use arxbot::protocol::messages::{SideCommand, MSG_BRAKE, MSG_MOVE, MSG_PING, TLM_PONG};
use arxbot::protocol::parser::encode;
use arxbot::protocol::Telecom;
use arxbot::supervisor::{
    BatteryMonitor, BatterySense, CommandEntry, FailSafe, HaltReason, Indicator, LowPower,
    Supervisor,
};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial::{Read, Write};
use embedded_hal::watchdog::Watchdog;

// ---------- fakes ----------

#[derive(Clone, Default)]
struct Wire(Rc<RefCell<VecDeque<u8>>>);

impl Wire {
    fn send_frame(&self, id: u8, payload: &[u8]) {
        let mut buf = [0u8; 32];
        let n = encode(id, payload, &mut buf).unwrap();
        self.0.borrow_mut().extend(&buf[..n]);
    }

    fn send_raw(&self, bytes: &[u8]) {
        self.0.borrow_mut().extend(bytes);
    }
}

impl Read<u8> for Wire {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.0.borrow_mut().pop_front().ok_or(nb::Error::WouldBlock)
    }
}

#[derive(Clone, Default)]
struct Sink(Rc<RefCell<Vec<u8>>>);

impl Write<u8> for Sink {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        self.0.borrow_mut().push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Motion {
    Drive(SideCommand, SideCommand),
    Brake,
}

#[derive(Clone, Default)]
struct Motors(Rc<RefCell<Vec<Motion>>>);

impl Drive for Motors {
    fn drive(&mut self, left: SideCommand, right: SideCommand) {
        self.0.borrow_mut().push(Motion::Drive(left, right));
    }

    fn brake(&mut self) {
        self.0.borrow_mut().push(Motion::Brake);
    }
}

#[derive(Clone, Default)]
struct Dog(Rc<Cell<u32>>);

impl Watchdog for Dog {
    fn feed(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

/// Battery that reads `level` after the sum/divide step.
struct Battery {
    raw: u16,
}

impl Battery {
    fn at_level(level: u16) -> Self {
        // 7 samples of `raw` divided by 5
        Self { raw: level * 5 / 7 }
    }
}

impl BatterySense for Battery {
    type Error = Infallible;

    fn sample(&mut self) -> Result<u16, Infallible> {
        Ok(self.raw)
    }
}

#[derive(Clone)]
struct Lamp {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl Indicator for Lamp {
    fn set(&mut self, on: bool) {
        self.log
            .borrow_mut()
            .push(format!("{}:{}", self.name, if on { "on" } else { "off" }));
    }
}

#[derive(Clone, Default)]
struct Clock(Rc<Cell<u32>>);

impl DelayMs<u16> for Clock {
    fn delay_ms(&mut self, ms: u16) {
        self.0.set(self.0.get() + ms as u32);
    }
}

struct Halted;

struct Sleep;

impl LowPower for Sleep {
    fn sleep_forever(&mut self) -> ! {
        panic::panic_any(Halted)
    }
}

// ---------- rig ----------

type Rig = Supervisor<
    'static,
    Telecom<Wire, Sink, Motors>,
    Dog,
    Battery,
    FailSafe<Lamp, Lamp, Clock, Sleep>,
>;

struct Bench {
    wire: Wire,
    sink: Sink,
    motors: Motors,
    dog: Dog,
    clock: Clock,
    lamps: Rc<RefCell<Vec<String>>>,
}

fn bench(level: u16, config: SupervisorConfig) -> (Bench, Rig) {
    let b = Bench {
        wire: Wire::default(),
        sink: Sink::default(),
        motors: Motors::default(),
        dog: Dog::default(),
        clock: Clock::default(),
        lamps: Rc::default(),
    };
    let failsafe = FailSafe::new(
        Lamp { name: "a", log: b.lamps.clone() },
        Lamp { name: "b", log: b.lamps.clone() },
        b.clock.clone(),
        Sleep,
        config.alert,
    );
    let supervisor = Supervisor::new(
        Telecom::new(b.wire.clone(), b.sink.clone(), b.motors.clone()),
        b.dog.clone(),
        BatteryMonitor::new(Battery::at_level(level), config.health),
        failsafe,
        config,
    );
    (b, supervisor)
}

fn quick_config() -> SupervisorConfig {
    SupervisorConfig {
        health_period: 8,
        alert: AlertConfig { cycles: 3, phase_ms: 100 },
        ..Default::default()
    }
}

thread_local! {
    static USER_CALLS: RefCell<Vec<(u8, Vec<u8>)>> = const { RefCell::new(Vec::new()) };
}

fn user_calls() -> Vec<(u8, Vec<u8>)> {
    USER_CALLS.with(|c| c.borrow().clone())
}

fn swallow(id: u8, payload: &[u8]) -> bool {
    USER_CALLS.with(|c| c.borrow_mut().push((id, payload.to_vec())));
    false
}

fn observe(id: u8, payload: &[u8]) -> bool {
    USER_CALLS.with(|c| c.borrow_mut().push((id, payload.to_vec())));
    true
}

// ---------- tests ----------

#[test]
fn ping_round_trips_over_the_wire() {
    let (b, mut sup) = bench(900, SupervisorConfig::default());
    b.wire.send_frame(MSG_PING, &[7, 8]);

    assert_eq!(sup.step(), None);

    let mut expected = [0u8; 32];
    let n = encode(TLM_PONG, &[7, 8], &mut expected).unwrap();
    assert_eq!(*b.sink.0.borrow(), expected[..n].to_vec());
    assert_eq!(b.dog.0.get(), 1);
}

#[test]
fn move_frame_reaches_the_motors() {
    let (b, mut sup) = bench(900, SupervisorConfig::default());
    b.wire.send_frame(MSG_MOVE, &[1, 200, 2, 50]);
    b.wire.send_frame(MSG_BRAKE, &[]);

    sup.step();
    sup.step();

    let left = SideCommand { direction: Direction::Forward, speed: 200 };
    let right = SideCommand { direction: Direction::Reverse, speed: 50 };
    assert_eq!(*b.motors.0.borrow(), vec![Motion::Drive(left, right), Motion::Brake]);
    assert_eq!(b.dog.0.get(), 2);
}

#[test]
fn user_handler_overrides_then_falls_through() {
    static TABLE: [CommandEntry; 2] = [
        CommandEntry::new(MSG_BRAKE, swallow),
        CommandEntry::new(MSG_MOVE, observe),
    ];

    let (b, mut sup) = bench(900, SupervisorConfig::default());
    sup.install_commands(&TABLE).unwrap();

    b.wire.send_frame(MSG_BRAKE, &[]);
    b.wire.send_frame(MSG_MOVE, &[1, 10, 1, 10]);
    sup.step();
    sup.step();

    assert_eq!(user_calls(), vec![(MSG_BRAKE, vec![]), (MSG_MOVE, vec![1, 10, 1, 10])]);
    // BRAKE was consumed; MOVE also reached the built-in handler.
    let side = SideCommand { direction: Direction::Forward, speed: 10 };
    assert_eq!(*b.motors.0.borrow(), vec![Motion::Drive(side, side)]);
}

#[test]
fn line_noise_does_not_feed_the_watchdog() {
    let (b, mut sup) = bench(900, SupervisorConfig::default());
    // Garbage, then a frame with a bad checksum.
    b.wire.send_raw(&[0x00, 0x13, 0x37]);
    b.wire.send_raw(&[0xA5, MSG_PING, 0x00, 0xFF]);

    for _ in 0..4 {
        assert_eq!(sup.step(), None);
    }

    assert_eq!(b.dog.0.get(), 0);
    assert!(b.sink.0.borrow().is_empty());
}

#[test]
fn every_iteration_policy_feeds_while_idle() {
    let config = SupervisorConfig {
        liveness: LivenessPolicy::EveryIteration,
        ..Default::default()
    };
    let (b, mut sup) = bench(900, config);

    for _ in 0..10 {
        sup.step();
    }
    assert_eq!(b.dog.0.get(), 10);
}

#[test]
fn healthy_battery_keeps_running() {
    let (_b, mut sup) = bench(900, quick_config());
    for _ in 0..100 {
        assert_eq!(sup.step(), None);
    }
}

#[test]
fn low_battery_is_reported_on_the_cadence() {
    let (_b, mut sup) = bench(700, quick_config());

    for _ in 0..6 {
        assert_eq!(sup.step(), None);
    }
    assert_eq!(sup.step(), Some(HaltReason::UnderVoltage { level: 700 }));
}

#[test]
fn threshold_is_configurable() {
    let config = SupervisorConfig {
        health: HealthConfig { threshold: 600, ..Default::default() },
        ..quick_config()
    };
    let (_b, mut sup) = bench(700, config);
    for _ in 0..32 {
        assert_eq!(sup.step(), None);
    }
}

#[test]
fn low_battery_run_alerts_then_sleeps() {
    let (b, sup) = bench(700, quick_config());
    // Queued before a restart on a flat battery; must never reach the motors.
    b.wire.send_frame(MSG_MOVE, &[1, 255, 1, 255]);
    let brought_up = Rc::new(Cell::new(false));
    let flag = brought_up.clone();

    let result = panic::catch_unwind(AssertUnwindSafe(move || {
        sup.run(|| flag.set(true));
    }));

    let payload = result.err().unwrap();
    assert!(payload.downcast_ref::<Halted>().is_some());
    assert!(brought_up.get());
    assert!(b.motors.0.borrow().is_empty());
    assert_eq!(b.dog.0.get(), 0);

    // 3 cycles, two 100 ms phases each.
    assert_eq!(b.clock.0.get(), 600);
    let lamps = b.lamps.borrow();
    assert_eq!(lamps.len(), 12);
    for cycle in lamps.chunks(4) {
        assert_eq!(cycle, ["a:on", "b:off", "a:off", "b:on"]);
    }
}
