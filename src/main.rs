#![no_main]
#![no_std]

use cortex_m::delay::Delay;
use cortex_m_rt::entry;
use log::{info, warn, LevelFilter};
use panic_halt as _;

use arxbot::{
    config::{SerialPort, SupervisorConfig, TransportConfig},
    drivers::{Mcp4017, Motor, MotorPair},
    hw::{usart, Adc, BoardPins, CommandRx, CommandTx, DeepSleep, Iwdg, Led, Usart},
    protocol::{messages::MSG_MOVE, Telecom},
    supervisor::{BatteryMonitor, CommandEntry, FailSafe, Supervisor},
};
use hal::{
    i2c::{BlockingI2c, Mode},
    pac,
    prelude::*,
    serial::{Config, Serial},
    timer::{Channel1, Channel2},
};
use stm32f7xx_hal as hal;

const DEBUG_BAUD: u32 = 115_200;
// Longer than the 20 s fail-safe alert, so the alert always completes.
const WATCHDOG_TIMEOUT_MS: u32 = 25_000;
const CURRENT_LIMIT_STEPS: u8 = 64;
const VBATT_CHANNEL: u8 = 5; // PA5
const MSG_HELLO: u8 = 0x40;

fn on_move(_id: u8, payload: &[u8]) -> bool {
    info!("move {:?}", payload);
    true
}

fn on_hello(_id: u8, _payload: &[u8]) -> bool {
    info!("hello");
    false
}

static COMMANDS: [CommandEntry; 2] = [
    CommandEntry::new(MSG_MOVE, on_move),
    CommandEntry::new(MSG_HELLO, on_hello),
];

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
    let transport_cfg = TransportConfig::default();
    let config = SupervisorConfig::default();

    // Command port, and the debug logger when USART1 is free
    let command_cfg = Config {
        baud_rate: transport_cfg.baud.bps(),
        ..Default::default()
    };
    let (rx, tx) = match transport_cfg.port {
        SerialPort::Primary => {
            let command_pins = (pins.usart1.tx, pins.usart1.rx);
            let serial = Serial::new(dp.USART1, command_pins, &clocks, command_cfg);
            let (tx, rx) = serial.split();
            (CommandRx::Primary(rx), CommandTx::Primary(tx))
        }
        SerialPort::Secondary => {
            let debug_cfg = Config {
                baud_rate: DEBUG_BAUD.bps(),
                ..Default::default()
            };
            let debug_pins = (pins.usart1.tx, pins.usart1.rx);
            let debug = Serial::new(dp.USART1, debug_pins, &clocks, debug_cfg);
            let (debug_tx, _debug_rx) = debug.split();
            usart::init_logger(Usart::new(debug_tx), LevelFilter::Info);

            let command_pins = (pins.usart2.tx, pins.usart2.rx);
            let serial = Serial::new(dp.USART2, command_pins, &clocks, command_cfg);
            let (tx, rx) = serial.split();
            (CommandRx::Secondary(rx), CommandTx::Secondary(tx))
        }
    };

    // Motors (TIM4 PWM, 20 kHz)
    let (pwm_left, pwm_right) = dp
        .TIM4
        .pwm_hz(
            (Channel1::new(pins.pwm.left), Channel2::new(pins.pwm.right)),
            20.kHz(),
            &clocks,
        )
        .split();
    let motors = MotorPair {
        left: Motor::new(pins.left.in1, pins.left.in2, pwm_left),
        right: Motor::new(pins.right.in1, pins.right.in2, pwm_right),
    };

    // Current limit
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (pins.i2c1.scl, pins.i2c1.sda),
        Mode::standard(100.kHz()),
        &clocks,
        &mut rcc.apb1,
        10_000,
    );
    if let Err(e) = Mcp4017::new(i2c).set_current_limit(CURRENT_LIMIT_STEPS) {
        warn!("current limit not set: {}", e);
    }

    // Fail-safe: red/yellow against green/blue
    let delay = Delay::new(cp.SYST, clocks.sysclk().raw());
    let failsafe = FailSafe::new(
        (Led::active_low(pins.leds.red), Led::active_low(pins.leds.yellow)),
        (Led::active_low(pins.leds.green), Led::active_low(pins.leds.blue)),
        delay,
        DeepSleep::new(cp.SCB),
        config.alert,
    );

    let monitor = BatteryMonitor::new(Adc::adc1(dp.ADC1).channel(VBATT_CHANNEL), config.health);
    let watchdog = Iwdg::start(dp.IWDG, WATCHDOG_TIMEOUT_MS);

    let mut supervisor = Supervisor::new(
        Telecom::new(rx, tx, motors),
        watchdog,
        monitor,
        failsafe,
        config,
    );
    if supervisor.install_commands(&COMMANDS).is_err() {
        warn!("running with built-in commands only");
    }

    let dbgmcu = dp.DBGMCU;
    supervisor.run(move || {
        // Keep the IWDG from resetting the core while halted in a debugger
        dbgmcu.apb1_fz.modify(|_, w| w.dbg_iwdg_stop().set_bit());
        info!("supervisor running on {:?} port", transport_cfg.port);
    })
}
