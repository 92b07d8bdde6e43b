//! Simulated Sample Cycle Example
//!
//! Runs the full pipeline on the host with a simulated probe and radio.
//!
//! ## What You'll Learn
//!
//! - Wiring a `Registry`, a `MessageQueue` and a `SampleCycleController`
//! - Driving cycles from an `Interval` the way the RTC alert would
//! - Enabling notifications through the client configuration attribute
//! - Reading cycle reports and running statistics
//!
//! ## Message Flow
//!
//! ```text
//! Interval ──SensorAlert──┐
//!                         ├──→ MessageQueue ──→ controller.poll() ──→ Radio::notify
//! Link layer ──Connected──┘
//! ```
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_sample_cycle
//! ```

use waterguard_core::{
    time::FixedTime, Acquisition, AcquisitionError, Attribute, Message, MessageQueue, PeerId,
    PollOutcome, RawSample, Registry, SampleCycleController, SensorSlot, ServiceConfig,
    SlotOutcome, TimeSource, Transport, TransportError,
};

static REGISTRY: Registry = Registry::new();
static QUEUE: MessageQueue<Message, 16> = MessageQueue::new();

/// Probe that drifts a little every cycle and drops one turbidity read
struct SimulatedProbe {
    cycle: u16,
}

impl Acquisition for SimulatedProbe {
    fn read_raw(&mut self, slot: SensorSlot) -> Result<RawSample, AcquisitionError> {
        let drift = self.cycle * 3;
        let sample = match slot {
            SensorSlot::Temperature => RawSample::Adc(230 + drift),
            SensorSlot::Pressure => RawSample::Adc(1013 - drift),
            SensorSlot::Flow => RawSample::Adc(800 + drift * 2),
            SensorSlot::Conductivity => RawSample::Adc(980 + drift * 5),
            SensorSlot::Turbidity if self.cycle == 2 => return Err(AcquisitionError::Timeout),
            SensorSlot::Turbidity => RawSample::Adc(820),
            SensorSlot::Ph => {
                self.cycle += 1;
                RawSample::line(b"7.02\r\n")
            }
        };
        Ok(sample)
    }
}

/// Radio that prints instead of transmitting
struct ConsoleRadio;

impl Transport for ConsoleRadio {
    fn notify(
        &mut self,
        peer: PeerId,
        slot: SensorSlot,
        value: &[u8],
    ) -> Result<(), TransportError> {
        println!(
            "    notify {} {:<12} {:?}",
            peer,
            slot.name(),
            String::from_utf8_lossy(value)
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("WaterGuard Sample Cycle Example");
    println!("===============================\n");

    let clock = FixedTime::new(0);
    let config = ServiceConfig::default();
    let mut controller =
        SampleCycleController::new(&REGISTRY, SimulatedProbe { cycle: 0 }, ConsoleRadio, config)?;
    let mut interval = controller.interval(clock.now());

    // A phone connects and enables two characteristics
    let phone = PeerId::new(0x0040)?;
    QUEUE.push(Message::PeerConnected(phone));
    nb::block!(controller.poll(&QUEUE))?;

    for slot in [SensorSlot::Temperature, SensorSlot::Conductivity] {
        let ccc = Attribute::ClientConfig(slot);
        REGISTRY.write_by_handle(phone, ccc.handle_offset(), 0, &[0x01, 0x00])?;
    }
    println!("{} subscribed to temperature and conductivity\n", phone);

    // Five seconds of simulated time in 100 ms steps
    for _ in 0..50 {
        clock.advance(100);
        if interval.poll_source(&clock) {
            QUEUE.push(Message::SensorAlert { timestamp: clock.now() });
        }

        while let Ok(outcome) = controller.poll(&QUEUE) {
            if let PollOutcome::Cycle(report) = outcome {
                println!("  cycle at {} ms", report.timestamp);
                for slot in SensorSlot::ALL {
                    if let SlotOutcome::Skipped(err) = report.outcome(slot) {
                        println!("    skipped {}: {}", slot, err);
                    }
                }
            }
        }
    }

    println!("\nCache after the last cycle:");
    for slot in SensorSlot::ALL {
        let value = REGISTRY.get(slot);
        println!(
            "  {:<12} 0x{:04X}  {:?} {}",
            slot.name(),
            slot.uuid(),
            value.as_str().unwrap_or("?"),
            slot.unit()
        );
    }

    let stats = controller.stats();
    println!("\nStatistics:");
    println!("  Cycles:                  {}", stats.cycles);
    println!("  Slots updated:           {}", stats.slots_updated);
    println!("  Slots skipped:           {}", stats.slots_skipped);
    println!("  Notifications delivered: {}", stats.notifications_delivered);
    let high_water = QUEUE.stats().max_depth.load(core::sync::atomic::Ordering::Relaxed);
    println!("  Queue high-water mark:   {}", high_water);

    Ok(())
}
