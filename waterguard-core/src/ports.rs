//! Collaborator interfaces
//!
//! The pipeline never touches hardware. It pulls samples through
//! [`Acquisition`], pushes notifications through [`Transport`] and reads
//! the clock through [`TimeSource`]; board support code implements them.
//! Keep implementations thin - converting and formatting belong to this
//! crate, not to the adapters.

use heapless::Vec;

use crate::errors::{AcquisitionError, TransportError};
use crate::peer::PeerId;
use crate::slot::SensorSlot;

pub use crate::time::TimeSource;

/// Bytes kept from one pH serial read.
///
/// Wider than the pH field so an over-long line is detected, not cut.
pub const PH_LINE_CAPACITY: usize = 16;

/// One line read from the pH probe's serial output
pub type PhLine = Vec<u8, PH_LINE_CAPACITY>;

/// Sample delivered once per cycle per slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSample {
    /// 12-bit code from the sensor controller's ADC
    Adc(u16),
    /// Newline-terminated text from the pH probe
    Line(PhLine),
}

impl RawSample {
    /// Build a line sample, keeping at most [`PH_LINE_CAPACITY`] bytes
    pub fn line(bytes: &[u8]) -> Self {
        let keep = bytes.len().min(PH_LINE_CAPACITY);
        let mut line = PhLine::new();
        // `keep` never exceeds the capacity
        let _ = line.extend_from_slice(&bytes[..keep]);
        RawSample::Line(line)
    }
}

/// Source of raw sensor samples
///
/// `read_raw` may block up to the hardware timeout of the channel (the pH
/// serial read is the slow one). It is the only blocking call in a cycle.
///
/// # Example Implementation
///
/// ```ignore
/// impl Acquisition for SensorController {
///     fn read_raw(&mut self, slot: SensorSlot) -> Result<RawSample, AcquisitionError> {
///         match slot {
///             SensorSlot::Ph => {
///                 // Room for more than the field so a long line is rejected later
///                 let mut buf = [0u8; PH_LINE_CAPACITY];
///                 let n = self.uart.read_line(&mut buf, PH_READ_TIMEOUT_MS)?;
///                 Ok(RawSample::line(&buf[..n]))
///             }
///             analog => Ok(RawSample::Adc(self.scif.output(analog.index()))),
///         }
///     }
/// }
/// ```
pub trait Acquisition {
    /// Read this cycle's sample for one slot
    fn read_raw(&mut self, slot: SensorSlot) -> Result<RawSample, AcquisitionError>;
}

impl<A: Acquisition + ?Sized> Acquisition for &mut A {
    fn read_raw(&mut self, slot: SensorSlot) -> Result<RawSample, AcquisitionError> {
        (**self).read_raw(slot)
    }
}

/// Radio side of notification delivery
///
/// `notify` hands one value to the stack for one peer and returns
/// immediately; it must not queue or retry on failure.
pub trait Transport {
    /// Push a characteristic value to a subscribed peer
    fn notify(
        &mut self,
        peer: PeerId,
        slot: SensorSlot,
        value: &[u8],
    ) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn notify(
        &mut self,
        peer: PeerId,
        slot: SensorSlot,
        value: &[u8],
    ) -> Result<(), TransportError> {
        (**self).notify(peer, slot, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_sample_keeps_capacity() {
        let long = [b'7'; 40];
        match RawSample::line(&long) {
            RawSample::Line(line) => assert_eq!(line.len(), PH_LINE_CAPACITY),
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn line_sample_copies_bytes() {
        assert_eq!(
            RawSample::line(b"7.01\n"),
            RawSample::Line(PhLine::from_slice(b"7.01\n").unwrap())
        );
    }
}
