//! Control-thread to audio-thread messages.
//!
//! Parameter values travel through the atomic store; this channel only
//! carries one-shot events that must not be missed, such as "a preset was
//! just loaded, snap the ramps". It is an `rtrb` single-producer
//! single-consumer ring, so pushing and popping never lock or allocate.

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    /// Jump every ramp straight to the current parameter values.
    Reseed,
    /// Reseed, and also rewind LFO phase and the synthesized transport position.
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}

/// Receiver for hosts that never send control messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMessages;

impl MessageReceiver for NoMessages {
    fn pop(&mut self) -> Option<ControlMessage> {
        None
    }
}

/// Create a bounded control channel.
#[cfg(feature = "rtrb")]
pub fn control_channel(capacity: usize) -> (Producer<ControlMessage>, Consumer<ControlMessage>) {
    RingBuffer::new(capacity)
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;

    #[test]
    fn messages_arrive_in_order() {
        let (mut tx, mut rx) = control_channel(4);
        tx.push(ControlMessage::Reseed).unwrap();
        tx.push(ControlMessage::Reset).unwrap();

        assert_eq!(MessageReceiver::pop(&mut rx), Some(ControlMessage::Reseed));
        assert_eq!(MessageReceiver::pop(&mut rx), Some(ControlMessage::Reset));
        assert_eq!(MessageReceiver::pop(&mut rx), None);
    }

    #[test]
    fn full_channel_rejects_push() {
        let (mut tx, _rx) = control_channel(1);
        tx.push(ControlMessage::Reseed).unwrap();
        assert!(tx.push(ControlMessage::Reseed).is_err());
    }
}
