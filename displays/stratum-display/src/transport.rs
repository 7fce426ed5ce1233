//! Outgoing byte stream to the display controller

use heapless::{Deque, Vec};
use stratum_protocol::frame::{FRAME_HEADER, MAX_FRAME_SIZE};

/// Sink for encoded frames
///
/// Sends are fire-and-forget: the caller never learns whether the bytes made
/// it out. An implementation that can fail logs and drops.
pub trait Transport {
    /// Queue one complete frame for sending
    fn send_bytes(&mut self, bytes: &[u8]);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send_bytes(&mut self, bytes: &[u8]) {
        (**self).send_bytes(bytes)
    }
}

/// One recorded frame
pub type CapturedFrame = Vec<u8, MAX_FRAME_SIZE>;

/// Transport that records frames instead of sending them
///
/// Keeps the most recent `N` frames; older ones are dropped but still
/// counted.
#[derive(Debug, Default)]
pub struct CaptureTransport<const N: usize = 256> {
    frames: Deque<CapturedFrame, N>,
    total: usize,
}

impl<const N: usize> CaptureTransport<N> {
    pub fn new() -> Self {
        Self {
            frames: Deque::new(),
            total: 0,
        }
    }

    /// Frames sent since creation or the last [`clear`](Self::clear)
    pub fn total(&self) -> usize {
        self.total
    }

    /// Retained frames, oldest first
    pub fn frames(&self) -> impl Iterator<Item = &CapturedFrame> {
        self.frames.iter()
    }

    /// Most recent frame
    pub fn last(&self) -> Option<&CapturedFrame> {
        self.frames.back()
    }

    /// Command bytes of the retained frames, oldest first
    pub fn commands(&self) -> impl Iterator<Item = u8> + '_ {
        self.frames
            .iter()
            .filter(|f| f.first() == Some(&FRAME_HEADER))
            .filter_map(|f| f.get(1).copied())
    }

    /// Number of retained frames carrying `command`
    pub fn count_command(&self, command: u8) -> usize {
        self.commands().filter(|&c| c == command).count()
    }

    /// True if any retained string frame contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.strings().any(|text| {
            let needle = needle.as_bytes();
            needle.is_empty() || text.windows(needle.len()).any(|w| w == needle)
        })
    }

    /// Text payloads of the retained string frames, oldest first
    pub fn strings(&self) -> impl Iterator<Item = &[u8]> + '_ {
        // header, cmd, flags, color, bg color, x, y
        const TEXT_OFFSET: usize = 11;
        const TAIL_LEN: usize = 4;
        self.frames
            .iter()
            .filter(|f| f.get(1) == Some(&stratum_protocol::command::CMD_DRAW_STRING))
            .filter_map(|f| f.get(TEXT_OFFSET..f.len().saturating_sub(TAIL_LEN)))
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.total = 0;
    }
}

impl<const N: usize> Transport for CaptureTransport<N> {
    fn send_bytes(&mut self, bytes: &[u8]) {
        let mut frame = CapturedFrame::new();
        if frame.extend_from_slice(bytes).is_err() {
            return;
        }
        if self.frames.is_full() {
            self.frames.pop_front();
        }
        let _ = self.frames.push_back(frame);
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_protocol::Command;

    fn send(transport: &mut impl Transport, command: Command<'_>) {
        let frame = command.encode_to_vec().unwrap();
        transport.send_bytes(&frame);
    }

    #[test]
    fn test_capture_records_frames() {
        let mut capture: CaptureTransport<8> = CaptureTransport::new();
        send(&mut capture, Command::Handshake);
        send(&mut capture, Command::UpdateLcd);
        assert_eq!(capture.total(), 2);
        assert_eq!(capture.commands().collect::<Vec<u8, 4>>().as_slice(), &[0x00, 0x3D]);
    }

    #[test]
    fn test_capture_drops_oldest() {
        let mut capture: CaptureTransport<2> = CaptureTransport::new();
        send(&mut capture, Command::Handshake);
        send(&mut capture, Command::FrameClear { color: 0 });
        send(&mut capture, Command::UpdateLcd);
        assert_eq!(capture.total(), 3);
        assert_eq!(capture.frames().count(), 2);
        assert_eq!(capture.count_command(0x00), 0);
        assert_eq!(capture.last().map(|f| f[1]), Some(0x3D));
    }

    #[test]
    fn test_capture_text_search() {
        let mut capture: CaptureTransport<4> = CaptureTransport::new();
        send(
            &mut capture,
            Command::DrawString {
                width_adjust: false,
                show_background: false,
                font: stratum_protocol::Font::MENU,
                color: 0xFFFF,
                background: 0,
                x: 0,
                y: 0,
                text: "Prepare",
                limit: u16::MAX,
            },
        );
        assert!(capture.contains_text("Prep"));
        assert!(!capture.contains_text("Control"));
    }

    #[test]
    fn test_mut_ref_is_transport() {
        let mut capture: CaptureTransport<4> = CaptureTransport::new();
        {
            let mut by_ref = &mut capture;
            send(&mut by_ref, Command::UpdateLcd);
        }
        assert_eq!(capture.total(), 1);
    }
}
