use std::sync::Arc;

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

// A sample playing back at a rate, pinned to absolute frames on the output
// timeline. Before `start_frame` it's silent, at `stop_frame` (or the end of
// the buffer) it's done.
#[derive(Clone, Debug)]
pub struct Voice {
    sample: Arc<SampleBuffer>,
    pos: f64,
    rate: f64,
    gain: f32,
    start_frame: u64,
    stop_frame: Option<u64>,
    active: bool,
}

impl Voice {
    pub fn new(
        sample: Arc<SampleBuffer>,
        rate: f64,
        gain: f32,
        start_frame: u64,
        stop_frame: Option<u64>,
    ) -> Self {
        Self {
            sample,
            pos: 0.0,
            rate,
            gain,
            start_frame,
            stop_frame,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // Mix this voice into `out`, whose first frame sits at `block_start` on the timeline
    pub fn render_into(&mut self, out: &mut [StereoFrame], block_start: u64) {
        if !self.active {
            return;
        }
        let block_end = block_start + out.len() as u64;
        if self.start_frame >= block_end {
            return; // not our turn yet
        }

        let data = &self.sample.data;
        let len = data.len();
        let skip = self.start_frame.saturating_sub(block_start) as usize;

        for (i, frame) in out.iter_mut().enumerate().skip(skip) {
            let now = block_start + i as u64;
            if self.stop_frame.is_some_and(|stop| now >= stop) {
                self.active = false;
                break;
            }

            let idx = self.pos as usize;
            if idx >= len {
                self.active = false;
                break;
            }
            let frac = (self.pos - idx as f64) as f32;
            let s0 = data[idx];
            let s1 = data.get(idx + 1).copied().unwrap_or(s0);

            frame.left += lerp(s0.left, s1.left, frac) * self.gain;
            frame.right += lerp(s0.right, s1.right, frac) * self.gain;

            self.pos += self.rate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Arc<SampleBuffer> {
        let data = (0..len)
            .map(|i| StereoFrame { left: i as f32, right: i as f32 })
            .collect();
        Arc::new(SampleBuffer { data, sample_rate: 100 })
    }

    #[test]
    fn waits_for_start_frame() {
        let mut voice = Voice::new(ramp(8), 1.0, 1.0, 6, None);
        let mut block = [StereoFrame::zero(); 4];
        voice.render_into(&mut block, 0);
        assert!(block.iter().all(|f| f.left == 0.0));

        let mut block = [StereoFrame::zero(); 4];
        voice.render_into(&mut block, 4);
        assert_eq!(block.iter().map(|f| f.left).collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rate_two_skips_every_other_frame() {
        let mut voice = Voice::new(ramp(8), 2.0, 1.0, 0, None);
        let mut block = [StereoFrame::zero(); 6];
        voice.render_into(&mut block, 0);
        let lefts: Vec<f32> = block.iter().map(|f| f.left).collect();
        assert_eq!(lefts, vec![0.0, 2.0, 4.0, 6.0, 0.0, 0.0]);
        assert!(!voice.is_active());
    }

    #[test]
    fn half_rate_interpolates() {
        let mut voice = Voice::new(ramp(4), 0.5, 1.0, 0, None);
        let mut block = [StereoFrame::zero(); 3];
        voice.render_into(&mut block, 0);
        assert_eq!(block.iter().map(|f| f.left).collect::<Vec<_>>(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn stop_frame_cuts_the_tail() {
        let mut voice = Voice::new(ramp(100), 1.0, 1.0, 2, Some(5));
        let mut block = [StereoFrame::zero(); 8];
        voice.render_into(&mut block, 0);
        let lefts: Vec<f32> = block.iter().map(|f| f.left).collect();
        assert_eq!(lefts, vec![0.0, 0.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0]);
        assert!(!voice.is_active());
    }
}
