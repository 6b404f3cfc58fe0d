//! Delay and reverb sends for the master bus.
//!
//! Both are deliberately small: a single feedback delay line and a
//! two-comb-plus-allpass reverb. The instrument layers short plucky notes,
//! so a modest tail is all the ambience it needs. Wet mixes are settable at
//! runtime from the settings path.

/// Feedback delay line with a dry/wet mix.
pub struct FeedbackDelay {
    buffer: Vec<f32>,
    position: usize,
    feedback: f32,
    mix: f32,
}

impl FeedbackDelay {
    pub fn new(sample_rate: f32, time_seconds: f32, feedback: f32) -> Self {
        let frames = ((time_seconds * sample_rate) as usize).max(1);
        Self {
            buffer: vec![0.0; frames],
            position: 0,
            feedback,
            mix: 0.0,
        }
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    pub fn process(&mut self, block: &mut [f32]) {
        if self.mix == 0.0 {
            // Keep the line running so enabling the mix later has a tail
            for &sample in block.iter() {
                let delayed = self.buffer[self.position];
                self.buffer[self.position] = sample + delayed * self.feedback;
                self.position = (self.position + 1) % self.buffer.len();
            }
            return;
        }

        for sample in block.iter_mut() {
            let delayed = self.buffer[self.position];
            self.buffer[self.position] = *sample + delayed * self.feedback;
            self.position = (self.position + 1) % self.buffer.len();
            *sample += delayed * self.mix;
        }
    }
}

/// Parallel comb filter with damping, the reverb building block.
struct Comb {
    buffer: Vec<f32>,
    position: usize,
    feedback: f32,
    filter_state: f32,
}

impl Comb {
    fn new(frames: usize, feedback: f32) -> Self {
        Self {
            buffer: vec![0.0; frames.max(1)],
            position: 0,
            feedback,
            filter_state: 0.0,
        }
    }

    fn tick(&mut self, input: f32) -> f32 {
        let out = self.buffer[self.position];
        // One-pole lowpass in the loop darkens the tail like air does
        self.filter_state = out * 0.6 + self.filter_state * 0.4;
        self.buffer[self.position] = input + self.filter_state * self.feedback;
        self.position = (self.position + 1) % self.buffer.len();
        out
    }
}

/// Series allpass to diffuse the comb output.
struct Allpass {
    buffer: Vec<f32>,
    position: usize,
}

impl Allpass {
    const GAIN: f32 = 0.5;

    fn new(frames: usize) -> Self {
        Self {
            buffer: vec![0.0; frames.max(1)],
            position: 0,
        }
    }

    fn tick(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.position];
        let out = delayed - input * Self::GAIN;
        self.buffer[self.position] = input + delayed * Self::GAIN;
        self.position = (self.position + 1) % self.buffer.len();
        out
    }
}

/// Schroeder-style reverb: two combs in parallel into one allpass.
pub struct Reverb {
    combs: [Comb; 2],
    allpass: Allpass,
    mix: f32,
}

impl Reverb {
    pub fn new(sample_rate: f32) -> Self {
        // Tunings are in samples at 44.1k, scaled to the actual rate
        let scale = sample_rate / 44_100.0;
        let frames = |n: f32| (n * scale) as usize;
        Self {
            combs: [
                Comb::new(frames(1557.0), 0.77),
                Comb::new(frames(1801.0), 0.75),
            ],
            allpass: Allpass::new(frames(225.0)),
            mix: 0.0,
        }
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    pub fn process(&mut self, block: &mut [f32]) {
        if self.mix == 0.0 {
            return;
        }
        for sample in block.iter_mut() {
            let dry = *sample;
            let combed: f32 = self.combs.iter_mut().map(|c| c.tick(dry)).sum();
            let wet = self.allpass.tick(combed * 0.5);
            *sample = dry + wet * self.mix;
        }
    }
}

// TODO: ramp mix changes over a few ms to avoid zipper noise when the
// settings sliders move while notes are sounding.

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    fn impulse(len: usize) -> Vec<f32> {
        let mut block = vec![0.0; len];
        block[0] = 1.0;
        block
    }

    #[test]
    fn dry_delay_passes_signal_through() {
        let mut delay = FeedbackDelay::new(SR, 0.05, 0.4);
        let mut block = impulse(64);
        delay.process(&mut block);
        assert_eq!(block[0], 1.0);
        assert!(block[1..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn wet_delay_produces_an_echo() {
        let mut delay = FeedbackDelay::new(SR, 0.001, 0.0); // 48-frame delay
        delay.set_mix(1.0);
        let mut block = impulse(128);
        delay.process(&mut block);
        assert_eq!(block[0], 1.0);
        assert!(block[48] > 0.5);
    }

    #[test]
    fn reverb_tail_decays() {
        let mut reverb = Reverb::new(SR);
        reverb.set_mix(1.0);

        let mut block = impulse(4096);
        reverb.process(&mut block);
        assert!(block[1..].iter().any(|&s| s.abs() > 0.0), "no tail at all");

        // Drain successive silent blocks; the tail must die away
        let mut energies = Vec::new();
        for _ in 0..20 {
            let mut tail = vec![0.0; 4096];
            reverb.process(&mut tail);
            energies.push(tail.iter().map(|s| s.abs()).sum::<f32>());
        }
        assert!(energies[19] < energies[0] * 0.1, "tail did not decay");
        assert!(energies.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn mixes_are_clamped() {
        let mut reverb = Reverb::new(SR);
        reverb.set_mix(7.0);
        let mut block = impulse(64);
        // Would blow up unclamped; just has to stay finite and bounded-ish
        reverb.process(&mut block);
        assert!(block.iter().all(|s| s.is_finite()));
    }
}
