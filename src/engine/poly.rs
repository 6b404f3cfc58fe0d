use rtrb::Consumer;

use crate::{
    engine::{
        fx::{FeedbackDelay, Reverb},
        message::{MessageReceiver, SynthMessage},
        voice::{Voice, VoiceState},
        MAX_VOICES,
    },
    MAX_BLOCK_SIZE,
};

/// The audio-thread half of the instrument: a fixed voice pool fed from the
/// ring buffer, mixed to mono, scaled by master volume, and run through the
/// delay and reverb sends.
pub struct PolySynth {
    voices: Vec<Voice>,
    rx: Consumer<SynthMessage>,
    temp_buffer: Vec<f32>,
    frame_counter: u64,
    volume: f32,
    delay: FeedbackDelay,
    reverb: Reverb,
}

impl PolySynth {
    pub fn new(sample_rate: f32, rx: Consumer<SynthMessage>) -> Self {
        Self {
            voices: (0..MAX_VOICES).map(|_| Voice::new(sample_rate)).collect(),
            rx,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
            volume: 0.7,
            delay: FeedbackDelay::new(sample_rate, 0.28, 0.45),
            reverb: Reverb::new(sample_rate),
        }
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        // Drain control messages first so a note landing at the block edge
        // still sounds in this block
        while let Some(msg) = MessageReceiver::pop(&mut self.rx) {
            self.handle(msg);
        }

        out.fill(0.0);
        for voice in &mut self.voices {
            if voice.is_active() {
                self.temp_buffer[..out.len()].fill(0.0);
                voice.render(&mut self.temp_buffer[..out.len()]);
                for (o, v) in out.iter_mut().zip(&self.temp_buffer) {
                    *o += v;
                }
            }
        }

        for sample in out.iter_mut() {
            *sample *= self.volume;
        }

        self.delay.process(out);
        self.reverb.process(out);

        self.frame_counter += out.len() as u64;
    }

    fn handle(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn {
                note,
                velocity,
                duration_ms,
            } => {
                let age = self.frame_counter;
                if let Some(voice) = self.allocate_voice() {
                    voice.start(note, velocity, duration_ms, age);
                }
                // No free voice and nothing releasing: drop the note
            }
            SynthMessage::AllNotesOff => {
                for voice in &mut self.voices {
                    if voice.is_active() {
                        voice.release();
                    }
                }
            }
            SynthMessage::SetVolume(v) => self.volume = v.clamp(0.0, 1.0),
            SynthMessage::SetDelayMix(m) => self.delay.set_mix(m),
            SynthMessage::SetReverbMix(m) => self.reverb.set_mix(m),
        }
    }

    fn allocate_voice(&mut self) -> Option<&mut Voice> {
        // First pass: a free voice
        if let Some(idx) = self.voices.iter().position(|v| v.is_free()) {
            return Some(&mut self.voices[idx]);
        }

        // Second pass: steal the oldest releasing voice
        let steal_idx = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx);

        steal_idx.map(|idx| &mut self.voices[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    const SR: f32 = 48_000.0;

    fn synth_with_messages(msgs: &[SynthMessage]) -> PolySynth {
        let (mut tx, rx) = RingBuffer::new(64);
        for &msg in msgs {
            tx.push(msg).unwrap();
        }
        PolySynth::new(SR, rx)
    }

    fn note_on(note: u8) -> SynthMessage {
        SynthMessage::NoteOn {
            note,
            velocity: 0.8,
            duration_ms: 200,
        }
    }

    #[test]
    fn renders_queued_notes() {
        let mut synth = synth_with_messages(&[note_on(60), note_on(64), note_on(67)]);
        let mut block = vec![0.0f32; 512];
        synth.render_block(&mut block);
        assert!(block.iter().any(|&s| s.abs() > 0.0));
        assert!(block.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn volume_zero_silences_output() {
        let mut synth = synth_with_messages(&[SynthMessage::SetVolume(0.0), note_on(60)]);
        let mut block = vec![0.0f32; 512];
        synth.render_block(&mut block);
        assert!(block.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn voice_pool_overflow_drops_rather_than_cuts() {
        // MAX_VOICES + 4 notes, none releasing yet: extras are dropped
        let msgs: Vec<_> = (0..(MAX_VOICES + 4) as u8).map(|i| note_on(48 + i)).collect();
        let mut synth = synth_with_messages(&msgs);
        let mut block = vec![0.0f32; 256];
        synth.render_block(&mut block);
        let active = synth.voices.iter().filter(|v| v.is_active()).count();
        assert_eq!(active, MAX_VOICES);
    }

    #[test]
    fn allocation_steals_oldest_releasing_voice() {
        let (mut tx, rx) = RingBuffer::new(64);
        let mut synth = PolySynth::new(SR, rx);

        // Fill the pool with very short notes, render past their duration
        for i in 0..MAX_VOICES as u8 {
            tx.push(SynthMessage::NoteOn {
                note: 48 + i,
                velocity: 0.5,
                duration_ms: 1,
            })
            .unwrap();
        }
        let mut block = vec![0.0f32; 512];
        synth.render_block(&mut block);
        assert!(synth
            .voices
            .iter()
            .all(|v| v.state() == VoiceState::Releasing));

        // All voices are releasing; a new note steals the oldest (age 0)
        tx.push(note_on(72)).unwrap();
        synth.render_block(&mut block);
        assert!(synth.voices.iter().any(|v| v.note() == 72));
        assert_eq!(synth.voices.iter().filter(|v| v.note() == 72).count(), 1);
    }

    #[test]
    fn all_notes_off_releases_everything() {
        let mut synth = synth_with_messages(&[note_on(60), note_on(64)]);
        let mut block = vec![0.0f32; 64];
        synth.render_block(&mut block);

        // Push the kill switch through the same queue
        let (mut tx, rx) = RingBuffer::new(4);
        tx.push(SynthMessage::AllNotesOff).unwrap();
        synth.rx = rx;
        synth.render_block(&mut block);
        assert!(synth
            .voices
            .iter()
            .all(|v| v.state() != VoiceState::Active));
    }
}
