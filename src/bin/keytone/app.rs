//! Keytone - application wiring and the main event loop
//!
//! One thread handles input, visuals and scheduling; the cpal callback
//! renders whatever messages have crossed the ring buffer. Musical state
//! never leaves this thread.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::ThreadRng;
use ratatui::DefaultTerminal;
use rtrb::{Producer, RingBuffer};

use keytone::engine::poly::PolySynth;
use keytone::engine::{NoteScheduler, SynthMessage};
use keytone::mapper::performer::{Performer, PlannedNote};
use keytone::settings::Settings;
use keytone::theory::Scale;
use keytone::MAX_BLOCK_SIZE;

use crate::ui::{self, ripple::RippleField};

/// UI → audio message queue capacity. Generous for even frantic typing.
const MESSAGE_QUEUE: usize = 256;

/// Main application builder
pub struct Keytone {
    settings_path: Option<PathBuf>,
}

impl Keytone {
    pub fn new() -> Self {
        Self {
            settings_path: None,
        }
    }

    /// Read settings from this TOML file if it exists.
    pub fn settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Run the application (takes over the terminal, plays audio).
    pub fn run(self) -> EyreResult<()> {
        let settings = self.load_settings();
        let scale = Scale::from_name(&settings.scale).unwrap_or(Scale::Major);

        let mut app = App {
            performer: Performer::new(scale, rand::thread_rng()),
            settings,
            scheduler: NoteScheduler::new(),
            producer: None,
            audio: None,
            ripples: RippleField::new(),
            should_quit: false,
        };

        // Best effort: a missing audio device is not fatal, notes are
        // dropped until a later key press brings the engine up
        app.ensure_audio();

        let mut terminal = ratatui::init();
        let result = app.run(&mut terminal);
        ratatui::restore();
        result
    }

    fn load_settings(&self) -> Settings {
        let Some(path) = &self.settings_path else {
            return Settings::default();
        };
        if !path.exists() {
            return Settings::default();
        }
        match Settings::load(path) {
            Ok(settings) => settings.clamped(),
            Err(err) => {
                log::warn!("{err}; using defaults");
                Settings::default()
            }
        }
    }
}

impl Default for Keytone {
    fn default() -> Self {
        Self::new()
    }
}

/// A running audio stream. Dropping it stops playback.
struct AudioEngine {
    _stream: cpal::Stream,
    sample_rate: f32,
}

struct App {
    performer: Performer<ThreadRng>,
    settings: Settings,
    scheduler: NoteScheduler,
    producer: Option<Producer<SynthMessage>>,
    audio: Option<AudioEngine>,
    ripples: RippleField,
    should_quit: bool,
}

impl App {
    fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let now = Instant::now();

            // Delayed harmony notes that have come due
            for msg in self.scheduler.drain_due(now) {
                self.send(msg);
            }

            self.ripples.advance(now);

            let view = ui::View {
                settings: &self.settings,
                context: self.performer.context(),
                ripples: &self.ripples,
                audio_live: self.audio.is_some(),
                sample_rate: self.audio.as_ref().map(|a| a.sample_rate),
            };
            terminal.draw(|frame| ui::render(frame, &view))?;

            // ~60fps input poll
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, Instant::now());
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.cycle_scale(),
            KeyCode::Up => self.performer.context_mut().shift_octave(1),
            KeyCode::Down => self.performer.context_mut().shift_octave(-1),
            KeyCode::PageUp => self.nudge_volume(0.05),
            KeyCode::PageDown => self.nudge_volume(-0.05),
            KeyCode::Char(c) if !c.is_control() => self.play_key(c, now),
            _ => {}
        }
    }

    /// The whole instrument: one key press becomes a primary note, maybe
    /// harmony, maybe a background chord, and a ripple.
    fn play_key(&mut self, c: char, now: Instant) {
        let out = self.performer.key_press(c, now);
        self.ripples.spawn(&out.visual, out.primary.note, now);

        if self.audio.is_none() {
            // The engine was down when this request arrived: bring it up
            // for the next press and drop this note, no retry
            self.ensure_audio();
            log::warn!("audio engine was not ready, dropping {}", out.primary.note);
            return;
        }

        self.send(note_on(&out.primary));
        for planned in &out.harmony {
            self.scheduler.push_after(now, planned.delay, note_on(planned));
        }
        if let Some(chord) = &out.chord {
            for &note in &chord.notes {
                self.send(SynthMessage::NoteOn {
                    note: note.midi(),
                    velocity: chord.velocity,
                    duration_ms: chord.duration.as_millis() as u32,
                });
            }
        }
    }

    fn cycle_scale(&mut self) {
        let current = self.performer.context().scale;
        let index = Scale::ALL.iter().position(|&s| s == current).unwrap_or(0);
        let next = Scale::ALL[(index + 1) % Scale::ALL.len()];
        self.settings.scale = next.name().to_string();
        self.apply_settings();
    }

    fn nudge_volume(&mut self, delta: f32) {
        self.settings.volume = (self.settings.volume + delta).clamp(0.0, 1.0);
        self.apply_settings();
    }

    /// Run any settings change through the performer (which may shuffle the
    /// progression) and forward the mix values to the engine.
    fn apply_settings(&mut self) {
        self.performer.apply_settings(&self.settings);
        self.push_engine_settings();
    }

    fn push_engine_settings(&mut self) {
        let clamped = self.settings.clamped();
        self.send(SynthMessage::SetVolume(clamped.volume));
        self.send(SynthMessage::SetDelayMix(clamped.delay));
        self.send(SynthMessage::SetReverbMix(clamped.reverb));
    }

    /// Lazily (re)start the audio stream. A failed attempt leaves the app
    /// silent but fully interactive, and the next key press tries again.
    fn ensure_audio(&mut self) -> bool {
        if self.audio.is_some() {
            return true;
        }

        // The old consumer died with the failed stream; start a fresh pair
        let (producer, consumer) = RingBuffer::new(MESSAGE_QUEUE);
        match start_audio(consumer) {
            Ok(engine) => {
                self.producer = Some(producer);
                self.audio = Some(engine);
                self.push_engine_settings();
                true
            }
            Err(err) => {
                log::warn!("audio init failed: {err}");
                self.producer = None;
                false
            }
        }
    }

    fn send(&mut self, msg: SynthMessage) {
        if let Some(producer) = &mut self.producer {
            if producer.push(msg).is_err() {
                log::warn!("synth queue full, dropping message");
            }
        }
    }
}

fn note_on(planned: &PlannedNote) -> SynthMessage {
    SynthMessage::NoteOn {
        note: planned.note.midi(),
        velocity: planned.velocity,
        duration_ms: planned.duration.as_millis() as u32,
    }
}

fn start_audio(consumer: rtrb::Consumer<SynthMessage>) -> EyreResult<AudioEngine> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let mut synth = PolySynth::new(sample_rate, consumer);
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let block = &mut render_buf[..frames];
                synth.render_block(block);

                // Mono to all channels
                let out_off = frames_written * channels;
                for (i, &sample) in block.iter().enumerate() {
                    for ch in 0..channels {
                        data[out_off + i * channels + ch] = sample;
                    }
                }

                frames_written += frames;
            }
        },
        |err| log::error!("audio stream error: {err}"),
        None,
    )?;

    stream.play()?;

    Ok(AudioEngine {
        _stream: stream,
        sample_rate,
    })
}
