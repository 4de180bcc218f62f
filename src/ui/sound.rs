/// Sound engine: procedural sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_step: Arc<Vec<u8>>,
        sfx_push: Arc<Vec<u8>>,
        sfx_unlock: Arc<Vec<u8>>,
        sfx_land: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_step: Arc::new(make_wav(&gen_blip(220.0, 0.02, 0.12))),
                sfx_push: Arc::new(make_wav(&gen_scrape())),
                sfx_unlock: Arc::new(make_wav(&gen_chime())),
                sfx_land: Arc::new(make_wav(&gen_thud())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_step(&self) { self.play(&self.sfx_step); }
        pub fn play_push(&self) { self.play(&self.sfx_push); }
        pub fn play_unlock(&self) { self.play(&self.sfx_unlock); }
        pub fn play_land(&self) { self.play(&self.sfx_land); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    /// Push: low noisy scrape
    fn gen_scrape() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.1) as usize;
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * 120.0 * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (tone * 0.5 + noise * 0.5) * (1.0 - t) * 0.25
            })
            .collect()
    }

    /// Unlock: ascending arpeggio C6→E6→G6
    fn gen_chime() -> Vec<f32> {
        let notes = [1047.0_f32, 1319.0, 1568.0];
        let n = (SAMPLE_RATE as f32 * 0.06) as usize;
        let mut samples = Vec::with_capacity(n * notes.len());
        for &freq in &notes {
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// Landing: short descending thump 180Hz → 60Hz
    fn gen_thud() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.08) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 180.0 - t * 120.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                (ti * freq * TAU).sin() * (1.0 - t).powf(1.5) * 0.35
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_step(&self) {}
    pub fn play_push(&self) {}
    pub fn play_unlock(&self) {}
    pub fn play_land(&self) {}
}

impl SoundEngine {
    /// Play at most one effect for a step's events, the most notable one.
    pub fn play_events(&self, events: &[GameEvent]) {
        match loudest(events) {
            Some(GameEvent::Unlocked { .. }) => self.play_unlock(),
            Some(GameEvent::Pushed { .. }) => self.play_push(),
            Some(GameEvent::Landed { .. }) => self.play_land(),
            Some(GameEvent::PlayerMoved { .. }) => self.play_step(),
            None => {}
        }
    }
}

fn loudest(events: &[GameEvent]) -> Option<GameEvent> {
    fn rank(e: &GameEvent) -> u8 {
        match e {
            GameEvent::Unlocked { .. } => 3,
            GameEvent::Pushed { .. } => 2,
            GameEvent::Landed { .. } => 1,
            GameEvent::PlayerMoved { .. } => 0,
        }
    }
    events.iter().copied().max_by_key(rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_outranks_everything() {
        let events = [
            GameEvent::PlayerMoved { x: 1, y: 1 },
            GameEvent::Unlocked { id: 1, removed: 2 },
            GameEvent::Landed { x: 3, y: 3 },
        ];
        assert!(matches!(loudest(&events), Some(GameEvent::Unlocked { .. })));
        assert_eq!(loudest(&[]), None);
    }

    #[test]
    fn landing_beats_a_plain_step() {
        let events = [GameEvent::PlayerMoved { x: 1, y: 1 }, GameEvent::Landed { x: 2, y: 4 }];
        assert_eq!(loudest(&events), Some(GameEvent::Landed { x: 2, y: 4 }));
    }

    #[cfg(feature = "sound")]
    #[test]
    fn wav_header_is_well_formed() {
        let wav = inner::make_wav(&[0.0, 1.0, -1.0]);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + 6);
    }
}
