/// Sound engine: procedural effects via rodio.
///
/// Buffers are synthesized as in-memory WAV once at init; playback is
/// fire-and-forget on a detached Sink. Without the "sound" feature the
/// stub SoundEngine does nothing.

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_bump: Arc<Vec<u8>>,
        sfx_goal: Arc<Vec<u8>>,
        sfx_new_maze: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::info!("audio output unavailable: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_bump: Arc::new(make_wav(&gen_bump())),
                sfx_goal: Arc::new(make_wav(&gen_goal())),
                sfx_new_maze: Arc::new(make_wav(&gen_sweep(220.0, 660.0, 0.18))),
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

        pub fn play_bump(&self) { self.play(&self.sfx_bump); }
        pub fn play_goal(&self) { self.play(&self.sfx_goal); }
        pub fn play_new_maze(&self) { self.play(&self.sfx_new_maze); }
    }

    /// Wall bump: short low thud with a fast decay.
    fn gen_bump() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.06) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - i as f32 / n as f32).powi(3);
                (t * 90.0 * TAU).sin() * env * 0.35
            })
            .collect()
    }

    /// Goal reached: rising major arpeggio with a held top note.
    fn gen_goal() -> Vec<f32> {
        let notes = [(523.0_f32, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.35)];
        let mut samples = Vec::new();
        for &(freq, dur) in &notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.6;
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Linear frequency sweep with linear fade-out.
    fn gen_sweep(from: f32, to: f32, duration: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = from + (to - from) * p;
                phase += freq / SAMPLE_RATE as f32;
                (phase * TAU).sin() * (1.0 - p) * 0.25
            })
            .collect()
    }

    /// Encode mono samples as a 16-bit PCM WAV file in memory.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        const BYTES_PER_SAMPLE: u16 = 2;
        let data_len = samples.len() as u32 * BYTES_PER_SAMPLE as u32;

        fn chunk(out: &mut Vec<u8>, tag: &[u8; 4], len: u32) {
            out.extend_from_slice(tag);
            out.extend_from_slice(&len.to_le_bytes());
        }

        let mut out = Vec::with_capacity(44 + data_len as usize);
        chunk(&mut out, b"RIFF", 36 + data_len);
        out.extend_from_slice(b"WAVE");

        chunk(&mut out, b"fmt ", 16);
        for field in [1u16, 1] {
            // format tag (PCM), channel count
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        out.extend_from_slice(&(SAMPLE_RATE * BYTES_PER_SAMPLE as u32).to_le_bytes());
        out.extend_from_slice(&BYTES_PER_SAMPLE.to_le_bytes());
        out.extend_from_slice(&(BYTES_PER_SAMPLE * 8).to_le_bytes());

        chunk(&mut out, b"data", data_len);
        out.extend(samples.iter().flat_map(|s| ((s.clamp(-1.0, 1.0) * 32767.0) as i16).to_le_bytes()));
        out
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
    pub fn play_bump(&self) {}
    pub fn play_goal(&self) {}
    pub fn play_new_maze(&self) {}
}
