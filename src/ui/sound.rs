/// Sound engine: procedural stadium-style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_cheer: Arc<Vec<u8>>,
        sfx_seal: Arc<Vec<u8>>,
        sfx_whistle: Arc<Vec<u8>>,
        sfx_step: Arc<Vec<u8>>,
        sfx_thud: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            // ── Generate all sound buffers ──
            let sfx_cheer = Arc::new(make_wav(&gen_cheer()));
            let sfx_seal = Arc::new(make_wav(&gen_seal()));
            let sfx_whistle = Arc::new(make_wav(&gen_whistle()));
            let sfx_step = Arc::new(make_wav(&gen_step()));
            let sfx_thud = Arc::new(make_wav(&gen_thud()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_cheer,
                sfx_seal,
                sfx_whistle,
                sfx_step,
                sfx_thud,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_cheer(&self) { self.play(&self.sfx_cheer); }
        pub fn play_seal(&self) { self.play(&self.sfx_seal); }
        pub fn play_whistle(&self) { self.play(&self.sfx_whistle); }
        pub fn play_step(&self) { self.play(&self.sfx_step); }
        pub fn play_thud(&self) { self.play(&self.sfx_thud); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Crowd cheer: filtered noise swelling up then dying away.
    fn gen_cheer() -> Vec<f32> {
        let duration = 1.2;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 9001;
        let mut low = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                // Fast attack, slow decay.
                let env = if t < 0.15 { t / 0.15 } else { (1.0 - t).powf(0.7) };
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // One-pole low-pass gives it a roar instead of a hiss.
                low += 0.08 * (noise - low);
                low * env * 0.5
            })
            .collect()
    }

    /// Mascot seal bark: two short honks, the second a step lower.
    fn gen_seal() -> Vec<f32> {
        let honks = [(330.0_f32, 0.12), (0.0, 0.05), (280.0, 0.14)];
        let mut samples = Vec::new();
        for &(freq, dur) in &honks {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                if freq == 0.0 {
                    samples.push(0.0);
                    continue;
                }
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                // Buzzy wave (sine + strong harmonics) for a honky timbre.
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.5
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.3
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.2;
                samples.push(wave * env * 0.35);
            }
        }
        samples
    }

    /// Referee whistle: high tone with a fast trill.
    fn gen_whistle() -> Vec<f32> {
        let duration = 0.35;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let prog = i as f32 / n as f32;
                // 2.2kHz carrier warbled at 40Hz.
                let freq = 2200.0 + (t * 40.0 * 2.0 * std::f32::consts::PI).sin() * 120.0;
                let env = if prog < 0.05 { prog / 0.05 } else { 1.0 - (prog - 0.05) * 0.6 };
                (t * freq * 2.0 * std::f32::consts::PI).sin() * env * 0.25
            })
            .collect()
    }

    /// Footstep: very short soft tick.
    fn gen_step() -> Vec<f32> {
        let duration = 0.03;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 777;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * 180.0 * 2.0 * std::f32::consts::PI).sin();
                (tone * 0.6 + noise * 0.4) * (1.0 - t).powf(2.0) * 0.2
            })
            .collect()
    }

    /// Body hit (juke, tackle): low noise burst with descending pitch.
    fn gen_thud() -> Vec<f32> {
        let duration = 0.14;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 424242;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 120.0 + (1.0 - t) * 180.0; // descending
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * std::f32::consts::PI).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.8);
                (tone * 0.6 + noise * 0.4) * env * 0.35
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_cheer(&self) {}
    pub fn play_seal(&self) {}
    pub fn play_whistle(&self) {}
    pub fn play_step(&self) {}
    pub fn play_thud(&self) {}
}
