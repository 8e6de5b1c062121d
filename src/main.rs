use std::time::Duration;

use anyhow::Result;
use wavenc::wav::{BitDepth, Channels, WavWriter};

mod gen;

// Writes a 440 Hz sine wave at half amplitude, five seconds long, as a
// 16-bit mono WAVE file.
fn main() -> Result<()> {
    let sample_rate = 44100u32;
    let seconds = 5;
    let fade = Duration::from_millis(100);

    let mut out = WavWriter::create("output.wav", BitDepth::Bit16, Channels::Mono, sample_rate)?;

    let total = (sample_rate as usize) * seconds;
    for i in 0..total {
        let t = i as f64 / sample_rate as f64;

        let v = gen::sine(t, 440., 0.) * 0.5;
        let v = gen::fade_out(gen::fade_in(v, fade, t), fade, t, seconds as f64);

        out.write_mono(v)?;
    }

    out.close()?;

    Ok(())
}
