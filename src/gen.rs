use std::{f64::consts::TAU, time::Duration};

pub fn sine(t: f64, freq: f64, phase: f64) -> f64 {
    f64::sin(t * freq * TAU + phase)
}

pub fn fade_in(v: f64, dur: Duration, t: f64) -> f64 {
    let dur = dur.as_secs_f64();

    if t >= dur {
        return v;
    }

    v * (t / dur)
}

pub fn fade_out(v: f64, dur: Duration, t: f64, total: f64) -> f64 {
    let dur = dur.as_secs_f64();

    let left = total - t;
    if left >= dur {
        return v;
    }

    v * (left / dur)
}
