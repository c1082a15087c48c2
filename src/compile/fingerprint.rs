use xxhash_rust::xxh3::Xxh3;

use crate::composition::model::Track;
use crate::effects::layer::{ColorWheel, LayerParams};
use crate::effects::pipeline::ResolvedStack;
use crate::eval::evaluator::{ActiveScene, FrameState};

const XXH3_SEED: u64 = 0x8b5a_d4a0_c7d8_e9f1;

/// Stable 128-bit digest of an evaluated frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FrameFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Fingerprint everything a renderer would draw for `state`.
///
/// The global frame index is not hashed, so two frames that render identically (a held still,
/// say) share a fingerprint.
pub fn fingerprint_frame(state: &FrameState) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(state.scenes.len() as u32);
    for s in &state.scenes {
        write_scene(&mut h, s);
    }
    match &state.effects {
        None => h.write_u8(0),
        Some(stack) => {
            h.write_u8(1);
            write_stack(&mut h, stack);
        }
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_scene(h: &mut StableHasher, s: &ActiveScene) {
    h.write_str(&s.scene_id);
    h.write_u8(match s.track {
        Track::Visual => 0,
        Track::Audio => 1,
    });
    h.write_u64(s.local_frame);
    h.write_u64(s.duration_frames);
    h.write_f64(s.progress);
    match s.spring {
        None => h.write_u8(0),
        Some(p) => {
            h.write_u8(1);
            h.write_f64(p);
        }
    }
    h.write_u64(s.seed);
}

fn write_stack(h: &mut StableHasher, stack: &ResolvedStack) {
    h.write_u32(stack.len() as u32);
    for layer in stack.layers() {
        h.write_str(layer.name.as_str());
        write_params(h, &layer.params);
    }
}

fn write_wheel(h: &mut StableHasher, w: ColorWheel) {
    h.write_f64(w.r);
    h.write_f64(w.g);
    h.write_f64(w.b);
}

fn write_params(h: &mut StableHasher, params: &LayerParams) {
    match params {
        LayerParams::MotionBlur(p) => {
            h.write_f64(p.shutter_angle);
            h.write_u32(p.samples);
        }
        LayerParams::Bloom(p) => {
            h.write_f64(p.intensity);
            h.write_f64(p.threshold);
            h.write_f64(p.radius);
        }
        LayerParams::ChromaticAberration(p) => {
            h.write_f64(p.offset);
            h.write_f64(p.angle_deg);
        }
        LayerParams::Glitch(p) => {
            h.write_f64(p.intensity);
            h.write_f64(p.frequency);
            h.write_u64(p.seed);
        }
        LayerParams::FilmGrain(p) => {
            h.write_f64(p.intensity);
            h.write_f64(p.size);
            h.write_bool(p.animated);
        }
        LayerParams::ColorGrading(p) => {
            h.write_f64(p.brightness);
            h.write_f64(p.contrast);
            h.write_f64(p.saturation);
            h.write_f64(p.temperature);
            h.write_f64(p.tint);
            write_wheel(h, p.lift);
            write_wheel(h, p.gamma);
            write_wheel(h, p.gain);
        }
        LayerParams::LightLeak(p) => {
            h.write_f64(p.intensity);
            write_wheel(h, p.color);
            h.write_f64(p.position.x);
            h.write_f64(p.position.y);
            h.write_f64(p.speed);
        }
        LayerParams::Vignette(p) => {
            h.write_f64(p.intensity);
            h.write_f64(p.radius);
            h.write_f64(p.softness);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
