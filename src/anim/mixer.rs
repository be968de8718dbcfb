//! A tiny clip mixer: a stack of layers with playback time and a linear
//! weight ramp.  The newest layer is the active one; older layers only
//! exist while they fade out.

use smallvec::SmallVec;

use super::assets::ClipHandle;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Ramp {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Ramp {
    fn settled(weight: f32) -> Self {
        Self {
            from: weight,
            to: weight,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    #[inline]
    fn done(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn weight(&self) -> f32 {
        if self.done() {
            self.to
        } else {
            self.from + (self.to - self.from) * (self.elapsed / self.duration)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    pub clip: ClipHandle,
    /// Playback position, seconds.
    pub time: f32,
    pub duration: f32,
    pub looping: bool,
    pub weight: f32,
    ramp: Ramp,
}

impl Layer {
    fn advance(&mut self, dt: f32) {
        self.time += dt;
        if self.duration <= 0.0 {
            self.time = 0.0;
        } else if self.looping {
            self.time = self.time.rem_euclid(self.duration);
        } else if self.time >= self.duration {
            self.time = self.duration;
        }

        self.ramp.elapsed += dt;
        self.weight = self.ramp.weight();
    }

    #[inline]
    fn faded_out(&self) -> bool {
        self.ramp.to == 0.0 && self.ramp.done()
    }
}

#[derive(Default)]
pub struct Mixer {
    layers: SmallVec<[Layer; 2]>,
}

impl Mixer {
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn active(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// Start `clip` from frame zero.  With a positive `fade` every current
    /// layer ramps from its weight to zero while the new one ramps to one;
    /// otherwise the new clip replaces everything immediately.
    pub fn play(&mut self, clip: ClipHandle, duration: f32, looping: bool, fade: f32) {
        let fading = fade > 0.0;
        if fading {
            for layer in &mut self.layers {
                layer.ramp = Ramp {
                    from: layer.weight,
                    to: 0.0,
                    elapsed: 0.0,
                    duration: fade,
                };
            }
        } else {
            self.layers.clear();
        }

        let ramp = if fading {
            Ramp {
                from: 0.0,
                to: 1.0,
                elapsed: 0.0,
                duration: fade,
            }
        } else {
            Ramp::settled(1.0)
        };
        self.layers.push(Layer {
            clip,
            time: 0.0,
            duration,
            looping,
            weight: ramp.weight(),
            ramp,
        });
    }

    /// Rewind the active layer to frame zero, weight untouched.
    pub fn restart_active(&mut self) {
        if let Some(layer) = self.layers.last_mut() {
            layer.time = 0.0;
        }
    }

    pub fn set_active_looping(&mut self, looping: bool) {
        if let Some(layer) = self.layers.last_mut() {
            layer.looping = looping;
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        for layer in &mut self.layers {
            layer.advance(dt);
        }
        self.layers.retain(|l| !l.faded_out());
    }

    pub fn stop_all(&mut self) {
        self.layers.clear();
    }
}
