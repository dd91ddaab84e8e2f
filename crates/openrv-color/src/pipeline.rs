//! Display pipeline - the chain of per-channel operations applied to
//! displayed pixels.

use crate::exposure::ColorState;
use openrv_core::TransferFunction;

/// A single color operation in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorOp {
    TransferToLinear(TransferFunction),
    /// Multiply by a linear gain (`2^exposure`).
    Gain(f32),
    Clamp { min: f32, max: f32 },
    TransferFromLinear(TransferFunction),
}

impl ColorOp {
    #[inline]
    fn apply(&self, v: f32) -> f32 {
        match self {
            Self::TransferToLinear(tf) => tf.to_linear(v),
            Self::Gain(g) => v * g,
            Self::Clamp { min, max } => v.clamp(*min, *max),
            Self::TransferFromLinear(tf) => tf.from_linear(v),
        }
    }
}

/// A display pipeline built from a [`ColorState`].
#[derive(Debug, Clone)]
pub struct ColorPipeline {
    pub ops: Vec<ColorOp>,
    /// Encoding of incoming pixel values.
    pub input_transfer: TransferFunction,
    /// Encoding expected by the display surface.
    pub output_transfer: TransferFunction,
    /// Upper bound of displayed values.
    pub max: f32,
}

impl ColorPipeline {
    /// Create an empty pipeline for the given encodings.
    pub fn new(input: TransferFunction, output: TransferFunction) -> Self {
        Self {
            ops: Vec::new(),
            input_transfer: input,
            output_transfer: output,
            max: 1.0,
        }
    }

    /// Pipeline for `state` between a source encoding and a display
    /// encoding, ready to use.
    pub fn for_display(
        input: TransferFunction,
        output: TransferFunction,
        state: &ColorState,
    ) -> Self {
        let mut pipe = Self::new(input, output);
        pipe.build_ops(state);
        pipe
    }

    /// Linear-in, linear-out pipeline for `state`.
    pub fn linear(state: &ColorState) -> Self {
        Self::for_display(TransferFunction::Linear, TransferFunction::Linear, state)
    }

    /// Regenerate the operation chain for `state`.
    ///
    /// Exposure works on linear light, so encoded input is decoded first and
    /// re-encoded after the clamp. With default exposure and matching
    /// encodings the chain is just the clamp.
    pub fn build_ops(&mut self, state: &ColorState) {
        self.ops.clear();

        let needs_linearize =
            !state.is_default() || self.input_transfer != self.output_transfer;

        if needs_linearize && !self.input_transfer.is_linear() {
            self.ops.push(ColorOp::TransferToLinear(self.input_transfer));
        }
        if !state.is_default() {
            self.ops.push(ColorOp::Gain(state.gain()));
        }
        self.ops.push(ColorOp::Clamp {
            min: 0.0,
            max: self.max,
        });
        if needs_linearize && !self.output_transfer.is_linear() {
            self.ops.push(ColorOp::TransferFromLinear(self.output_transfer));
        }
    }

    /// Process a single RGB pixel through the pipeline.
    pub fn process_pixel(&self, mut rgb: [f32; 3]) -> [f32; 3] {
        for op in &self.ops {
            rgb = [op.apply(rgb[0]), op.apply(rgb[1]), op.apply(rgb[2])];
        }
        rgb
    }

    /// Process a batch of pixels.
    pub fn process_buffer(&self, data: &mut [[f32; 3]]) {
        for pixel in data.iter_mut() {
            *pixel = self.process_pixel(*pixel);
        }
    }

    /// Process tightly packed 8-bit RGBA. Alpha is left untouched.
    pub fn process_rgba8(&self, data: &mut [u8]) {
        for px in data.chunks_exact_mut(4) {
            let rgb = self.process_pixel([
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
            ]);
            for (dst, v) in px.iter_mut().zip(rgb) {
                *dst = (v / self.max * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
