//! WGSL for the dune vertex displacement, generated from the same
//! [`TerrainParams`] the collision height field uses.
//!
//! The shader and [`crate::terrain::TerrainHeightField`] therefore cannot
//! disagree on frequencies, amplitudes or octave count. The only terms the
//! shader adds are the time-driven ripple and heat shimmer.

use crate::noise::{GRADIENT_NORM_A, GRADIENT_NORM_B, SIMPLEX_C, SIMPLEX_SCALE};
use crate::terrain::TerrainParams;
use bytemuck::{Pod, Zeroable};
use std::fmt::Write;

/// Mirrors `struct TerrainUniforms` in the generated shader (80 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TerrainUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub time: f32,
    pub _pad: [f32; 3],
}

impl TerrainUniforms {
    pub fn new(view_proj: glam::Mat4, time: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            time,
            _pad: [0.0; 3],
        }
    }
}

/// One vertex of the flat terrain plane before displacement.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    /// Plane-local position (x right, y "north", i.e. world -z).
    pub local: [f32; 2],
    pub uv: [f32; 2],
}

/// Square grid of `segments x segments` quads spanning `size` units, rows
/// from +y to -y, two CCW triangles per quad.
pub fn plane_mesh(size: f32, segments: u32) -> (Vec<TerrainVertex>, Vec<u32>) {
    let segments = segments.max(1);
    let row = segments + 1;
    let half = size * 0.5;
    let step = size / segments as f32;

    let mut vertices = Vec::with_capacity((row * row) as usize);
    for iy in 0..row {
        for ix in 0..row {
            let u = ix as f32 / segments as f32;
            let v = iy as f32 / segments as f32;
            vertices.push(TerrainVertex {
                local: [-half + ix as f32 * step, half - iy as f32 * step],
                uv: [u, 1.0 - v],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for iy in 0..segments {
        for ix in 0..segments {
            let a = iy * row + ix;
            let b = (iy + 1) * row + ix;
            let c = (iy + 1) * row + ix + 1;
            let d = iy * row + ix + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    (vertices, indices)
}

/// A WGSL float literal (always carries a decimal point or exponent).
pub fn wgsl_float(v: f64) -> String {
    format!("{v:?}")
}

/// Full WGSL module: uniform block, noise, FBM, displacement and a vertex
/// entry point `vs_terrain`.
pub fn terrain_wgsl(params: &TerrainParams) -> String {
    let f = wgsl_float;
    let fbm = &params.fbm;
    let mut src = String::with_capacity(4096);

    // writeln! on a String cannot fail
    let _ = writeln!(src, "// Generated by giza-core; edit TerrainParams, not this text.");
    let _ = writeln!(src, "const SIMPLEX_C: vec4<f32> = vec4<f32>({}, {}, {}, {});",
        f(SIMPLEX_C[0]), f(SIMPLEX_C[1]), f(SIMPLEX_C[2]), f(SIMPLEX_C[3]));
    let _ = writeln!(src, "const SIMPLEX_SCALE: f32 = {};", f(SIMPLEX_SCALE));
    let _ = writeln!(src, "const GRAD_NORM_A: f32 = {};", f(GRADIENT_NORM_A));
    let _ = writeln!(src, "const GRAD_NORM_B: f32 = {};", f(GRADIENT_NORM_B));
    let _ = writeln!(src, "const BASE_Y: f32 = {};", f(params.base_y));
    let _ = writeln!(src, "const DUNE_FREQ: f32 = {};", f(params.dune_frequency));
    let _ = writeln!(src, "const DUNE_AMP: f32 = {};", f(params.dune_amplitude));
    let _ = writeln!(src, "const DETAIL_FREQ: f32 = {};", f(params.detail_frequency));
    let _ = writeln!(src, "const DETAIL_AMP: f32 = {};", f(params.detail_amplitude));
    let _ = writeln!(src, "const FBM_OCTAVES: i32 = {};", fbm.octaves);
    let _ = writeln!(src, "const FBM_PERSISTENCE: f32 = {};", f(fbm.persistence));
    let _ = writeln!(src, "const FBM_LACUNARITY: f32 = {};", f(fbm.lacunarity));
    let _ = writeln!(src, "const FBM_ROTATION: f32 = {};", f(fbm.rotation));
    let _ = writeln!(src, "const FBM_SHIFT: f32 = {};", f(fbm.shift));
    let _ = writeln!(src, "const RIPPLE_SPEED: f32 = {};", f(params.ripple_speed));
    let _ = writeln!(src, "const RIPPLE_AMP: f32 = {};", f(params.ripple_amplitude));
    let _ = writeln!(src, "const HEAT_AMP: f32 = {};", f(params.heat_amplitude));
    src.push_str(TERRAIN_WGSL_BODY);
    src
}

const TERRAIN_WGSL_BODY: &str = r#"
struct TerrainUniforms {
    view_proj: mat4x4<f32>,
    time: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0) var<uniform> terrain: TerrainUniforms;

fn mod289_2(x: vec2<f32>) -> vec2<f32> {
    return x - 289.0 * floor(x / 289.0);
}

fn mod289_3(x: vec3<f32>) -> vec3<f32> {
    return x - 289.0 * floor(x / 289.0);
}

fn permute3(x: vec3<f32>) -> vec3<f32> {
    return mod289_3((x * 34.0 + 1.0) * x);
}

fn simplex2(v: vec2<f32>) -> f32 {
    let c = SIMPLEX_C;
    var i: vec2<f32> = floor(v + dot(v, c.yy));
    let x0: vec2<f32> = v - i + dot(i, c.xx);
    var i1: vec2<f32> = vec2<f32>(0.0, 1.0);
    if (x0.x > x0.y) {
        i1 = vec2<f32>(1.0, 0.0);
    }
    var x12: vec4<f32> = x0.xyxy + c.xxzz;
    x12 = vec4<f32>(x12.xy - i1, x12.zw);
    i = mod289_2(i);
    let p: vec3<f32> = permute3(permute3(i.y + vec3<f32>(0.0, i1.y, 1.0)) + i.x + vec3<f32>(0.0, i1.x, 1.0));
    var m: vec3<f32> = max(vec3<f32>(0.5) - vec3<f32>(dot(x0, x0), dot(x12.xy, x12.xy), dot(x12.zw, x12.zw)), vec3<f32>(0.0));
    m = m * m;
    m = m * m;
    let gx: vec3<f32> = 2.0 * fract(p * c.www) - 1.0;
    let h: vec3<f32> = abs(gx) - 0.5;
    let ox: vec3<f32> = floor(gx + 0.5);
    let a0: vec3<f32> = gx - ox;
    m = m * (GRAD_NORM_A - GRAD_NORM_B * (a0 * a0 + h * h));
    let g: vec3<f32> = vec3<f32>(a0.x * x0.x + h.x * x0.y, a0.yz * x12.xz + h.yz * x12.yw);
    return SIMPLEX_SCALE * dot(m, g);
}

fn fbm(start: vec2<f32>) -> f32 {
    var x: vec2<f32> = start;
    var v: f32 = 0.0;
    var a: f32 = FBM_PERSISTENCE;
    let shift = vec2<f32>(FBM_SHIFT);
    let rot = mat2x2<f32>(cos(FBM_ROTATION), sin(FBM_ROTATION), -sin(FBM_ROTATION), cos(FBM_ROTATION));
    for (var octave: i32 = 0; octave < FBM_OCTAVES; octave = octave + 1) {
        v = v + a * simplex2(x);
        x = rot * x * FBM_LACUNARITY + shift;
        a = a * FBM_PERSISTENCE;
    }
    return v;
}

// Collision surface; must stay term-for-term equal to TerrainHeightField.
fn dune_elevation(p: vec2<f32>) -> f32 {
    let large_dunes = simplex2(p * DUNE_FREQ) * DUNE_AMP;
    let details = fbm(p * DETAIL_FREQ) * DETAIL_AMP;
    return large_dunes + details;
}

// Visual only: wind ripples and heat shimmer.
fn surface_motion(p: vec2<f32>, time: f32) -> f32 {
    let ripple_pos = p + vec2<f32>(time * RIPPLE_SPEED, time * RIPPLE_SPEED * 0.5);
    let ripples = sin((ripple_pos.x * 0.8 + ripple_pos.y * 0.2) * 2.0) * RIPPLE_AMP;
    let heat = sin(p.x * 10.0 + time * 5.0) * sin(p.y * 10.0 + time * 3.0) * HEAT_AMP;
    return ripples + heat;
}

struct TerrainVaryings {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_terrain(@location(0) plane_pos: vec2<f32>, @location(1) uv: vec2<f32>) -> TerrainVaryings {
    let elevation = dune_elevation(plane_pos) + surface_motion(plane_pos, terrain.time);
    let world = vec3<f32>(plane_pos.x, BASE_Y + elevation, -plane_pos.y);
    var varyings: TerrainVaryings;
    varyings.clip_position = terrain.view_proj * vec4<f32>(world, 1.0);
    varyings.world_position = world;
    varyings.uv = uv;
    return varyings;
}
"#;
