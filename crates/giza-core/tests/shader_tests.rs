// Host-side tests for the generated terrain shader.
// naga parses and validates the WGSL exactly as wgpu would at pipeline creation.

use giza_core::noise::Fbm;
use giza_core::shader::{plane_mesh, terrain_wgsl, wgsl_float, TerrainUniforms};
use giza_core::terrain::TerrainParams;
use glam::Mat4;

fn validate(src: &str) -> naga::Module {
    let module = match naga::front::wgsl::parse_str(src) {
        Ok(m) => m,
        Err(e) => panic!("WGSL parse failed:\n{}", e.emit_to_string(src)),
    };
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!("WGSL validation failed: {e:?}");
    }
    module
}

#[test]
fn default_shader_validates() {
    let module = validate(&terrain_wgsl(&TerrainParams::default()));
    assert!(module
        .entry_points
        .iter()
        .any(|ep| ep.name == "vs_terrain" && ep.stage == naga::ShaderStage::Vertex));
}

#[test]
fn uniform_block_matches_rust_layout() {
    assert_eq!(std::mem::size_of::<TerrainUniforms>(), 80);

    let module = validate(&terrain_wgsl(&TerrainParams::default()));
    let span = module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(name), naga::TypeInner::Struct { span, .. }) if name == "TerrainUniforms" => {
                Some(*span)
            }
            _ => None,
        })
        .expect("TerrainUniforms struct present");
    assert_eq!(span as usize, std::mem::size_of::<TerrainUniforms>());
}

#[test]
fn uniforms_serialise_column_major() {
    let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
    let u = TerrainUniforms::new(m, 12.5);
    let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
    assert_eq!(floats.len(), 20);
    assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
    assert_eq!(floats[16], 12.5);
}

#[test]
fn tuned_params_flow_into_the_source() {
    let params = TerrainParams {
        dune_amplitude: 4.5,
        base_y: -3.0,
        fbm: Fbm {
            octaves: 3,
            ..Fbm::default()
        },
        ..TerrainParams::default()
    };
    let src = terrain_wgsl(&params);
    assert!(src.contains("const DUNE_AMP: f32 = 4.5;"));
    assert!(src.contains("const BASE_Y: f32 = -3.0;"));
    assert!(src.contains("const FBM_OCTAVES: i32 = 3;"));
    validate(&src);
}

/// Statements of the generated kernel in evaluation order. Each mirrors a
/// line of `noise::simplex2`, `Fbm::sample` or `TerrainHeightField`; a swapped
/// swizzle or operand would still validate, so the text itself is pinned.
const KERNEL_STATEMENTS: &[&str] = &[
    "var i: vec2<f32> = floor(v + dot(v, c.yy));",
    "let x0: vec2<f32> = v - i + dot(i, c.xx);",
    "if (x0.x > x0.y) {",
    "var x12: vec4<f32> = x0.xyxy + c.xxzz;",
    "x12 = vec4<f32>(x12.xy - i1, x12.zw);",
    "let p: vec3<f32> = permute3(permute3(i.y + vec3<f32>(0.0, i1.y, 1.0)) + i.x + vec3<f32>(0.0, i1.x, 1.0));",
    "var m: vec3<f32> = max(vec3<f32>(0.5) - vec3<f32>(dot(x0, x0), dot(x12.xy, x12.xy), dot(x12.zw, x12.zw)), vec3<f32>(0.0));",
    "let gx: vec3<f32> = 2.0 * fract(p * c.www) - 1.0;",
    "let h: vec3<f32> = abs(gx) - 0.5;",
    "let ox: vec3<f32> = floor(gx + 0.5);",
    "let a0: vec3<f32> = gx - ox;",
    "m = m * (GRAD_NORM_A - GRAD_NORM_B * (a0 * a0 + h * h));",
    "let g: vec3<f32> = vec3<f32>(a0.x * x0.x + h.x * x0.y, a0.yz * x12.xz + h.yz * x12.yw);",
    "return SIMPLEX_SCALE * dot(m, g);",
    "var a: f32 = FBM_PERSISTENCE;",
    "let rot = mat2x2<f32>(cos(FBM_ROTATION), sin(FBM_ROTATION), -sin(FBM_ROTATION), cos(FBM_ROTATION));",
    "v = v + a * simplex2(x);",
    "x = rot * x * FBM_LACUNARITY + shift;",
    "a = a * FBM_PERSISTENCE;",
    "let large_dunes = simplex2(p * DUNE_FREQ) * DUNE_AMP;",
    "let details = fbm(p * DETAIL_FREQ) * DETAIL_AMP;",
    "let world = vec3<f32>(plane_pos.x, BASE_Y + elevation, -plane_pos.y);",
];

#[test]
fn kernel_text_tracks_the_cpu_noise() {
    let src = terrain_wgsl(&TerrainParams::default());
    let mut cursor = 0;
    for stmt in KERNEL_STATEMENTS {
        match src[cursor..].find(stmt) {
            Some(at) => cursor += at + stmt.len(),
            None => panic!("missing or out of order in generated WGSL: {stmt}"),
        }
    }
}

#[test]
fn float_literals_always_look_like_floats() {
    assert_eq!(wgsl_float(3.0), "3.0");
    assert_eq!(wgsl_float(-2.0), "-2.0");
    assert_eq!(wgsl_float(0.005), "0.005");
    assert!(wgsl_float(1e-7).contains('e'));
}

#[test]
fn plane_mesh_covers_the_square() {
    let (vertices, indices) = plane_mesh(10.0, 4);
    assert_eq!(vertices.len(), 25);
    assert_eq!(indices.len(), 4 * 4 * 6);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    assert_eq!(vertices[0].local, [-5.0, 5.0]);
    assert_eq!(vertices[0].uv, [0.0, 1.0]);
    assert_eq!(vertices[24].local, [5.0, -5.0]);
    assert_eq!(vertices[24].uv, [1.0, 0.0]);

    // counter-clockwise in the plane, so the lit side faces world +Y
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| vertices[i as usize].local);
        let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        assert!(cross > 0.0);
    }
}
