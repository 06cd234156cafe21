use anyhow::{anyhow, Result};
use three_d::*;

use crate::log; // macro import
use crate::timeline::{self, Timeline};


pub const MODEL_PATH: &str = "models/can/can.gltf";
pub const ENVIRONMENT_DIR: &str = "textures/environmentMaps/0";

/// Strength of the image-based ambient lighting
pub const ENVIRONMENT_INTENSITY: f32 = 3.0;

pub const MODEL_SCALE: f32 = 0.05;
pub const MODEL_OFFSET_Y: f32 = -0.6;

/// Cube-map face files, in the order [TextureCubeMap::new] expects them
const FACES: [&str; 6] = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];


/// Fetches the six cube-map faces and turns them into the scene's ambient
/// lighting source
pub async fn load_environment(context: &Context) -> Result<AmbientLight> {
    let paths = FACES.map(|f| format!("{}/{}", ENVIRONMENT_DIR, f));
    let mut loaded = three_d_asset::io::load_async(&paths)
        .await
        .map_err(|e| anyhow!("failed to fetch environment map: {}", e))?;

    let mut face = |name: &str| -> Result<CpuTexture> {
        loaded
            .deserialize(name)
            .map_err(|e| anyhow!("failed to decode {}: {}", name, e))
    };
    let right = face("px.png")?;
    let left = face("nx.png")?;
    let top = face("py.png")?;
    let bottom = face("ny.png")?;
    let front = face("pz.png")?;
    let back = face("nz.png")?;

    let environment_map =
        TextureCubeMap::new(context, &right, &left, &top, &bottom, &front, &back);
    log!("load_environment(): cube map loaded from {}", ENVIRONMENT_DIR);

    Ok(AmbientLight::new_with_environment(
        context,
        ENVIRONMENT_INTENSITY,
        Srgba::WHITE,
        &environment_map,
    ))
}


/// Fetches the can model with its embedded animation clip
pub async fn load_can(context: &Context) -> Result<Model<PhysicalMaterial>> {
    let mut loaded = three_d_asset::io::load_async(&[MODEL_PATH])
        .await
        .map_err(|e| anyhow!("failed to fetch {}: {}", MODEL_PATH, e))?;
    let cpu_model: CpuModel = loaded
        .deserialize(MODEL_PATH)
        .map_err(|e| anyhow!("failed to decode {}: {}", MODEL_PATH, e))?;

    let mut model = Model::<PhysicalMaterial>::new(context, &cpu_model)
        .map_err(|e| anyhow!("failed to instantiate {}: {}", MODEL_PATH, e))?;
    tune_materials(&mut model);
    log!("load_can(): {} loaded, {} part(s)", MODEL_PATH, model.len());

    Ok(model)
}


/// One-time pass over every part of the model. The can is a closed mesh, so
/// back faces never contribute.
fn tune_materials(model: &mut Model<PhysicalMaterial>) {
    for part in model.iter_mut() {
        part.material.render_states.cull = Cull::Back;
    }
}


/// Root transformation for the model: fixed scale and offset composed with
/// the per-frame Euler rotation (X, then Y, then Z)
pub fn model_transformation(rotation: (f32, f32, f32)) -> Mat4 {
    let (rx, ry, rz) = rotation;
    Mat4::from_translation(vec3(0.0, MODEL_OFFSET_Y, 0.0))
        * Mat4::from_angle_x(radians(rx))
        * Mat4::from_angle_y(radians(ry))
        * Mat4::from_angle_z(radians(rz))
        * Mat4::from_scale(MODEL_SCALE)
}


/// Transformation for the model at timeline position `t`. Angles stay f64
/// until this final narrowing for the GPU-side matrix.
pub fn model_transformation_at(t: f64) -> Mat4 {
    let (rx, ry, rz) = timeline::rotation(t);
    model_transformation((rx as f32, ry as f32, rz as f32))
}


/// Advances the timeline by one frame and returns the transformation to
/// write onto the model, or None while its load has not resolved. The
/// timeline moves either way.
pub fn advance(timeline: &mut Timeline, model_loaded: bool) -> Option<Mat4> {
    let t = timeline.step();
    model_loaded.then(|| model_transformation_at(t))
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec4_near(v: Vec4, expected: (f32, f32, f32, f32)) {
        assert!((v.x - expected.0).abs() < 1e-6, "x: {} vs {}", v.x, expected.0);
        assert!((v.y - expected.1).abs() < 1e-6, "y: {} vs {}", v.y, expected.1);
        assert!((v.z - expected.2).abs() < 1e-6, "z: {} vs {}", v.z, expected.2);
        assert!((v.w - expected.3).abs() < 1e-6, "w: {} vs {}", v.w, expected.3);
    }

    #[test]
    fn transformation_places_the_model_at_its_fixed_offset() {
        // the offset sits outside the rotation, so it holds for any angles
        for t in [0.0, 0.3, 0.8, 2.5] {
            let m = model_transformation_at(t);
            let origin = m * vec4(0.0, 0.0, 0.0, 1.0);
            assert_vec4_near(origin, (0.0, MODEL_OFFSET_Y, 0.0, 1.0));
        }
    }

    #[test]
    fn transformation_scales_directions_uniformly() {
        let m = model_transformation((0.0, 0.0, 0.0));
        assert_vec4_near(m * vec4(1.0, 0.0, 0.0, 0.0), (MODEL_SCALE, 0.0, 0.0, 0.0));
        assert_vec4_near(m * vec4(0.0, 1.0, 0.0, 0.0), (0.0, MODEL_SCALE, 0.0, 0.0));
    }

    #[test]
    fn tilt_composes_inside_the_spin() {
        // X then Y then Z means the Z tilt turns +X to +Y in model space,
        // which the quarter-turn Y spin then leaves in place. The reversed
        // composition would land on -Z instead.
        let m = model_transformation((0.0, FRAC_PI_2, FRAC_PI_2));
        assert_vec4_near(m * vec4(1.0, 0.0, 0.0, 0.0), (0.0, MODEL_SCALE, 0.0, 0.0));
    }

    #[test]
    fn frames_before_the_model_resolves_step_without_a_transform() {
        let mut timeline = Timeline::from_scroll(0.0);
        timeline.set_scroll_offset(3000.0);

        assert!(advance(&mut timeline, false).is_none());
        // the timeline still moved toward its target
        assert!(timeline.current() > 0.0);

        let m = advance(&mut timeline, true).expect("model resolved");
        let origin = m * vec4(0.0, 0.0, 0.0, 1.0);
        assert_vec4_near(origin, (0.0, MODEL_OFFSET_Y, 0.0, 1.0));
    }
}
